use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::adapters::keys::ALICLOUD;
use crate::adapters::providers::alicloud::{AlicloudClient, KEYS};
use crate::adapters::providers::{key_safe, mirror};
use crate::domain::errors::AgentError;
use crate::domain::models::{
    AgentDataType, Authority, CacheData, CacheKey, CacheResult, Names, Namespace,
};
use crate::domain::ports::{AgentIdentity, CacheStore, CachingAgent};

const TYPES: &[AgentDataType] = &[
    Authority::Authoritative.for_type(Namespace::Applications),
    Authority::Authoritative.for_type(Namespace::Clusters),
    Authority::Authoritative.for_type(Namespace::ServerGroups),
    Authority::Informative.for_type(Namespace::LoadBalancers),
    Authority::Informative.for_type(Namespace::Instances),
];

/// Caches auto scaling groups as server groups, and derives the
/// application and cluster entities from their names.
pub struct ClusterCachingAgent {
    identity: AgentIdentity,
    client: Arc<dyn AlicloudClient>,
}

impl ClusterCachingAgent {
    pub const CLASS: &'static str = "AliCloudClusterCachingAgent";

    pub fn new(identity: AgentIdentity, client: Arc<dyn AlicloudClient>) -> Self {
        Self { identity, client }
    }
}

#[async_trait]
impl CachingAgent for ClusterCachingAgent {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn provider_name(&self) -> &str {
        ALICLOUD
    }

    fn provided_data_types(&self) -> &[AgentDataType] {
        TYPES
    }

    async fn load_data(&self, _cache: &dyn CacheStore) -> Result<CacheResult, AgentError> {
        let AgentIdentity {
            account, region, ..
        } = &self.identity;
        let groups = self.client.describe_scaling_groups().await?;

        // Scaling groups reference load balancers by id, keys use names.
        let lb_names: HashMap<String, String> = if groups.iter().any(|g| !g.load_balancer_ids.is_empty()) {
            self.client
                .describe_load_balancers()
                .await?
                .into_iter()
                .map(|lb| (lb.load_balancer_id, lb.load_balancer_name))
                .collect()
        } else {
            HashMap::new()
        };

        let mut applications: BTreeMap<CacheKey, CacheData> = BTreeMap::new();
        let mut clusters: BTreeMap<CacheKey, CacheData> = BTreeMap::new();
        let mut result = CacheResult::new();
        result.touch(Namespace::ServerGroups);

        for group in &groups {
            let name = &group.scaling_group_name;
            let Some(names) = Names::parse(name).filter(|_| key_safe(name)) else {
                tracing::warn!(
                    agent_type = %self.identity,
                    scaling_group = %name,
                    "Skipping scaling group whose name does not follow app-stack-detail"
                );
                continue;
            };

            let app_key = KEYS.application(&names.app);
            let cluster_key = KEYS.cluster(&names.cluster, &names.app, account);
            let sg_key = KEYS.server_group(&names.cluster, account, region, name);
            let instances = self
                .client
                .describe_scaling_instances(&group.scaling_group_id)
                .await?;

            let mut server_group = mirror(&sg_key, group, &self.identity)?
                .with_attribute("instances", serde_json::to_value(&instances)?)
                .relate(Namespace::Applications, app_key.clone())
                .relate(Namespace::Clusters, cluster_key.clone());

            for lb_id in &group.load_balancer_ids {
                let Some(lb_name) = lb_names.get(lb_id).filter(|n| key_safe(n)) else {
                    continue;
                };
                let lb_key = KEYS.load_balancer(lb_name, account, region);
                server_group.add_relationship(Namespace::LoadBalancers, lb_key.clone());
                result.add(
                    Namespace::LoadBalancers,
                    CacheData::new(lb_key).relate(Namespace::ServerGroups, sg_key.clone()),
                );
            }
            for instance in instances.iter().filter(|i| key_safe(&i.instance_id)) {
                let instance_key = KEYS.instance(&instance.instance_id, account, region);
                server_group.add_relationship(Namespace::Instances, instance_key.clone());
                result.add(
                    Namespace::Instances,
                    CacheData::new(instance_key).relate(Namespace::ServerGroups, sg_key.clone()),
                );
            }

            applications
                .entry(app_key.clone())
                .or_insert_with(|| {
                    CacheData::new(app_key.clone()).with_attribute("name", names.app.as_str())
                })
                .add_relationship(Namespace::Clusters, cluster_key.clone());
            clusters
                .entry(cluster_key.clone())
                .or_insert_with(|| {
                    CacheData::new(cluster_key)
                        .with_attribute("name", names.cluster.as_str())
                        .with_attribute("application", names.app.as_str())
                        .with_attribute("account", account.as_str())
                        .relate(Namespace::Applications, app_key)
                })
                .add_relationship(Namespace::ServerGroups, sg_key);

            result.add(Namespace::ServerGroups, server_group);
        }

        result.extend(Namespace::Applications, applications.into_values());
        result.extend(Namespace::Clusters, clusters.into_values());

        tracing::debug!(
            agent_type = %self.identity,
            server_groups = result.get(Namespace::ServerGroups).len(),
            clusters = result.get(Namespace::Clusters).len(),
            "Described scaling groups"
        );
        Ok(result)
    }
}
