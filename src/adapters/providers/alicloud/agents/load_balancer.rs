use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use crate::adapters::keys::ALICLOUD;
use crate::adapters::providers::alicloud::models::LoadBalancer;
use crate::adapters::providers::alicloud::{AlicloudClient, KEYS};
use crate::adapters::providers::{key_safe, mirror};
use crate::domain::errors::AgentError;
use crate::domain::models::{
    AgentDataType, Authority, CacheData, CacheKey, CacheResult, Namespace,
};
use crate::domain::ports::{
    AgentIdentity, CacheStore, CachingAgent, OnDemandAgent, OnDemandRequest, OnDemandResult,
    OnDemandType, PendingOnDemand, RelationshipFilter,
};

const TYPES: &[AgentDataType] = &[
    Authority::Authoritative.for_type(Namespace::LoadBalancers),
    Authority::Informative.for_type(Namespace::Instances),
];

/// Request field naming the load balancer to refresh.
pub const LOAD_BALANCER_NAME: &str = "loadBalancerName";

const CACHE_TIME: &str = "cacheTime";

/// Caches SLB instances with their listeners, and links backend instances
/// back to the load balancers serving them.
///
/// Also refreshes a single load balancer on demand. Snapshots taken that way
/// live in the on-demand namespace until the next full run replaces them.
pub struct LoadBalancerCachingAgent {
    identity: AgentIdentity,
    client: Arc<dyn AlicloudClient>,
}

impl LoadBalancerCachingAgent {
    pub const CLASS: &'static str = "AliCloudLoadBalancerCachingAgent";

    pub fn new(identity: AgentIdentity, client: Arc<dyn AlicloudClient>) -> Self {
        Self { identity, client }
    }

    /// Describe one load balancer with its listeners and virtual server
    /// groups, adding it and its backend instance edges to `result`.
    async fn describe(&self, lb: &LoadBalancer, result: &mut CacheResult) -> Result<(), AgentError> {
        let AgentIdentity {
            account, region, ..
        } = &self.identity;
        let id = &lb.load_balancer_id;
        let attribute = self.client.describe_load_balancer_attribute(id).await?;

        let mut listeners = Vec::with_capacity(attribute.listener_ports_and_protocol.len());
        for listener in &attribute.listener_ports_and_protocol {
            let mut detail = self
                .client
                .describe_listener_attribute(id, listener.protocol(), listener.listener_port)
                .await?;
            if let Value::Object(summary) = serde_json::to_value(listener)? {
                detail.extend(summary);
            }
            listeners.push(Value::Object(detail));
        }
        let mut attributes = serde_json::to_value(&attribute)?;
        if let Value::Object(fields) = &mut attributes {
            fields.insert("listenerPortsAndProtocal".into(), Value::Array(listeners));
        }
        let v_server_groups = self.client.describe_v_server_groups(id).await?;

        let key = KEYS.load_balancer(&lb.load_balancer_name, account, region);
        let mut data = mirror(&key, lb, &self.identity)?
            .with_attribute("attributes", attributes)
            .with_attribute("vServerGroups", serde_json::to_value(&v_server_groups)?);

        for server in attribute.backend_servers.iter().filter(|s| key_safe(&s.server_id)) {
            let instance = KEYS.instance(&server.server_id, account, region);
            data.add_relationship(Namespace::Instances, instance.clone());
            result.add(
                Namespace::Instances,
                CacheData::new(instance).relate(Namespace::LoadBalancers, key.clone()),
            );
        }
        result.add(Namespace::LoadBalancers, data);
        Ok(())
    }

    /// Glob over the keys of every load balancer this agent owns.
    fn own_keys_glob(&self) -> String {
        format!(
            "{}*",
            KEYS.load_balancer("", &self.identity.account, &self.identity.region)
        )
    }
}

#[async_trait]
impl CachingAgent for LoadBalancerCachingAgent {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn provider_name(&self) -> &str {
        ALICLOUD
    }

    fn provided_data_types(&self) -> &[AgentDataType] {
        TYPES
    }

    fn as_on_demand(&self) -> Option<&dyn OnDemandAgent> {
        Some(self)
    }

    async fn load_data(&self, cache: &dyn CacheStore) -> Result<CacheResult, AgentError> {
        let started = Utc::now().timestamp_millis();
        let load_balancers = self.client.describe_load_balancers().await?;

        let mut result = CacheResult::new();
        result.touch(Namespace::LoadBalancers);

        for lb in &load_balancers {
            if !key_safe(&lb.load_balancer_name) {
                tracing::warn!(
                    agent_type = %self.identity,
                    load_balancer_id = %lb.load_balancer_id,
                    "Skipping load balancer with unusable name"
                );
                continue;
            }
            self.describe(lb, &mut result).await?;
        }

        // snapshots older than this run are superseded by it
        for pending in self.pending_on_demand_requests(cache).await? {
            if pending.cache_time_ms < started {
                result.evict(Namespace::OnDemand, pending.id);
            }
        }

        tracing::debug!(
            agent_type = %self.identity,
            load_balancers = result.get(Namespace::LoadBalancers).len(),
            superseded_snapshots = result.evictions(Namespace::OnDemand).len(),
            "Described load balancers"
        );
        Ok(result)
    }
}

#[async_trait]
impl OnDemandAgent for LoadBalancerCachingAgent {
    fn handles(&self, kind: OnDemandType, cloud_provider: &str) -> bool {
        kind == OnDemandType::LoadBalancer && cloud_provider == ALICLOUD
    }

    async fn handle(
        &self,
        cache: &dyn CacheStore,
        request: &OnDemandRequest,
    ) -> Result<Option<OnDemandResult>, AgentError> {
        let Some(name) = request.field(LOAD_BALANCER_NAME).filter(|n| key_safe(n)) else {
            return Ok(None);
        };
        let key = KEYS.load_balancer(name, &self.identity.account, &self.identity.region);
        let source_agent_type = self.on_demand_agent_type();

        let mut result = CacheResult::new();
        for lb in self.client.describe_load_balancers_named(name).await? {
            self.describe(&lb, &mut result).await?;
        }

        if result.get(Namespace::LoadBalancers).is_empty() {
            cache.evict_all(Namespace::OnDemand, &[key.clone()]).await?;
            tracing::info!(
                agent_type = %source_agent_type,
                load_balancer = name,
                "Load balancer no longer exists"
            );
            result.evict(Namespace::LoadBalancers, key);
        } else {
            let snapshot = CacheData::new(key)
                .with_attribute(CACHE_TIME, Utc::now().timestamp_millis())
                .with_attribute("cacheResults", serde_json::to_value(&result)?);
            cache
                .put(&source_agent_type, Namespace::OnDemand, snapshot)
                .await?;
            tracing::info!(
                agent_type = %source_agent_type,
                load_balancer = name,
                "Refreshed load balancer on demand"
            );
        }

        Ok(Some(OnDemandResult {
            source_agent_type,
            cache_result: result,
        }))
    }

    async fn pending_on_demand_requests(
        &self,
        cache: &dyn CacheStore,
    ) -> Result<Vec<PendingOnDemand>, AgentError> {
        let ids: Vec<CacheKey> = cache
            .filter_identifiers(Namespace::OnDemand, &self.own_keys_glob())
            .await?
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let snapshots = cache
            .get_all(Namespace::OnDemand, Some(&ids), &RelationshipFilter::None)
            .await?;
        Ok(snapshots
            .into_iter()
            .map(|snapshot| PendingOnDemand {
                cache_time_ms: snapshot
                    .attributes
                    .get(CACHE_TIME)
                    .and_then(Value::as_i64)
                    .unwrap_or_default(),
                id: snapshot.id,
            })
            .collect())
    }
}
