use async_trait::async_trait;
use std::sync::Arc;

use crate::adapters::keys::ALICLOUD;
use crate::adapters::providers::alicloud::{AlicloudClient, KEYS};
use crate::adapters::providers::{key_safe, mirror, named_key_safe};
use crate::domain::errors::AgentError;
use crate::domain::models::{AgentDataType, Authority, CacheResult, Namespace};
use crate::domain::ports::{AgentIdentity, CacheStore, CachingAgent};

const TYPES: &[AgentDataType] = &[Authority::Authoritative.for_type(Namespace::SecurityGroups)];

/// Caches ECS security groups.
pub struct SecurityGroupCachingAgent {
    identity: AgentIdentity,
    client: Arc<dyn AlicloudClient>,
}

impl SecurityGroupCachingAgent {
    pub const CLASS: &'static str = "AliCloudSecurityGroupCachingAgent";

    pub fn new(identity: AgentIdentity, client: Arc<dyn AlicloudClient>) -> Self {
        Self { identity, client }
    }
}

#[async_trait]
impl CachingAgent for SecurityGroupCachingAgent {
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
        let groups = self.client.describe_security_groups().await?;

        let mut result = CacheResult::new();
        result.touch(Namespace::SecurityGroups);
        for group in groups.iter().filter(|g| key_safe(&g.security_group_id)) {
            if !named_key_safe(&group.security_group_name) {
                tracing::warn!(
                    agent_type = %self.identity,
                    security_group = %group.security_group_id,
                    name = %group.security_group_name,
                    "Skipping security group whose name does not follow app-stack-detail"
                );
                continue;
            }
            let key = KEYS.security_group(
                &group.security_group_name,
                &group.security_group_id,
                &self.identity.region,
                &self.identity.account,
            );
            result.add(Namespace::SecurityGroups, mirror(&key, group, &self.identity)?);
        }
        Ok(result)
    }
}
