use async_trait::async_trait;
use std::sync::Arc;

use crate::adapters::keys::ALICLOUD;
use crate::adapters::providers::alicloud::{AlicloudClient, KEYS};
use crate::adapters::providers::{key_safe, mirror};
use crate::domain::errors::AgentError;
use crate::domain::models::{AgentDataType, Authority, CacheResult, Namespace};
use crate::domain::ports::{AgentIdentity, CacheStore, CachingAgent};

const TYPES: &[AgentDataType] = &[Authority::Authoritative.for_type(Namespace::KeyPairs)];

pub struct KeyPairCachingAgent {
    identity: AgentIdentity,
    client: Arc<dyn AlicloudClient>,
}

impl KeyPairCachingAgent {
    pub const CLASS: &'static str = "AliCloudKeyPairCachingAgent";

    pub fn new(identity: AgentIdentity, client: Arc<dyn AlicloudClient>) -> Self {
        Self { identity, client }
    }
}

#[async_trait]
impl CachingAgent for KeyPairCachingAgent {
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
        let key_pairs = self.client.describe_key_pairs().await?;

        let mut result = CacheResult::new();
        result.touch(Namespace::KeyPairs);
        for pair in key_pairs.iter().filter(|p| key_safe(&p.key_pair_name)) {
            let key = KEYS.key_pair(
                &pair.key_pair_name,
                &self.identity.account,
                &self.identity.region,
            );
            result.add(Namespace::KeyPairs, mirror(&key, pair, &self.identity)?);
        }
        Ok(result)
    }
}
