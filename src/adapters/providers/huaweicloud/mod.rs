//! Huawei Cloud provider.

pub mod agents;
pub mod client;
pub mod models;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use crate::adapters::keys::{HuaweiCloudKeys, HUAWEICLOUD};
use crate::domain::models::AccountCredentials;
use crate::domain::ports::{AgentIdentity, AgentProvider, CachingAgent, ClientFactory};

pub use agents::{
    ImageCachingAgent, InstanceTypeCachingAgent, NetworkCachingAgent, SecurityGroupCachingAgent,
};
pub use client::HuaweiCloudClient;

pub(crate) const KEYS: HuaweiCloudKeys = HuaweiCloudKeys::new();

pub const AGENT_CLASSES: &[&str] = &[
    NetworkCachingAgent::CLASS,
    SecurityGroupCachingAgent::CLASS,
    ImageCachingAgent::CLASS,
    InstanceTypeCachingAgent::CLASS,
];

/// Builds the Huawei Cloud agent set.
pub struct HuaweiCloudProvider {
    clients: Arc<dyn ClientFactory<dyn HuaweiCloudClient>>,
}

impl HuaweiCloudProvider {
    pub fn new(clients: Arc<dyn ClientFactory<dyn HuaweiCloudClient>>) -> Self {
        Self { clients }
    }
}

impl AgentProvider for HuaweiCloudProvider {
    fn provider_id(&self) -> &'static str {
        HUAWEICLOUD
    }

    fn agent_classes(&self) -> &'static [&'static str] {
        AGENT_CLASSES
    }

    fn build_agents(&self, account: &AccountCredentials, region: &str) -> Vec<Arc<dyn CachingAgent>> {
        let client = self.clients.client_for(account, region);
        let id = |class: &str| AgentIdentity::new(&account.name, region, class);
        vec![
            Arc::new(NetworkCachingAgent::new(
                id(NetworkCachingAgent::CLASS),
                Arc::clone(&client),
            )),
            Arc::new(SecurityGroupCachingAgent::new(
                id(SecurityGroupCachingAgent::CLASS),
                Arc::clone(&client),
            )),
            Arc::new(ImageCachingAgent::new(
                id(ImageCachingAgent::CLASS),
                Arc::clone(&client),
            )),
            Arc::new(InstanceTypeCachingAgent::new(
                id(InstanceTypeCachingAgent::CLASS),
                client,
            )),
        ]
    }
}
