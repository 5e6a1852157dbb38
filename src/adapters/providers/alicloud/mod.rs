//! Alibaba Cloud provider.
//!
//! Every (account, region) pair gets one agent per class in
//! [`AGENT_CLASSES`], all sharing a client bound to that pair.

pub mod agents;
pub mod client;
pub mod models;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use crate::adapters::keys::{AlicloudKeys, ALICLOUD};
use crate::domain::models::AccountCredentials;
use crate::domain::ports::{AgentIdentity, AgentProvider, CachingAgent, ClientFactory};

pub use agents::{
    ClusterCachingAgent, ImageCachingAgent, KeyPairCachingAgent, LoadBalancerCachingAgent,
    SecurityGroupCachingAgent,
};
pub use client::AlicloudClient;

pub(crate) const KEYS: AlicloudKeys = AlicloudKeys::new();

pub const AGENT_CLASSES: &[&str] = &[
    ClusterCachingAgent::CLASS,
    LoadBalancerCachingAgent::CLASS,
    SecurityGroupCachingAgent::CLASS,
    ImageCachingAgent::CLASS,
    KeyPairCachingAgent::CLASS,
];

/// Builds the Alibaba Cloud agent set.
pub struct AlicloudProvider {
    clients: Arc<dyn ClientFactory<dyn AlicloudClient>>,
}

impl AlicloudProvider {
    pub fn new(clients: Arc<dyn ClientFactory<dyn AlicloudClient>>) -> Self {
        Self { clients }
    }
}

impl AgentProvider for AlicloudProvider {
    fn provider_id(&self) -> &'static str {
        ALICLOUD
    }

    fn agent_classes(&self) -> &'static [&'static str] {
        AGENT_CLASSES
    }

    fn build_agents(&self, account: &AccountCredentials, region: &str) -> Vec<Arc<dyn CachingAgent>> {
        let client = self.clients.client_for(account, region);
        let id = |class: &str| AgentIdentity::new(&account.name, region, class);
        vec![
            Arc::new(ClusterCachingAgent::new(
                id(ClusterCachingAgent::CLASS),
                Arc::clone(&client),
            )),
            Arc::new(LoadBalancerCachingAgent::new(
                id(LoadBalancerCachingAgent::CLASS),
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
            Arc::new(KeyPairCachingAgent::new(id(KeyPairCachingAgent::CLASS), client)),
        ]
    }
}
