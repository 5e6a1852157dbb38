use std::sync::Arc;

use crate::domain::models::AccountCredentials;
use crate::domain::ports::CachingAgent;

/// Builds the fixed set of caching agents a cloud provider runs per region.
pub trait AgentProvider: Send + Sync {
    /// Provider id matched against `AccountCredentials::cloud_provider`.
    fn provider_id(&self) -> &'static str;

    /// Agent class names instantiated for every (account, region) pair.
    fn agent_classes(&self) -> &'static [&'static str];

    /// Instantiate one agent per class for an (account, region) pair.
    fn build_agents(
        &self,
        account: &AccountCredentials,
        region: &str,
    ) -> Vec<Arc<dyn CachingAgent>>;
}

/// Creates provider clients bound to an (account, region) pair.
pub trait ClientFactory<C: ?Sized>: Send + Sync {
    fn client_for(&self, account: &AccountCredentials, region: &str) -> Arc<C>;
}
