use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::errors::AgentError;
use crate::domain::models::{CacheKey, CacheResult};
use crate::domain::ports::{AgentIdentity, CacheStore, CachingAgent};

/// Kind of resource an on-demand refresh targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OnDemandType {
    LoadBalancer,
    ServerGroup,
    SecurityGroup,
}

impl OnDemandType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LoadBalancer => "LoadBalancer",
            Self::ServerGroup => "ServerGroup",
            Self::SecurityGroup => "SecurityGroup",
        }
    }
}

impl fmt::Display for OnDemandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named values describing the resource to refresh, e.g.
/// `loadBalancerName`, `account`, `region`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OnDemandRequest {
    data: BTreeMap<String, String>,
}

impl OnDemandRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }

    /// Whether an agent bound to `identity` should see this request. Absent
    /// `account` or `region` fields match any agent.
    pub fn targets(&self, identity: &AgentIdentity) -> bool {
        self.field("account").is_none_or(|a| a == identity.account)
            && self.field("region").is_none_or(|r| r == identity.region)
    }
}

/// Output of one handled on-demand refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnDemandResult {
    /// The on-demand agent type that produced the result
    pub source_agent_type: String,
    pub cache_result: CacheResult,
}

/// An on-demand snapshot still waiting for the owning agent's next full run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingOnDemand {
    pub id: CacheKey,
    pub cache_time_ms: i64,
}

/// A caching agent that can also refresh a single resource out of band.
#[async_trait]
pub trait OnDemandAgent: CachingAgent {
    fn on_demand_agent_type(&self) -> String {
        format!("{}-OnDemand", self.agent_type())
    }

    fn handles(&self, kind: OnDemandType, cloud_provider: &str) -> bool;

    /// Refresh the resource named by `request`.
    ///
    /// Writes a snapshot to the on-demand namespace, or removes it when the
    /// resource is gone. `None` when the request does not name a resource
    /// this agent understands.
    async fn handle(
        &self,
        cache: &dyn CacheStore,
        request: &OnDemandRequest,
    ) -> Result<Option<OnDemandResult>, AgentError>;

    async fn pending_on_demand_requests(
        &self,
        cache: &dyn CacheStore,
    ) -> Result<Vec<PendingOnDemand>, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_targets() {
        let identity = AgentIdentity::new("prod", "cn-hangzhou", "AliCloudLoadBalancerCachingAgent");
        let any = OnDemandRequest::new().with("loadBalancerName", "web");
        assert!(any.targets(&identity));
        assert!(any.clone().with("account", "prod").targets(&identity));
        assert!(!any.clone().with("region", "cn-beijing").targets(&identity));
        assert_eq!(any.field("loadBalancerName"), Some("web"));
    }
}
