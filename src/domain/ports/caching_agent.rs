use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::domain::errors::AgentError;
use crate::domain::models::{AgentDataType, Authority, CacheResult, Namespace};
use crate::domain::ports::{CacheStore, OnDemandAgent};

/// Poll interval used when an agent does not override it.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Run timeout used when an agent does not override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Unique (account, region, agent class) triple of a caching agent.
///
/// Its string form `account/region/AgentClass` is the agent type: the
/// scheduling key, the single-flight lock key and the logging key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AgentIdentity {
    pub account: String,
    pub region: String,
    pub agent_class: String,
}

impl AgentIdentity {
    pub fn new(
        account: impl Into<String>,
        region: impl Into<String>,
        agent_class: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            region: region.into(),
            agent_class: agent_class.into(),
        }
    }
}

impl fmt::Display for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.account, self.region, self.agent_class)
    }
}

/// A pollable unit bound to one account and region.
#[async_trait]
pub trait CachingAgent: Send + Sync {
    fn identity(&self) -> &AgentIdentity;

    /// Provider id this agent caches for.
    fn provider_name(&self) -> &str;

    /// Static declaration of the namespaces this agent produces.
    fn provided_data_types(&self) -> &[AgentDataType];

    fn agent_type(&self) -> String {
        self.identity().to_string()
    }

    fn account_name(&self) -> &str {
        &self.identity().account
    }

    fn poll_interval(&self) -> Duration {
        DEFAULT_POLL_INTERVAL
    }

    fn timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    /// Delay before the next attempt after a failed or timed out run.
    fn error_interval(&self) -> Duration {
        self.poll_interval()
    }

    fn is_authoritative_for(&self, namespace: Namespace) -> bool {
        self.provided_data_types()
            .iter()
            .any(|t| t.namespace == namespace && t.authority == Authority::Authoritative)
    }

    /// This agent as an on-demand agent, when it supports single-resource
    /// refreshes.
    fn as_on_demand(&self) -> Option<&dyn OnDemandAgent> {
        None
    }

    /// Perform exactly one poll cycle.
    ///
    /// Must not write to `cache`; the scheduler applies the returned result.
    async fn load_data(&self, cache: &dyn CacheStore) -> Result<CacheResult, AgentError>;
}
