//! Registry of live caching agents.
//!
//! Shared between the synchronizer, which inserts on credential reload, and
//! the scheduler, which takes a snapshot every tick. Insertion is keyed by
//! agent type so concurrent registrations of the same identity collapse.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::ports::CachingAgent;

/// Accounts already covered by registered agents of one provider.
///
/// Derived from the registry on demand; holding one never blocks
/// registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduledAccounts {
    pub provider: String,
    pub accounts: BTreeSet<String>,
}

impl ScheduledAccounts {
    pub fn new(
        provider: impl Into<String>,
        accounts: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            provider: provider.into(),
            accounts: accounts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, account: &str) -> bool {
        self.accounts.contains(account)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Concurrent map of agent type to agent.
#[derive(Default)]
pub struct AgentRegistry {
    agents: DashMap<String, Arc<dyn CachingAgent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an agent unless one with the same agent type exists.
    ///
    /// Returns whether the agent was added.
    pub fn register(&self, agent: Arc<dyn CachingAgent>) -> bool {
        match self.agents.entry(agent.agent_type()) {
            Entry::Occupied(existing) => {
                tracing::debug!(agent_type = %existing.key(), "Agent already registered");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(agent);
                true
            }
        }
    }

    /// Insert a batch, returning the agent types that were new.
    pub fn register_all(
        &self,
        agents: impl IntoIterator<Item = Arc<dyn CachingAgent>>,
    ) -> Vec<String> {
        agents
            .into_iter()
            .filter_map(|agent| {
                let agent_type = agent.agent_type();
                self.register(agent).then_some(agent_type)
            })
            .collect()
    }

    pub fn get(&self, agent_type: &str) -> Option<Arc<dyn CachingAgent>> {
        self.agents.get(agent_type).map(|e| Arc::clone(e.value()))
    }

    /// Explicitly remove an agent. Nothing calls this automatically.
    pub fn remove(&self, agent_type: &str) -> Option<Arc<dyn CachingAgent>> {
        self.agents.remove(agent_type).map(|(_, agent)| agent)
    }

    /// Every registered agent, ordered by agent type.
    pub fn snapshot(&self) -> Vec<Arc<dyn CachingAgent>> {
        let mut agents: Vec<_> = self.agents.iter().map(|e| Arc::clone(e.value())).collect();
        agents.sort_by_cached_key(|a| a.agent_type());
        agents
    }

    pub fn agent_types(&self) -> BTreeSet<String> {
        self.agents.iter().map(|e| e.key().clone()).collect()
    }

    pub fn scheduled_accounts(&self, provider: &str) -> ScheduledAccounts {
        ScheduledAccounts::new(
            provider,
            self.agents
                .iter()
                .filter(|e| e.value().provider_name() == provider)
                .map(|e| e.value().account_name().to_string()),
        )
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::errors::AgentError;
    use crate::domain::models::{AgentDataType, CacheResult};
    use crate::domain::ports::{AgentIdentity, CacheStore};
    use async_trait::async_trait;

    pub(crate) struct StubAgent {
        identity: AgentIdentity,
        provider: &'static str,
    }

    impl StubAgent {
        pub(crate) fn new(provider: &'static str, account: &str, region: &str, class: &str) -> Self {
            Self {
                identity: AgentIdentity::new(account, region, class),
                provider,
            }
        }
    }

    #[async_trait]
    impl CachingAgent for StubAgent {
        fn identity(&self) -> &AgentIdentity {
            &self.identity
        }

        fn provider_name(&self) -> &str {
            self.provider
        }

        fn provided_data_types(&self) -> &[AgentDataType] {
            &[]
        }

        async fn load_data(&self, _cache: &dyn CacheStore) -> Result<CacheResult, AgentError> {
            Ok(CacheResult::new())
        }
    }

    #[test]
    fn test_register_is_keyed_by_agent_type() {
        let registry = AgentRegistry::new();
        assert!(registry.register(Arc::new(StubAgent::new("alicloud", "a", "r", "X"))));
        assert!(!registry.register(Arc::new(StubAgent::new("alicloud", "a", "r", "X"))));
        assert!(registry.register(Arc::new(StubAgent::new("alicloud", "a", "r2", "X"))));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_all_reports_new_types() {
        let registry = AgentRegistry::new();
        let added = registry.register_all(vec![
            Arc::new(StubAgent::new("alicloud", "a", "r", "X")) as Arc<dyn CachingAgent>,
            Arc::new(StubAgent::new("alicloud", "a", "r", "X")),
            Arc::new(StubAgent::new("alicloud", "a", "r", "Y")),
        ]);
        assert_eq!(added, vec!["a/r/X".to_string(), "a/r/Y".to_string()]);
    }

    #[test]
    fn test_scheduled_accounts_per_provider() {
        let registry = AgentRegistry::new();
        registry.register(Arc::new(StubAgent::new("alicloud", "prod", "r", "X")));
        registry.register(Arc::new(StubAgent::new("alicloud", "prod", "r2", "X")));
        registry.register(Arc::new(StubAgent::new("huaweicloud", "hw", "r", "X")));

        let scheduled = registry.scheduled_accounts("alicloud");
        assert_eq!(scheduled.len(), 1);
        assert!(scheduled.contains("prod"));
        assert!(!scheduled.contains("hw"));
    }

    #[test]
    fn test_remove_and_snapshot_order() {
        let registry = AgentRegistry::new();
        registry.register(Arc::new(StubAgent::new("alicloud", "b", "r", "X")));
        registry.register(Arc::new(StubAgent::new("alicloud", "a", "r", "X")));
        let order: Vec<_> = registry.snapshot().iter().map(|a| a.agent_type()).collect();
        assert_eq!(order, vec!["a/r/X", "b/r/X"]);

        assert!(registry.remove("a/r/X").is_some());
        assert!(registry.get("a/r/X").is_none());
    }
}
