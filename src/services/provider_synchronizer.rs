//! Provider synchronization.
//!
//! Turns the configured credential set into registered caching agents.
//! Re-running with unchanged credentials registers nothing new; accounts
//! whose credentials disappear keep their agents until removed explicitly.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::agent_registry::{AgentRegistry, ScheduledAccounts};
use crate::domain::models::AccountCredentials;
use crate::domain::ports::{AgentIdentity, AgentProvider};

/// What one synchronization pass did for a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub provider: String,
    /// Agent types added to the registry by this pass
    pub registered: Vec<String>,
    /// Accounts skipped because they were already scheduled
    pub skipped_accounts: BTreeSet<String>,
    /// Agents built but dropped because another pass registered them first
    pub duplicates: usize,
}

/// Registers the agents of one provider.
pub struct ProviderSynchronizer {
    provider: Arc<dyn AgentProvider>,
    registry: Arc<AgentRegistry>,
}

impl ProviderSynchronizer {
    pub fn new(provider: Arc<dyn AgentProvider>, registry: Arc<AgentRegistry>) -> Self {
        Self { provider, registry }
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.provider_id()
    }

    /// Snapshot of accounts currently covered, recomputed on every call.
    pub fn scheduled_accounts(&self) -> ScheduledAccounts {
        self.registry.scheduled_accounts(self.provider.provider_id())
    }

    pub fn synchronize(&self, credentials: &[AccountCredentials]) -> SyncReport {
        let scheduled = self.scheduled_accounts();
        self.synchronize_with(credentials, &scheduled)
    }

    /// Register agents for every matching account not in `scheduled`.
    ///
    /// All new agents are built first and inserted as one batch.
    pub fn synchronize_with(
        &self,
        credentials: &[AccountCredentials],
        scheduled: &ScheduledAccounts,
    ) -> SyncReport {
        let provider_id = self.provider.provider_id();
        let mut report = SyncReport {
            provider: provider_id.to_string(),
            ..SyncReport::default()
        };

        let mut batch = Vec::new();
        for account in credentials.iter().filter(|c| c.is_provider(provider_id)) {
            if scheduled.contains(&account.name) {
                report.skipped_accounts.insert(account.name.clone());
                continue;
            }
            if account.regions.is_empty() {
                tracing::debug!(provider = provider_id, account = %account.name, "Account has no regions");
            }
            for region in &account.regions {
                batch.extend(self.provider.build_agents(account, region));
            }
        }

        let built = batch.len();
        report.registered = self.registry.register_all(batch);
        report.duplicates = built - report.registered.len();

        tracing::info!(
            provider = provider_id,
            registered = report.registered.len(),
            skipped_accounts = report.skipped_accounts.len(),
            duplicates = report.duplicates,
            "Synchronized caching agents"
        );
        report
    }

    /// Agent identities a synchronization would cover, without building
    /// any agent or touching the registry.
    pub fn plan(&self, credentials: &[AccountCredentials]) -> Vec<AgentIdentity> {
        plan_agents(
            self.provider.provider_id(),
            self.provider.agent_classes(),
            credentials,
        )
    }
}

/// Identities of `classes` for every region of every `provider_id` account,
/// in registration order.
pub fn plan_agents(
    provider_id: &str,
    classes: &[&str],
    credentials: &[AccountCredentials],
) -> Vec<AgentIdentity> {
    credentials
        .iter()
        .filter(|c| c.is_provider(provider_id))
        .flat_map(|account| {
            account.regions.iter().flat_map(move |region| {
                classes
                    .iter()
                    .map(move |class| AgentIdentity::new(&account.name, region, *class))
            })
        })
        .collect()
}

/// Fans a credential reload out to every provider's synchronizer.
#[derive(Default)]
pub struct CredentialReloadHandler {
    synchronizers: Vec<ProviderSynchronizer>,
}

impl CredentialReloadHandler {
    pub fn new(synchronizers: Vec<ProviderSynchronizer>) -> Self {
        Self { synchronizers }
    }

    pub fn providers(&self) -> Vec<&'static str> {
        self.synchronizers.iter().map(ProviderSynchronizer::provider_id).collect()
    }

    pub fn on_credentials_changed(&self, credentials: &[AccountCredentials]) -> Vec<SyncReport> {
        for account in credentials {
            if !self
                .synchronizers
                .iter()
                .any(|s| account.is_provider(s.provider_id()))
            {
                tracing::warn!(
                    account = %account.name,
                    provider = %account.cloud_provider,
                    "No provider registered for account"
                );
            }
        }
        self.synchronizers
            .iter()
            .map(|s| s.synchronize(credentials))
            .collect()
    }
}
