use serde::{Deserialize, Serialize};

/// A configured cloud account.
///
/// Only the fields needed to decide which agents to schedule are modelled;
/// secrets are resolved by the cloud client factory, not by the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AccountCredentials {
    /// Account name, unique per provider
    pub name: String,

    /// Provider id this account belongs to (e.g. `alicloud`)
    pub cloud_provider: String,

    /// Regions to poll; an account with no regions schedules no agents
    #[serde(default)]
    pub regions: Vec<String>,

    /// Free-form environment label (prod, test, ...)
    #[serde(default)]
    pub environment: Option<String>,
}

impl AccountCredentials {
    pub fn new(
        name: impl Into<String>,
        cloud_provider: impl Into<String>,
        regions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            cloud_provider: cloud_provider.into(),
            regions: regions.into_iter().map(Into::into).collect(),
            environment: None,
        }
    }

    pub fn is_provider(&self, provider_id: &str) -> bool {
        self.cloud_provider == provider_id
    }
}
