use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::adapters::keys::{ALICLOUD, HUAWEICLOUD};
use crate::domain::models::config::Config;

/// Provider ids an account may name.
pub const KNOWN_PROVIDERS: &[&str] = &[ALICLOUD, HUAWEICLOUD];

/// Configuration error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid max_concurrent_agents: must be at least 1")]
    ZeroWorkers,

    #[error("Invalid tick_interval_ms: must be at least 1")]
    ZeroTickInterval,

    #[error("Account name cannot be empty")]
    EmptyAccountName,

    #[error("Duplicate account '{name}' for provider {provider}")]
    DuplicateAccount { provider: String, name: String },

    #[error("Account '{account}' names unknown provider '{provider}'")]
    UnknownProvider { account: String, provider: String },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the working directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .cirrus/config.yaml
    /// 3. .cirrus/local.yaml (optional overrides)
    /// 4. Environment variables (CIRRUS_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        Self::load_in(Path::new("."))
    }

    /// Same as [`ConfigLoader::load`] with the `.cirrus` directory under `root`.
    pub fn load_in(root: &Path) -> Result<Config> {
        let dir = root.join(".cirrus");
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed("CIRRUS_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        if config.scheduler.max_concurrent_agents == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if config.scheduler.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        let mut seen = HashSet::new();
        for account in &config.accounts {
            if account.name.is_empty() {
                return Err(ConfigError::EmptyAccountName);
            }
            if !KNOWN_PROVIDERS.contains(&account.cloud_provider.as_str()) {
                return Err(ConfigError::UnknownProvider {
                    account: account.name.clone(),
                    provider: account.cloud_provider.clone(),
                });
            }
            if !seen.insert((account.cloud_provider.as_str(), account.name.as_str())) {
                return Err(ConfigError::DuplicateAccount {
                    provider: account.cloud_provider.clone(),
                    name: account.name.clone(),
                });
            }
        }

        Ok(())
    }
}
