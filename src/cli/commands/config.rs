//! Configuration CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cli::output::{list_table, output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Load and validate the configuration
    Check,
    /// Print the effective configuration
    Show,
}

#[derive(Debug, Serialize)]
pub struct ConfigCheckOutput {
    pub valid: bool,
    pub accounts_per_provider: BTreeMap<String, usize>,
    pub regions: usize,
    pub tick_interval_ms: u64,
    pub max_concurrent_agents: usize,
    pub log_level: String,
}

impl From<&Config> for ConfigCheckOutput {
    fn from(config: &Config) -> Self {
        let mut accounts_per_provider = BTreeMap::new();
        for account in &config.accounts {
            *accounts_per_provider
                .entry(account.cloud_provider.clone())
                .or_insert(0) += 1;
        }
        Self {
            valid: true,
            accounts_per_provider,
            regions: config.accounts.iter().map(|a| a.regions.len()).sum(),
            tick_interval_ms: config.scheduler.tick_interval_ms,
            max_concurrent_agents: config.scheduler.max_concurrent_agents,
            log_level: config.logging.level.clone(),
        }
    }
}

impl CommandOutput for ConfigCheckOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["provider", "accounts"]);
        for (provider, count) in &self.accounts_per_provider {
            table.add_row(vec![provider.clone(), count.to_string()]);
        }
        format!(
            "Configuration is valid.\n\
             Scheduler: tick {}ms, {} workers. Log level: {}.\n\
             {} region(s) across {} account(s)\n{table}",
            self.tick_interval_ms,
            self.max_concurrent_agents,
            self.log_level,
            self.regions,
            self.accounts_per_provider.values().sum::<usize>(),
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConfigShowOutput(pub Config);

impl CommandOutput for ConfigShowOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.0).unwrap_or_default()
    }
}

/// Runs against an already loaded and validated config; load errors are
/// reported by the caller.
pub fn execute(args: ConfigArgs, config: Config, json_mode: bool) -> Result<()> {
    match args.command {
        ConfigCommands::Check => output(&ConfigCheckOutput::from(&config), json_mode),
        ConfigCommands::Show => output(&ConfigShowOutput(config), json_mode),
    }
    Ok(())
}
