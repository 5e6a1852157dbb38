//! Top-level CLI argument types.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::agents::AgentsArgs;
use super::commands::config::ConfigArgs;
use super::commands::keys::KeysArgs;

#[derive(Parser, Debug)]
#[command(name = "cirrus")]
#[command(about = "Cirrus - multi-cloud resource cache", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Read configuration from this file instead of .cirrus/
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse and encode cache keys
    Keys(KeysArgs),

    /// List the caching agents the configured accounts schedule
    Agents(AgentsArgs),

    /// Configuration commands
    Config(ConfigArgs),
}
