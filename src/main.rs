//! Cirrus CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cirrus::cli::commands::{agents, config, keys};
use cirrus::cli::{Cli, Commands};
use cirrus::infrastructure::logging::LoggerImpl;

fn main() {
    let cli = Cli::parse();
    let json = cli.json;
    if let Err(err) = run(cli) {
        cirrus::cli::handle_error(err, json);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Keys(args) => {
            tracing_subscriber::registry()
                .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            keys::execute(args, cli.json)
        }
        Commands::Agents(args) => {
            let config = cirrus::cli::load_config(cli.config.as_deref())?;
            let _logger = LoggerImpl::init(&config.logging)?;
            agents::execute(args, &config.accounts, cli.json)
        }
        Commands::Config(args) => {
            let config = cirrus::cli::load_config(cli.config.as_deref())?;
            let _logger = LoggerImpl::init(&config.logging)?;
            config::execute(args, config, cli.json)
        }
    }
}
