//! Agent CLI commands.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::adapters::providers::AGENT_CATALOG;
use crate::cli::output::{list_table, output, render_list, CommandOutput};
use crate::domain::models::AccountCredentials;
use crate::domain::ports::AgentIdentity;
use crate::services::plan_agents;

#[derive(Args, Debug)]
pub struct AgentsArgs {
    /// Only agents of this provider
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Only agents of this account
    #[arg(short, long)]
    pub account: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedAgent {
    pub provider: String,
    pub agent_type: String,
    #[serde(flatten)]
    pub identity: AgentIdentity,
}

#[derive(Debug, Serialize)]
pub struct AgentListOutput {
    pub agents: Vec<PlannedAgent>,
    pub total: usize,
}

impl CommandOutput for AgentListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["provider", "account", "region", "agent"]);
        for agent in &self.agents {
            table.add_row(vec![
                agent.provider.as_str(),
                agent.identity.account.as_str(),
                agent.identity.region.as_str(),
                agent.identity.agent_class.as_str(),
            ]);
        }
        render_list("agent", &table, self.total)
    }
}

/// Agents one synchronization pass would register for `accounts`, in
/// registration order. Accounts of unknown providers plan nothing.
pub fn plan(accounts: &[AccountCredentials]) -> Vec<PlannedAgent> {
    AGENT_CATALOG
        .iter()
        .flat_map(|(provider, classes)| {
            plan_agents(provider, classes, accounts)
                .into_iter()
                .map(move |identity| PlannedAgent {
                    provider: (*provider).to_string(),
                    agent_type: identity.to_string(),
                    identity,
                })
        })
        .collect()
}

pub fn execute(args: AgentsArgs, accounts: &[AccountCredentials], json_mode: bool) -> Result<()> {
    let agents: Vec<PlannedAgent> = plan(accounts)
        .into_iter()
        .filter(|a| args.provider.as_ref().is_none_or(|p| &a.provider == p))
        .filter(|a| args.account.as_ref().is_none_or(|n| &a.identity.account == n))
        .collect();
    let out = AgentListOutput {
        total: agents.len(),
        agents,
    };
    output(&out, json_mode);
    Ok(())
}
