//! Service layer: agent registration, scheduling and the read path.

pub mod agent_registry;
pub mod agent_scheduler;
pub mod provider_synchronizer;
pub mod relationship_query;

pub use agent_registry::{AgentRegistry, ScheduledAccounts};
pub use agent_scheduler::{
    AgentRunStats, AgentScheduler, RunOutcome, ShutdownReport, TickReport, TracingInstrumentation,
};
pub use provider_synchronizer::{
    plan_agents, CredentialReloadHandler, ProviderSynchronizer, SyncReport,
};
pub use relationship_query::{RelationshipQuery, ResolvedEntity, ResolvedEntityFull};
