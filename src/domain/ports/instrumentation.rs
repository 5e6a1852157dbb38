use std::time::Duration;

use crate::domain::errors::RunFailure;
use crate::domain::ports::{CachingAgent, MergeSummary};

/// Observer of scheduled agent runs.
pub trait ExecutionInstrumentation: Send + Sync {
    fn execution_started(&self, agent: &dyn CachingAgent);

    fn execution_completed(&self, agent: &dyn CachingAgent, elapsed: Duration, summary: MergeSummary);

    fn execution_failed(&self, agent: &dyn CachingAgent, elapsed: Duration, failure: &RunFailure);
}
