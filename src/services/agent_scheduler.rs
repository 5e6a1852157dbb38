//! Agent scheduler.
//!
//! Each tick walks the registry and dispatches every due agent onto a
//! bounded worker pool. An agent never runs concurrently with itself: a due
//! agent that is still running is skipped, not queued. A poll that fails or
//! outlives its timeout is discarded and the cache is left untouched; only
//! a successful poll's result reaches `merge_all`.
//!
//! On-demand refreshes bypass the tick: they call the matching agents'
//! `handle` directly and make the owning agent due at once.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::agent_registry::AgentRegistry;
use crate::domain::errors::RunFailure;
use crate::domain::models::SchedulerConfig;
use crate::domain::ports::{
    CacheStore, CachingAgent, ExecutionInstrumentation, MergeSummary, OnDemandRequest,
    OnDemandResult, OnDemandType,
};

/// Run counters for one agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentRunStats {
    pub runs: u64,
    pub successes: u64,
    /// Failed runs, timeouts included
    pub failures: u64,
    pub timeouts: u64,
    /// Ticks that found the agent still running
    pub skipped: u64,
    pub last_duration_ms: Option<u64>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Result of a single dispatch attempt.
#[derive(Debug)]
pub enum RunOutcome {
    Applied(MergeSummary),
    Failed(RunFailure),
    /// Another run of the same agent was in flight
    AlreadyRunning,
    NotRegistered,
    ShutDown,
}

impl RunOutcome {
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Counts from one scheduler tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub dispatched: usize,
    pub skipped_running: usize,
    /// Due agents left for the next tick because no worker was free
    pub deferred: usize,
}

/// What shutdown had to do with in-flight runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShutdownReport {
    pub completed: usize,
    pub abandoned: usize,
}

/// Logs agent runs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingInstrumentation;

impl ExecutionInstrumentation for TracingInstrumentation {
    fn execution_started(&self, agent: &dyn CachingAgent) {
        tracing::debug!(
            agent_type = %agent.identity(),
            account = agent.account_name(),
            provider = agent.provider_name(),
            "Caching agent run started"
        );
    }

    fn execution_completed(&self, agent: &dyn CachingAgent, elapsed: Duration, summary: MergeSummary) {
        tracing::info!(
            agent_type = %agent.identity(),
            account = agent.account_name(),
            elapsed_ms = elapsed.as_millis() as u64,
            written = summary.written,
            evicted = summary.evicted,
            skipped = summary.skipped,
            "Caching agent run completed"
        );
    }

    fn execution_failed(&self, agent: &dyn CachingAgent, elapsed: Duration, failure: &RunFailure) {
        if failure.is_timeout() {
            tracing::warn!(
                agent_type = %agent.identity(),
                account = agent.account_name(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Caching agent run timed out"
            );
        } else {
            tracing::warn!(
                agent_type = %agent.identity(),
                account = agent.account_name(),
                elapsed_ms = elapsed.as_millis() as u64,
                error = %failure,
                "Caching agent run failed"
            );
        }
    }
}

#[derive(Debug)]
struct AgentState {
    running: AtomicBool,
    next_run: Mutex<Instant>,
}

impl AgentState {
    fn new(due: Instant) -> Self {
        Self {
            running: AtomicBool::new(false),
            next_run: Mutex::new(due),
        }
    }

    fn is_due(&self, now: Instant) -> bool {
        *lock(&self.next_run) <= now
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn make_due(&self) {
        *lock(&self.next_run) = Instant::now();
    }

    /// Claim the single-flight flag. `None` when a run is already in flight.
    fn try_claim(self: &Arc<Self>) -> Option<RunClaim> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunClaim(Arc::clone(self)))
    }
}

/// Holds an agent's single-flight flag; released on drop, including when
/// the run's task is aborted.
struct RunClaim(Arc<AgentState>);

impl RunClaim {
    fn reschedule(&self, after: Duration) {
        *lock(&self.0.next_run) = Instant::now() + after;
    }
}

impl Drop for RunClaim {
    fn drop(&mut self) {
        self.0.running.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Everything a run needs, cloneable into a spawned task.
#[derive(Clone)]
struct RunContext {
    store: Arc<dyn CacheStore>,
    instrumentation: Arc<dyn ExecutionInstrumentation>,
    stats: Arc<DashMap<String, AgentRunStats>>,
}

impl RunContext {
    async fn execute(&self, agent: Arc<dyn CachingAgent>, claim: RunClaim) -> RunOutcome {
        let agent_type = agent.agent_type();
        let limit = agent.timeout();
        self.instrumentation.execution_started(agent.as_ref());
        let started = Instant::now();

        let applied = match tokio::time::timeout(limit, agent.load_data(self.store.as_ref())).await {
            Err(_) => Err(RunFailure::Timeout { limit }),
            Ok(Err(e)) => Err(RunFailure::Poll(e)),
            Ok(Ok(result)) => self
                .store
                .merge_all(&agent_type, agent.provided_data_types(), result)
                .await
                .map_err(RunFailure::Store),
        };
        let elapsed = started.elapsed();

        let mut stats = self.stats.entry(agent_type).or_default();
        stats.runs += 1;
        stats.last_duration_ms = Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
        match applied {
            Ok(summary) => {
                stats.successes += 1;
                stats.last_success = Some(Utc::now());
                drop(stats);
                claim.reschedule(agent.poll_interval());
                self.instrumentation
                    .execution_completed(agent.as_ref(), elapsed, summary);
                RunOutcome::Applied(summary)
            }
            Err(failure) => {
                stats.failures += 1;
                if failure.is_timeout() {
                    stats.timeouts += 1;
                }
                stats.last_error = Some(failure.to_string());
                drop(stats);
                claim.reschedule(agent.error_interval());
                self.instrumentation
                    .execution_failed(agent.as_ref(), elapsed, &failure);
                RunOutcome::Failed(failure)
            }
        }
    }
}

/// Polls registered agents on their intervals.
pub struct AgentScheduler {
    registry: Arc<AgentRegistry>,
    context: RunContext,
    config: SchedulerConfig,
    permits: Arc<Semaphore>,
    states: DashMap<String, Arc<AgentState>>,
    tasks: Mutex<JoinSet<()>>,
    cancel: CancellationToken,
}

impl AgentScheduler {
    pub fn new(
        registry: Arc<AgentRegistry>,
        store: Arc<dyn CacheStore>,
        config: SchedulerConfig,
    ) -> Self {
        Self::with_instrumentation(registry, store, config, Arc::new(TracingInstrumentation))
    }

    pub fn with_instrumentation(
        registry: Arc<AgentRegistry>,
        store: Arc<dyn CacheStore>,
        config: SchedulerConfig,
        instrumentation: Arc<dyn ExecutionInstrumentation>,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_agents.max(1)));
        Self {
            registry,
            context: RunContext {
                store,
                instrumentation,
                stats: Arc::new(DashMap::new()),
            },
            config,
            permits,
            states: DashMap::new(),
            tasks: Mutex::new(JoinSet::new()),
            cancel: CancellationToken::new(),
        }
    }

    fn state(&self, agent_type: &str, now: Instant) -> Arc<AgentState> {
        if let Some(state) = self.states.get(agent_type) {
            return Arc::clone(state.value());
        }
        Arc::clone(
            self.states
                .entry(agent_type.to_string())
                .or_insert_with(|| Arc::new(AgentState::new(now)))
                .value(),
        )
    }

    fn record_skip(&self, agent_type: &str) {
        self.context
            .stats
            .entry(agent_type.to_string())
            .or_default()
            .skipped += 1;
        tracing::debug!(agent_type, "Agent still running, skipping tick");
    }

    /// Dispatch every due agent that is idle and can get a worker.
    pub fn tick(&self) -> TickReport {
        let mut report = TickReport::default();
        if self.cancel.is_cancelled() {
            return report;
        }

        let mut tasks = lock(&self.tasks);
        while let Some(joined) = tasks.try_join_next() {
            if let Err(e) = joined {
                if e.is_panic() {
                    tracing::error!(error = %e, "Caching agent task panicked");
                }
            }
        }

        let agents = self.registry.snapshot();
        let live: HashSet<String> = agents.iter().map(|a| a.agent_type()).collect();
        // a removed agent keeps its state until its last run finishes
        self.states
            .retain(|agent_type, state| live.contains(agent_type) || state.is_running());
        self.context
            .stats
            .retain(|agent_type, _| live.contains(agent_type));

        let now = Instant::now();
        for agent in agents {
            let agent_type = agent.agent_type();
            let state = self.state(&agent_type, now);
            if !state.is_due(now) {
                continue;
            }
            if state.is_running() {
                self.record_skip(&agent_type);
                report.skipped_running += 1;
                continue;
            }
            let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() else {
                report.deferred += 1;
                continue;
            };
            let Some(claim) = state.try_claim() else {
                self.record_skip(&agent_type);
                report.skipped_running += 1;
                continue;
            };

            let context = self.context.clone();
            tasks.spawn(async move {
                let _permit = permit;
                context.execute(agent, claim).await;
            });
            report.dispatched += 1;
        }

        if report.deferred > 0 {
            tracing::debug!(deferred = report.deferred, "Worker pool exhausted");
        }
        report
    }

    /// Run one agent now on the calling task, still honouring single-flight
    /// and the worker bound.
    pub async fn run_now(&self, agent_type: &str) -> RunOutcome {
        if self.cancel.is_cancelled() {
            return RunOutcome::ShutDown;
        }
        let Some(agent) = self.registry.get(agent_type) else {
            return RunOutcome::NotRegistered;
        };
        let state = self.state(agent_type, Instant::now());
        let Some(claim) = state.try_claim() else {
            self.record_skip(agent_type);
            return RunOutcome::AlreadyRunning;
        };
        let Ok(_permit) = Arc::clone(&self.permits).acquire_owned().await else {
            return RunOutcome::ShutDown;
        };
        self.context.execute(agent, claim).await
    }

    /// Refresh one resource through every agent that handles `kind` for
    /// `cloud_provider` and is targeted by `request`.
    ///
    /// Evictions in each result are applied at once, and the owning agent is
    /// made due so its next tick picks the change up. Returns nothing once
    /// the scheduler is shut down.
    pub async fn refresh_on_demand(
        &self,
        kind: OnDemandType,
        cloud_provider: &str,
        request: &OnDemandRequest,
    ) -> Result<Vec<OnDemandResult>, RunFailure> {
        let mut handled = Vec::new();
        if self.cancel.is_cancelled() {
            return Ok(handled);
        }
        for agent in self.registry.snapshot() {
            let Some(on_demand) = agent.as_on_demand() else {
                continue;
            };
            if !on_demand.handles(kind, cloud_provider) || !request.targets(agent.identity()) {
                continue;
            }
            let limit = agent.timeout();
            let refreshed =
                tokio::time::timeout(limit, on_demand.handle(self.context.store.as_ref(), request))
                    .await
                    .map_err(|_| RunFailure::Timeout { limit })??;
            let Some(result) = refreshed else {
                continue;
            };

            for (namespace, ids) in result.cache_result.all_evictions() {
                self.context.store.evict_all(namespace, ids).await?;
            }
            self.state(&agent.agent_type(), Instant::now()).make_due();
            tracing::info!(
                agent_type = %result.source_agent_type,
                kind = %kind,
                entities = result.cache_result.len(),
                "Handled on-demand refresh"
            );
            handled.push(result);
        }
        Ok(handled)
    }

    /// Spawn the tick loop. It stops when `shutdown` is called.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(scheduler.config.tick_interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(
                tick_interval_ms = scheduler.config.tick_interval_ms,
                max_concurrent_agents = scheduler.config.max_concurrent_agents,
                "Agent scheduler started"
            );
            loop {
                tokio::select! {
                    () = scheduler.cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        scheduler.tick();
                    }
                }
            }
            tracing::info!("Agent scheduler stopped");
        })
    }

    /// Stop dispatching, wait up to the grace period for in-flight runs,
    /// then abort whatever is left.
    pub async fn shutdown(&self) -> ShutdownReport {
        self.cancel.cancel();
        self.permits.close();
        let mut tasks = std::mem::take(&mut *lock(&self.tasks));
        let mut report = ShutdownReport::default();

        let grace = self.config.shutdown_grace();
        let drained = tokio::time::timeout(grace, async {
            while tasks.join_next().await.is_some() {
                report.completed += 1;
            }
        })
        .await;

        if drained.is_err() {
            report.abandoned = tasks.len();
            tasks.abort_all();
            tracing::warn!(
                abandoned = report.abandoned,
                grace_ms = self.config.shutdown_grace_ms,
                "Abandoning caching agent runs at shutdown"
            );
        }
        report
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Runs spawned by `tick` that have not been reaped yet.
    pub fn in_flight(&self) -> usize {
        lock(&self.tasks).len()
    }

    pub fn stats(&self, agent_type: &str) -> Option<AgentRunStats> {
        self.context.stats.get(agent_type).map(|s| s.value().clone())
    }

    pub fn stats_snapshot(&self) -> BTreeMap<String, AgentRunStats> {
        self.context
            .stats
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }
}
