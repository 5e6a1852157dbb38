//! Common test utilities for integration tests
//!
//! Shared fixtures used across the integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cirrus::domain::ports::{AgentProvider, CacheStore, CachingAgent};
use cirrus::{
    AccountCredentials, AgentDataType, AgentError, AgentIdentity, Authority, CacheData,
    CacheResult, Namespace,
};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

const IMAGE_TYPES: &[AgentDataType] = &[Authority::Authoritative.for_type(Namespace::Images)];

/// Agent that sleeps, then returns one image per call (or fails), while
/// tracking how many of its polls overlap.
pub struct ProbeAgent {
    identity: AgentIdentity,
    provider: &'static str,
    pub delay: Duration,
    pub fail: bool,
    pub timeout: Duration,
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ProbeAgent {
    pub fn new(account: &str, class: &str, delay: Duration) -> Self {
        Self {
            identity: AgentIdentity::new(account, "cn-test", class),
            provider: "alicloud",
            delay,
            fail: false,
            timeout: Duration::from_secs(30),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CachingAgent for ProbeAgent {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn provider_name(&self) -> &str {
        self.provider
    }

    fn provided_data_types(&self) -> &[AgentDataType] {
        IMAGE_TYPES
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(60)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn load_data(&self, _cache: &dyn CacheStore) -> Result<CacheResult, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(AgentError::client("DescribeImages", "InvalidAccessKeyId"));
        }
        let mut result = CacheResult::new();
        result.add(
            Namespace::Images,
            CacheData::new(format!(
                "alicloud:images:{}:cn-test:{}",
                self.identity.account, self.identity.agent_class
            )),
        );
        Ok(result)
    }
}

/// Provider building one `ProbeAgent` per class and region, without any
/// cloud client.
pub struct ProbeProvider {
    pub id: &'static str,
    pub classes: &'static [&'static str],
}

impl AgentProvider for ProbeProvider {
    fn provider_id(&self) -> &'static str {
        self.id
    }

    fn agent_classes(&self) -> &'static [&'static str] {
        self.classes
    }

    fn build_agents(&self, account: &AccountCredentials, region: &str) -> Vec<Arc<dyn CachingAgent>> {
        self.classes
            .iter()
            .map(|class| {
                let mut agent = ProbeAgent::new(&account.name, class, Duration::ZERO);
                agent.identity = AgentIdentity::new(&account.name, region, *class);
                agent.provider = self.id;
                Arc::new(agent) as Arc<dyn CachingAgent>
            })
            .collect()
    }
}
