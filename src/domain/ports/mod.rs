//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that adapters and services plug into:
//! - KeyCodec: per-provider cache key encoding and parsing
//! - CacheStore: backing store for cached entities
//! - CachingAgent: one pollable unit per (account, region, class)
//! - AgentProvider / ClientFactory: per-provider agent construction
//! - ExecutionInstrumentation: observer of scheduled runs
//! - OnDemandAgent: single-resource refresh outside the poll cycle

pub mod agent_provider;
pub mod cache_store;
pub mod caching_agent;
pub mod instrumentation;
pub mod key_codec;
pub mod on_demand;

pub use agent_provider::{AgentProvider, ClientFactory};
pub use cache_store::{CacheStore, MergeSummary, RelationshipFilter};
pub use caching_agent::{AgentIdentity, CachingAgent, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT};
pub use instrumentation::ExecutionInstrumentation;
pub use key_codec::KeyCodec;
pub use on_demand::{OnDemandAgent, OnDemandRequest, OnDemandResult, OnDemandType, PendingOnDemand};
