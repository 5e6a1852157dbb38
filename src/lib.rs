//! Cirrus - multi-cloud resource cache
//!
//! Cirrus keeps a cache of cloud resources (applications, clusters, server
//! groups, load balancers, images, ...) fresh by polling provider APIs
//! through caching agents, and serves a relationship-aware read path over
//! that cache.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): cache data model, errors and port traits
//! - **Adapter Layer** (`adapters`): key codecs, the in-memory store and the
//!   per-provider caching agents
//! - **Service Layer** (`services`): agent registry, synchronizer, scheduler
//!   and relationship queries
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): operator command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use cirrus::{AgentRegistry, AgentScheduler, InMemoryCacheStore, SchedulerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = Arc::new(AgentRegistry::new());
//!     let store = Arc::new(InMemoryCacheStore::new());
//!     let scheduler = Arc::new(AgentScheduler::new(registry, store, SchedulerConfig::default()));
//!     let handle = scheduler.start();
//!     // ... synchronize providers into the registry ...
//!     scheduler.shutdown().await;
//!     handle.await.ok();
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::keys::{AlicloudKeys, HuaweiCloudKeys, KeyCodecRegistry};
pub use adapters::memory::InMemoryCacheStore;
pub use adapters::providers::{AlicloudProvider, HuaweiCloudProvider};
pub use domain::errors::{AgentError, CacheError, KeyError, RunFailure};
pub use domain::models::{
    AccountCredentials, AgentDataType, Authority, CacheData, CacheKey, CacheResult, Config,
    LoggingConfig, Namespace, ParsedKey, SchedulerConfig,
};
pub use domain::ports::{
    AgentIdentity, AgentProvider, CacheStore, CachingAgent, KeyCodec, OnDemandAgent,
    OnDemandRequest, OnDemandResult, OnDemandType, RelationshipFilter,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    AgentRegistry, AgentScheduler, CredentialReloadHandler, ProviderSynchronizer,
    RelationshipQuery,
};
