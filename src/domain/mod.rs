//! Domain layer for the cirrus resource cache
//!
//! This module contains the cache data model and the port traits that
//! providers, stores and schedulers plug into.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{AgentError, CacheError, KeyError, RunFailure, StoreResult};
