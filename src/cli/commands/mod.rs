//! CLI command implementations.

pub mod agents;
pub mod config;
pub mod keys;
