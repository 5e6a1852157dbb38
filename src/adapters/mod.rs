//! Adapters implementing the domain ports.

pub mod keys;
pub mod memory;
pub mod providers;
