//! In-memory cache store adapter.

pub mod store;

pub use store::InMemoryCacheStore;
