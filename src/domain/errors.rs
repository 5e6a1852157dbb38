//! Domain errors for the cirrus resource cache.

use std::time::Duration;
use thiserror::Error;

use super::models::Namespace;

/// Errors raised by the cache store and the read path.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid identifier glob '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    #[error("Namespace {namespace} is not supported by provider {provider}")]
    UnsupportedNamespace { provider: String, namespace: Namespace },

    #[error("Key {id} does not belong to namespace {namespace}")]
    NamespaceMismatch { namespace: Namespace, id: String },
}

impl CacheError {
    /// Whether the caller may retry the same operation later.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

pub type StoreResult<T> = Result<T, CacheError>;

/// Errors from the generic, field-map based key encoder.
///
/// The typed per-namespace constructors on each codec never fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Provider {provider} has no key layout for namespace {namespace}")]
    UnsupportedNamespace { provider: String, namespace: Namespace },

    #[error("Missing field '{field}' for namespace {namespace}")]
    MissingField { namespace: Namespace, field: String },

    #[error("Invalid value for field '{field}': {value:?}")]
    InvalidFieldValue { field: String, value: String },
}

/// Errors a caching agent may return from a poll cycle.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Cloud API call {operation} failed: {message}")]
    Client { operation: String, message: String },

    #[error("Failed to map provider object {object}: {message}")]
    Mapping { object: String, message: String },

    #[error("Cache read failed during poll: {0}")]
    Store(#[from] CacheError),
}

impl AgentError {
    pub fn client(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::Client {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    pub fn mapping(object: impl Into<String>, message: impl ToString) -> Self {
        Self::Mapping {
            object: object.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        Self::mapping("provider object", err)
    }
}

/// Why a scheduled agent run produced no applied result.
#[derive(Debug, Error)]
pub enum RunFailure {
    #[error("poll failed: {0}")]
    Poll(#[from] AgentError),

    #[error("poll exceeded timeout of {}ms", .limit.as_millis())]
    Timeout { limit: Duration },

    #[error("applying result failed: {0}")]
    Store(#[from] CacheError),
}

impl RunFailure {
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
