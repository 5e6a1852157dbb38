use serde::Serialize;
use std::collections::HashMap;

use super::cache_data::CacheKey;
use super::namespace::Namespace;

/// Field map produced by a key codec's `parse`. Empty means malformed.
pub type KeyFields = HashMap<String, String>;

/// Field name holding the provider id in every parse result.
pub const PROVIDER_FIELD: &str = "provider";

/// Field name holding the namespace wire name in every parse result.
pub const TYPE_FIELD: &str = "type";

/// A cache key together with its decoded fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedKey {
    pub key: CacheKey,
    pub fields: KeyFields,
}

impl ParsedKey {
    pub fn new(key: impl Into<CacheKey>, fields: KeyFields) -> Self {
        Self {
            key: key.into(),
            fields,
        }
    }

    /// Whether the codec recognised the key.
    pub fn is_valid(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn provider(&self) -> Option<&str> {
        self.field(PROVIDER_FIELD)
    }

    pub fn namespace(&self) -> Option<Namespace> {
        self.field(TYPE_FIELD).and_then(Namespace::from_wire)
    }
}
