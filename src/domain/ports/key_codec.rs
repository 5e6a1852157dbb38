use crate::domain::errors::KeyError;
use crate::domain::models::{CacheKey, KeyFields, Namespace, ParsedKey};

/// Encodes and decodes the structured cache keys of one cloud provider.
///
/// Keys are `<provider>:<namespace>:<field1>:<field2>:...` with a fixed field
/// order and arity per namespace.
pub trait KeyCodec: Send + Sync {
    /// Provider id written as the first key segment.
    fn provider_id(&self) -> &'static str;

    /// Namespaces this provider has a key layout for.
    fn namespaces(&self) -> Vec<Namespace>;

    /// Encode a key from named fields.
    ///
    /// Fields not part of the namespace layout are ignored, so the output of
    /// `parse` can be fed back in. Fails only for an unsupported namespace, a
    /// missing field, or a value that is empty or contains the delimiter.
    fn encode(&self, namespace: Namespace, fields: &KeyFields) -> Result<CacheKey, KeyError>;

    /// Decode a key into `{provider, type, ...fields}`.
    ///
    /// Returns an empty map for malformed or foreign keys; never panics.
    fn parse(&self, key: &str) -> KeyFields;

    /// Whether `parse` can succeed for keys of the given namespace wire name.
    fn can_parse_type(&self, type_name: &str) -> bool;

    /// Whether some namespace of this provider yields `field` when parsed.
    fn can_parse_field(&self, field: &str) -> bool;

    fn parse_key(&self, key: &str) -> ParsedKey {
        ParsedKey::new(key, self.parse(key))
    }
}
