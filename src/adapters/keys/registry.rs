//! Codec Registry
//!
//! Routes keys to the codec of the provider named in their first segment.

use std::collections::HashMap;
use std::sync::Arc;

use super::alicloud::AlicloudKeys;
use super::huaweicloud::HuaweiCloudKeys;
use crate::domain::models::{KeyFields, ParsedKey, KEY_SEPARATOR};
use crate::domain::ports::KeyCodec;

/// Map of provider id to key codec.
#[derive(Clone, Default)]
pub struct KeyCodecRegistry {
    codecs: HashMap<&'static str, Arc<dyn KeyCodec>>,
}

impl std::fmt::Debug for KeyCodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCodecRegistry")
            .field("providers", &self.providers())
            .finish()
    }
}

impl KeyCodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in provider codec.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AlicloudKeys::new()));
        registry.register(Arc::new(HuaweiCloudKeys::new()));
        registry
    }

    /// Add a codec, replacing any codec already registered for its provider.
    pub fn register(&mut self, codec: Arc<dyn KeyCodec>) {
        self.codecs.insert(codec.provider_id(), codec);
    }

    pub fn get(&self, provider: &str) -> Option<Arc<dyn KeyCodec>> {
        self.codecs.get(provider).cloned()
    }

    /// Registered provider ids, sorted.
    pub fn providers(&self) -> Vec<&'static str> {
        let mut providers: Vec<_> = self.codecs.keys().copied().collect();
        providers.sort_unstable();
        providers
    }

    /// Parse any provider's key. Unknown providers yield an empty map.
    pub fn parse(&self, key: &str) -> KeyFields {
        key.split(KEY_SEPARATOR)
            .next()
            .and_then(|provider| self.codecs.get(provider))
            .map(|codec| codec.parse(key))
            .unwrap_or_default()
    }

    pub fn parse_key(&self, key: &str) -> ParsedKey {
        ParsedKey::new(key, self.parse(key))
    }

    /// Codecs able to parse keys of the given namespace wire name.
    pub fn codecs_for_type(&self, type_name: &str) -> Vec<Arc<dyn KeyCodec>> {
        let mut codecs: Vec<_> = self
            .codecs
            .values()
            .filter(|c| c.can_parse_type(type_name))
            .cloned()
            .collect();
        codecs.sort_by_key(|c| c.provider_id());
        codecs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Namespace;

    #[test]
    fn test_dispatch_by_prefix() {
        let registry = KeyCodecRegistry::with_defaults();
        let ali = registry.parse("alicloud:loadBalancers:acct:cn-test:web");
        assert_eq!(ali["provider"], "alicloud");
        assert_eq!(ali["name"], "web");

        let hw = registry.parse_key("huaweicloud:networks:acct:cn-test:vpc-1");
        assert!(hw.is_valid());
        assert_eq!(hw.namespace(), Some(Namespace::Networks));
    }

    #[test]
    fn test_unknown_provider_is_empty() {
        let registry = KeyCodecRegistry::with_defaults();
        assert!(registry.parse("aws:instances:a:r:i-1").is_empty());
        assert!(registry.parse("").is_empty());
    }

    #[test]
    fn test_codecs_for_type() {
        let registry = KeyCodecRegistry::with_defaults();
        let providers: Vec<_> = registry
            .codecs_for_type("keyPairs")
            .iter()
            .map(|c| c.provider_id())
            .collect();
        assert_eq!(providers, vec!["alicloud"]);
        assert_eq!(registry.codecs_for_type("securityGroups").len(), 2);
        assert_eq!(registry.providers(), vec!["alicloud", "huaweicloud"]);
    }
}
