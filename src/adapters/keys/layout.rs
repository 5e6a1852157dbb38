//! Table-driven key layouts shared by the provider codecs.
//!
//! A provider declares one [`KeyLayout`] per namespace it supports; the
//! [`LayoutCodec`] turns that table into encode/parse behaviour.

use crate::domain::errors::KeyError;
use crate::domain::models::{
    CacheKey, KeyFields, Names, Namespace, KEY_SEPARATOR, PROVIDER_FIELD, TYPE_FIELD,
};

/// Field names that may be derived from a compound name field.
pub static DERIVED_FIELDS: [&str; 4] = ["application", "stack", "detail", "sequence"];

/// Extra fields decoded from a compound name field on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derived {
    None,
    /// `application` from the named field
    Application { from: &'static str },
    /// `application`, `stack`, `detail` and `sequence` from the named field
    NameComponents { from: &'static str },
}

impl Derived {
    fn field_names(self) -> &'static [&'static str] {
        match self {
            Self::None => &[],
            Self::Application { .. } => &DERIVED_FIELDS[..1],
            Self::NameComponents { .. } => &DERIVED_FIELDS,
        }
    }
}

/// Fixed field order for one namespace.
#[derive(Debug, Clone, Copy)]
pub struct KeyLayout {
    pub namespace: Namespace,
    pub fields: &'static [&'static str],
    pub derived: Derived,
}

impl KeyLayout {
    pub const fn plain(namespace: Namespace, fields: &'static [&'static str]) -> Self {
        Self {
            namespace,
            fields,
            derived: Derived::None,
        }
    }

    pub const fn derived(
        namespace: Namespace,
        fields: &'static [&'static str],
        derived: Derived,
    ) -> Self {
        Self {
            namespace,
            fields,
            derived,
        }
    }

    /// Number of `:`-separated parts in a well-formed key.
    pub const fn arity(&self) -> usize {
        self.fields.len() + 2
    }

    /// Field names a successful parse may emit besides provider and type.
    pub fn derived_fields(&self) -> &'static [&'static str] {
        self.derived.field_names()
    }
}

/// Encode/parse driven by a provider's layout table.
#[derive(Debug, Clone, Copy)]
pub struct LayoutCodec {
    provider: &'static str,
    layouts: &'static [KeyLayout],
}

impl LayoutCodec {
    pub const fn new(provider: &'static str, layouts: &'static [KeyLayout]) -> Self {
        Self { provider, layouts }
    }

    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    pub fn layout(&self, namespace: Namespace) -> Option<&'static KeyLayout> {
        self.layouts.iter().find(|l| l.namespace == namespace)
    }

    pub fn namespaces(&self) -> Vec<Namespace> {
        self.layouts.iter().map(|l| l.namespace).collect()
    }

    /// Join positional values in layout order. Callers guarantee the arity.
    pub fn join(&self, namespace: Namespace, values: &[&str]) -> CacheKey {
        debug_assert_eq!(
            self.layout(namespace).map(|l| l.fields.len()),
            Some(values.len()),
            "wrong field count for {namespace}"
        );
        let mut key = String::with_capacity(
            self.provider.len() + 24 + values.iter().map(|v| v.len() + 1).sum::<usize>(),
        );
        key.push_str(self.provider);
        key.push(KEY_SEPARATOR);
        key.push_str(namespace.as_str());
        for value in values {
            key.push(KEY_SEPARATOR);
            key.push_str(value);
        }
        key
    }

    pub fn encode(&self, namespace: Namespace, fields: &KeyFields) -> Result<CacheKey, KeyError> {
        let layout = self
            .layout(namespace)
            .ok_or_else(|| KeyError::UnsupportedNamespace {
                provider: self.provider.to_string(),
                namespace,
            })?;

        let mut values = Vec::with_capacity(layout.fields.len());
        for name in layout.fields {
            let value = fields.get(*name).ok_or_else(|| KeyError::MissingField {
                namespace,
                field: (*name).to_string(),
            })?;
            if value.is_empty() || value.contains(KEY_SEPARATOR) {
                return Err(KeyError::InvalidFieldValue {
                    field: (*name).to_string(),
                    value: value.clone(),
                });
            }
            values.push(value.as_str());
        }
        Ok(self.join(namespace, &values))
    }

    pub fn parse(&self, key: &str) -> KeyFields {
        self.try_parse(key).unwrap_or_default()
    }

    fn try_parse(&self, key: &str) -> Option<KeyFields> {
        let parts: Vec<&str> = key.split(KEY_SEPARATOR).collect();
        if parts.len() < 2 || parts[0] != self.provider {
            return None;
        }
        let layout = Namespace::from_wire(parts[1]).and_then(|ns| self.layout(ns))?;
        if parts.len() != layout.arity() {
            return None;
        }
        let values = &parts[2..];
        if values.iter().any(|v| v.is_empty()) {
            return None;
        }

        let mut fields = KeyFields::with_capacity(layout.arity() + DERIVED_FIELDS.len());
        fields.insert(PROVIDER_FIELD.to_string(), self.provider.to_string());
        fields.insert(TYPE_FIELD.to_string(), parts[1].to_string());
        for (name, value) in layout.fields.iter().zip(values) {
            fields.insert((*name).to_string(), (*value).to_string());
        }

        match layout.derived {
            Derived::None => {}
            Derived::Application { from } => {
                let names = Names::parse(fields.get(from)?)?;
                fields.insert("application".to_string(), names.app);
            }
            Derived::NameComponents { from } => {
                let names = Names::parse(fields.get(from)?)?;
                fields.insert("application".to_string(), names.app);
                if let Some(stack) = names.stack {
                    fields.insert("stack".to_string(), stack);
                }
                if let Some(detail) = names.detail {
                    fields.insert("detail".to_string(), detail);
                }
                if let Some(sequence) = names.sequence {
                    fields.insert("sequence".to_string(), sequence.to_string());
                }
            }
        }
        Some(fields)
    }

    pub fn can_parse_type(&self, type_name: &str) -> bool {
        Namespace::from_wire(type_name).is_some_and(|ns| self.layout(ns).is_some())
    }

    pub fn can_parse_field(&self, field: &str) -> bool {
        field == PROVIDER_FIELD
            || field == TYPE_FIELD
            || self.layouts.iter().any(|l| {
                l.fields.contains(&field) || l.derived_fields().contains(&field)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUTS: &[KeyLayout] = &[
        KeyLayout::plain(Namespace::Images, &["account", "region", "id"]),
        KeyLayout::derived(
            Namespace::SecurityGroups,
            &["account", "region", "name", "id"],
            Derived::Application { from: "name" },
        ),
    ];

    const CODEC: LayoutCodec = LayoutCodec::new("test", LAYOUTS);

    #[test]
    fn test_arity_mismatch_is_empty() {
        assert!(CODEC.parse("test:images:acct:region").is_empty());
        assert!(CODEC.parse("test:images:acct:region:id:extra").is_empty());
    }

    #[test]
    fn test_empty_segment_is_empty() {
        assert!(CODEC.parse("test:images:acct::id").is_empty());
    }

    #[test]
    fn test_foreign_provider_is_empty() {
        assert!(CODEC.parse("other:images:acct:region:id").is_empty());
    }

    #[test]
    fn test_undecomposable_name_is_all_or_nothing() {
        assert!(CODEC.parse("test:securityGroups:acct:r:-bad:sg-1").is_empty());
        let ok = CODEC.parse("test:securityGroups:acct:r:web-prod:sg-1");
        assert_eq!(ok["application"], "web");
    }

    #[test]
    fn test_encode_rejects_delimiter_and_missing() {
        let mut fields = KeyFields::new();
        fields.insert("account".into(), "a".into());
        fields.insert("region".into(), "r".into());
        assert_eq!(
            CODEC.encode(Namespace::Images, &fields),
            Err(KeyError::MissingField {
                namespace: Namespace::Images,
                field: "id".into()
            })
        );

        fields.insert("id".into(), "m:1".into());
        assert!(matches!(
            CODEC.encode(Namespace::Images, &fields),
            Err(KeyError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn test_encode_unsupported_namespace() {
        assert!(matches!(
            CODEC.encode(Namespace::Clusters, &KeyFields::new()),
            Err(KeyError::UnsupportedNamespace { .. })
        ));
    }

    #[test]
    fn test_capability_queries() {
        assert!(CODEC.can_parse_type("images"));
        assert!(!CODEC.can_parse_type("clusters"));
        assert!(!CODEC.can_parse_type("bogus"));
        assert!(CODEC.can_parse_field("application"));
        assert!(CODEC.can_parse_field("region"));
        assert!(!CODEC.can_parse_field("stack"));
    }
}
