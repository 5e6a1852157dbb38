//! Cache value types shared by every provider.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use super::namespace::Namespace;

/// Delimiter between cache key segments.
pub const KEY_SEPARATOR: char = ':';

/// `<provider>:<namespace>:<field1>:<field2>:...`
pub type CacheKey = String;

/// Open passthrough attributes mirrored from the provider object.
pub type Attributes = Map<String, Value>;

/// Related keys grouped by the namespace they live in.
pub type Relationships = BTreeMap<Namespace, BTreeSet<CacheKey>>;

/// One cached entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheData {
    pub id: CacheKey,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub relationships: Relationships,
}

impl CacheData {
    pub fn new(id: impl Into<CacheKey>) -> Self {
        Self {
            id: id.into(),
            attributes: Attributes::new(),
            relationships: Relationships::new(),
        }
    }

    /// Build cache data whose attributes mirror the fields of a provider object.
    ///
    /// Fails when the object does not serialize to a JSON object.
    pub fn from_object<T: Serialize>(
        id: impl Into<CacheKey>,
        object: &T,
    ) -> Result<Self, serde_json::Error> {
        let attributes = match serde_json::to_value(object)? {
            Value::Object(map) => map,
            other => {
                return Err(serde::ser::Error::custom(format!(
                    "expected an object, got {other}"
                )))
            }
        };
        Ok(Self {
            id: id.into(),
            attributes,
            relationships: Relationships::new(),
        })
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add a relationship edge to `key` in `namespace`.
    pub fn relate(mut self, namespace: Namespace, key: impl Into<CacheKey>) -> Self {
        self.add_relationship(namespace, key);
        self
    }

    pub fn add_relationship(&mut self, namespace: Namespace, key: impl Into<CacheKey>) {
        self.relationships
            .entry(namespace)
            .or_default()
            .insert(key.into());
    }

    /// Related keys in one namespace; empty when there are none.
    pub fn related(&self, namespace: Namespace) -> impl Iterator<Item = &CacheKey> {
        self.relationships
            .get(&namespace)
            .into_iter()
            .flat_map(BTreeSet::iter)
    }

    /// The provider segment of the id.
    pub fn key_provider(&self) -> Option<&str> {
        self.id.split(KEY_SEPARATOR).next().filter(|p| !p.is_empty())
    }

    /// The namespace segment of the id, as written on the wire.
    pub fn key_namespace(&self) -> Option<&str> {
        self.id.split(KEY_SEPARATOR).nth(1)
    }

    /// Whether the id's namespace segment names `namespace`.
    pub fn belongs_to(&self, namespace: Namespace) -> bool {
        self.key_namespace() == Some(namespace.as_str())
    }
}

/// Whether an agent owns a namespace or only supplements it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Authority {
    /// Source of truth: each run fully replaces the agent's prior set.
    Authoritative,
    /// Supplementary: each run is merged additively into relationship edges.
    Informative,
}

impl Authority {
    pub const fn for_type(self, namespace: Namespace) -> AgentDataType {
        AgentDataType {
            namespace,
            authority: self,
        }
    }
}

/// Static declaration of a namespace an agent produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentDataType {
    pub namespace: Namespace,
    pub authority: Authority,
}

/// Output of one poll cycle, grouped by namespace.
///
/// Namespaces an agent declares but leaves out of its result are treated as
/// empty, which drops everything the agent wrote there previously.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheResult {
    #[serde(default)]
    cache_results: BTreeMap<Namespace, Vec<CacheData>>,
    #[serde(default)]
    evictions: BTreeMap<Namespace, Vec<CacheKey>>,
}

impl CacheResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, namespace: Namespace, data: CacheData) {
        self.cache_results.entry(namespace).or_default().push(data);
    }

    pub fn extend(&mut self, namespace: Namespace, data: impl IntoIterator<Item = CacheData>) {
        self.cache_results.entry(namespace).or_default().extend(data);
    }

    /// Record that `namespace` was polled, even if nothing was found.
    pub fn touch(&mut self, namespace: Namespace) {
        self.cache_results.entry(namespace).or_default();
    }

    /// Request explicit removal of `id` from `namespace` when applied.
    pub fn evict(&mut self, namespace: Namespace, id: impl Into<CacheKey>) {
        self.evictions.entry(namespace).or_default().push(id.into());
    }

    pub fn get(&self, namespace: Namespace) -> &[CacheData] {
        self.cache_results
            .get(&namespace)
            .map_or(&[][..], Vec::as_slice)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = Namespace> + '_ {
        self.cache_results.keys().copied()
    }

    pub fn evictions(&self, namespace: Namespace) -> &[CacheKey] {
        self.evictions.get(&namespace).map_or(&[][..], Vec::as_slice)
    }

    /// Every requested eviction, by namespace.
    pub fn all_evictions(&self) -> impl Iterator<Item = (Namespace, &[CacheKey])> + '_ {
        self.evictions
            .iter()
            .map(|(namespace, ids)| (*namespace, ids.as_slice()))
    }

    /// Total number of entities across all namespaces.
    pub fn len(&self) -> usize {
        self.cache_results.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.evictions.values().all(Vec::is_empty)
    }

    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<Namespace, Vec<CacheData>>,
        BTreeMap<Namespace, Vec<CacheKey>>,
    ) {
        (self.cache_results, self.evictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct FakeLoadBalancer {
        load_balancer_id: String,
        address: String,
    }

    #[test]
    fn test_from_object_mirrors_fields() {
        let lb = FakeLoadBalancer {
            load_balancer_id: "lb-1".into(),
            address: "10.0.0.1".into(),
        };
        let data = CacheData::from_object("alicloud:loadBalancers:a:r:web", &lb).unwrap();
        assert_eq!(data.attributes["loadBalancerId"], json!("lb-1"));
        assert_eq!(data.attributes["address"], json!("10.0.0.1"));
        assert!(data.relationships.is_empty());
    }

    #[test]
    fn test_from_object_rejects_scalars() {
        assert!(CacheData::from_object("k", &42).is_err());
    }

    #[test]
    fn test_key_segments() {
        let data = CacheData::new("huaweicloud:subnets:acct:cn-test:subnet-1");
        assert_eq!(data.key_provider(), Some("huaweicloud"));
        assert_eq!(data.key_namespace(), Some("subnets"));
        assert!(data.belongs_to(Namespace::Subnets));
        assert!(!data.belongs_to(Namespace::Networks));
    }

    #[test]
    fn test_related_is_empty_for_missing_namespace() {
        let data = CacheData::new("alicloud:applications:app")
            .relate(Namespace::Clusters, "alicloud:clusters:app:a:app-main");
        assert_eq!(data.related(Namespace::Clusters).count(), 1);
        assert_eq!(data.related(Namespace::Instances).count(), 0);
    }

    #[test]
    fn test_cache_result_touch_and_evict() {
        let mut result = CacheResult::new();
        result.touch(Namespace::Images);
        result.evict(Namespace::Images, "alicloud:images:a:r:m-1");
        assert_eq!(result.namespaces().collect::<Vec<_>>(), vec![Namespace::Images]);
        assert!(result.get(Namespace::Images).is_empty());
        assert_eq!(result.evictions(Namespace::Images).len(), 1);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_authority_for_type() {
        let t = Authority::Informative.for_type(Namespace::Instances);
        assert_eq!(t.namespace, Namespace::Instances);
        assert_eq!(t.authority, Authority::Informative);
    }
}
