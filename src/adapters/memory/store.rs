//! In-process cache store.
//!
//! Each namespace is a partition behind its own `RwLock`. A `merge_all`
//! applies one namespace at a time under that partition's write guard, so
//! readers see either the previous set or the new one, never a mix.
//!
//! Entities remember which source wrote what. Attributes come from
//! authoritative sources only (merged in source order), relationship edges
//! are the union of every source's edges. A source's informative edges are
//! replaced by its next run, and an entity only informative sources wrote
//! goes away with the last of them.

use async_trait::async_trait;
use globset::GlobBuilder;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::RwLock;

use crate::domain::errors::{CacheError, StoreResult};
use crate::domain::models::{
    AgentDataType, Attributes, Authority, CacheData, CacheKey, CacheResult, Namespace,
    Relationships,
};
use crate::domain::ports::{CacheStore, MergeSummary, RelationshipFilter};

#[derive(Debug, Default)]
struct Entry {
    /// source -> (attributes, edges) written as source of truth
    authoritative: BTreeMap<String, (Attributes, Relationships)>,
    /// source -> edges from that source's latest supplementary write
    informative: BTreeMap<String, Relationships>,
}

impl Entry {
    fn is_empty(&self) -> bool {
        self.authoritative.is_empty() && self.informative.is_empty()
    }

    fn view(&self, id: &str, filter: &RelationshipFilter) -> CacheData {
        let mut data = CacheData::new(id);
        for (attributes, _) in self.authoritative.values() {
            data.attributes
                .extend(attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        let edges = self
            .authoritative
            .values()
            .map(|(_, rels)| rels)
            .chain(self.informative.values());
        for rels in edges {
            for (namespace, keys) in rels {
                if filter.includes(*namespace) {
                    data.relationships
                        .entry(*namespace)
                        .or_default()
                        .extend(keys.iter().cloned());
                }
            }
        }
        data
    }
}

#[derive(Debug, Default)]
struct Partition {
    entries: HashMap<CacheKey, Entry>,
    /// ids each source wrote authoritatively on its latest run
    owned: HashMap<String, BTreeSet<CacheKey>>,
    /// ids each source wrote informatively on its latest run
    informative_owned: HashMap<String, BTreeSet<CacheKey>>,
}

impl Partition {
    fn replace(&mut self, source: &str, data: BTreeMap<CacheKey, CacheData>) -> MergeSummary {
        let mut summary = MergeSummary::default();
        let previous = self.owned.remove(source).unwrap_or_default();

        for stale in previous.iter().filter(|id| !data.contains_key(*id)) {
            let Some(entry) = self.entries.get_mut(stale) else {
                continue;
            };
            entry.authoritative.remove(source);
            if entry.authoritative.is_empty() {
                self.entries.remove(stale);
                summary.evicted += 1;
            }
        }

        let ids: BTreeSet<CacheKey> = data.keys().cloned().collect();
        for (id, item) in data {
            self.entries
                .entry(id)
                .or_default()
                .authoritative
                .insert(source.to_string(), (item.attributes, item.relationships));
            summary.written += 1;
        }
        if !ids.is_empty() {
            self.owned.insert(source.to_string(), ids);
        }
        summary
    }

    fn merge(&mut self, source: &str, data: BTreeMap<CacheKey, CacheData>) -> MergeSummary {
        let mut summary = MergeSummary::default();
        let previous = self.informative_owned.remove(source).unwrap_or_default();

        for stale in previous.iter().filter(|id| !data.contains_key(*id)) {
            let Some(entry) = self.entries.get_mut(stale) else {
                continue;
            };
            entry.informative.remove(source);
            if entry.is_empty() {
                self.entries.remove(stale);
                summary.evicted += 1;
            }
        }

        let ids: BTreeSet<CacheKey> = data.keys().cloned().collect();
        for (id, item) in data {
            self.entries
                .entry(id)
                .or_default()
                .informative
                .insert(source.to_string(), item.relationships);
            summary.written += 1;
        }
        if !ids.is_empty() {
            self.informative_owned.insert(source.to_string(), ids);
        }
        summary
    }

    fn put(&mut self, source: &str, item: CacheData) {
        self.owned
            .entry(source.to_string())
            .or_default()
            .insert(item.id.clone());
        self.entries
            .entry(item.id)
            .or_default()
            .authoritative
            .insert(source.to_string(), (item.attributes, item.relationships));
    }

    fn evict(&mut self, ids: &[CacheKey]) -> usize {
        ids.iter()
            .filter(|id| self.entries.remove(*id).is_some())
            .count()
    }
}

/// Collapse a run's items by id, dropping those keyed for another namespace.
fn collect_items(
    namespace: Namespace,
    items: Vec<CacheData>,
    summary: &mut MergeSummary,
) -> BTreeMap<CacheKey, CacheData> {
    let mut by_id: BTreeMap<CacheKey, CacheData> = BTreeMap::new();
    for item in items {
        if !item.belongs_to(namespace) {
            tracing::warn!(
                namespace = %namespace,
                id = %item.id,
                "Skipping cache data keyed for a different namespace"
            );
            summary.skipped += 1;
            continue;
        }
        match by_id.get_mut(&item.id) {
            Some(existing) => {
                existing.attributes.extend(item.attributes);
                for (ns, keys) in item.relationships {
                    existing.relationships.entry(ns).or_default().extend(keys);
                }
            }
            None => {
                by_id.insert(item.id.clone(), item);
            }
        }
    }
    by_id
}

/// Cache store kept entirely in process memory.
#[derive(Debug)]
pub struct InMemoryCacheStore {
    partitions: HashMap<Namespace, RwLock<Partition>>,
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self {
            partitions: Namespace::ALL
                .iter()
                .map(|ns| (*ns, RwLock::new(Partition::default())))
                .collect(),
        }
    }

    fn partition(&self, namespace: Namespace) -> StoreResult<&RwLock<Partition>> {
        self.partitions.get(&namespace).ok_or_else(|| {
            CacheError::StoreUnavailable(format!("no partition for namespace {namespace}"))
        })
    }

    /// Number of entities in a namespace.
    pub async fn len(&self, namespace: Namespace) -> usize {
        match self.partitions.get(&namespace) {
            Some(p) => p.read().await.entries.len(),
            None => 0,
        }
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(
        &self,
        namespace: Namespace,
        id: &str,
        relationships: &RelationshipFilter,
    ) -> StoreResult<Option<CacheData>> {
        let partition = self.partition(namespace)?.read().await;
        Ok(partition.entries.get(id).map(|e| e.view(id, relationships)))
    }

    async fn get_all(
        &self,
        namespace: Namespace,
        ids: Option<&[CacheKey]>,
        relationships: &RelationshipFilter,
    ) -> StoreResult<Vec<CacheData>> {
        let partition = self.partition(namespace)?.read().await;
        let mut found: Vec<CacheData> = match ids {
            Some(ids) => ids
                .iter()
                .filter_map(|id| partition.entries.get(id).map(|e| e.view(id, relationships)))
                .collect(),
            None => partition
                .entries
                .iter()
                .map(|(id, e)| e.view(id, relationships))
                .collect(),
        };
        if ids.is_none() {
            found.sort_by(|a, b| a.id.cmp(&b.id));
        }
        Ok(found)
    }

    async fn identifiers(&self, namespace: Namespace) -> StoreResult<BTreeSet<CacheKey>> {
        let partition = self.partition(namespace)?.read().await;
        Ok(partition.entries.keys().cloned().collect())
    }

    async fn filter_identifiers(
        &self,
        namespace: Namespace,
        glob: &str,
    ) -> StoreResult<BTreeSet<CacheKey>> {
        let matcher = GlobBuilder::new(glob)
            .literal_separator(false)
            .build()
            .map_err(|e| CacheError::InvalidGlob {
                pattern: glob.to_string(),
                reason: e.kind().to_string(),
            })?
            .compile_matcher();

        let partition = self.partition(namespace)?.read().await;
        Ok(partition
            .entries
            .keys()
            .filter(|id| matcher.is_match(id.as_str()))
            .cloned()
            .collect())
    }

    async fn merge_all(
        &self,
        source: &str,
        provided: &[AgentDataType],
        result: CacheResult,
    ) -> StoreResult<MergeSummary> {
        let (mut data, mut evictions) = result.into_parts();
        let mut total = MergeSummary::default();

        // a declared namespace missing from the result was emptied by the source
        for declared in provided {
            data.entry(declared.namespace).or_default();
        }
        for namespace in evictions.keys() {
            data.entry(*namespace).or_default();
        }

        for (namespace, items) in data {
            let authority = provided
                .iter()
                .find(|t| t.namespace == namespace)
                .map_or(Authority::Informative, |t| t.authority);
            let mut summary = MergeSummary::default();
            let items = collect_items(namespace, items, &mut summary);
            let evict = evictions.remove(&namespace).unwrap_or_default();

            let mut partition = self.partition(namespace)?.write().await;
            summary.absorb(match authority {
                Authority::Authoritative => partition.replace(source, items),
                Authority::Informative => partition.merge(source, items),
            });
            summary.evicted += partition.evict(&evict);
            drop(partition);

            tracing::debug!(
                source,
                namespace = %namespace,
                ?authority,
                written = summary.written,
                evicted = summary.evicted,
                skipped = summary.skipped,
                "Applied cache result"
            );
            total.absorb(summary);
        }
        Ok(total)
    }

    async fn put(&self, source: &str, namespace: Namespace, data: CacheData) -> StoreResult<()> {
        let mut partition = self.partition(namespace)?.write().await;
        tracing::debug!(source, namespace = %namespace, id = %data.id, "Stored single entity");
        partition.put(source, data);
        Ok(())
    }

    async fn evict_all(&self, namespace: Namespace, ids: &[CacheKey]) -> StoreResult<usize> {
        let mut partition = self.partition(namespace)?.write().await;
        Ok(partition.evict(ids))
    }
}
