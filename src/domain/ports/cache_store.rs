use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::domain::errors::StoreResult;
use crate::domain::models::{AgentDataType, CacheData, CacheKey, CacheResult, Namespace};

/// Which relationship namespaces to include when reading cache data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RelationshipFilter {
    /// Every relationship namespace
    #[default]
    All,
    /// No relationships at all
    None,
    /// Only the listed namespaces
    Only(BTreeSet<Namespace>),
}

impl RelationshipFilter {
    pub fn only(namespaces: impl IntoIterator<Item = Namespace>) -> Self {
        Self::Only(namespaces.into_iter().collect())
    }

    pub fn includes(&self, namespace: Namespace) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Only(set) => set.contains(&namespace),
        }
    }
}

/// Counts describing what a `merge_all` call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Entities written or merged
    pub written: usize,
    /// Entities removed, by authoritative replacement or explicit eviction
    pub evicted: usize,
    /// Entities ignored because their id named a different namespace
    pub skipped: usize,
}

impl MergeSummary {
    pub fn absorb(&mut self, other: Self) {
        self.written += other.written;
        self.evicted += other.evicted;
        self.skipped += other.skipped;
    }
}

/// Backing store for cached entities.
///
/// Implementations must apply one namespace of a `merge_all` atomically with
/// respect to readers, and keep writes from different sources isolated at
/// the namespace-partition level.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch one entity.
    async fn get(
        &self,
        namespace: Namespace,
        id: &str,
        relationships: &RelationshipFilter,
    ) -> StoreResult<Option<CacheData>>;

    /// Fetch many entities; `ids = None` means every entity in the namespace.
    /// Unknown ids are skipped.
    async fn get_all(
        &self,
        namespace: Namespace,
        ids: Option<&[CacheKey]>,
        relationships: &RelationshipFilter,
    ) -> StoreResult<Vec<CacheData>>;

    /// All ids stored in a namespace.
    async fn identifiers(&self, namespace: Namespace) -> StoreResult<BTreeSet<CacheKey>>;

    /// Ids in a namespace matching a glob, e.g. `alicloud:*`.
    async fn filter_identifiers(
        &self,
        namespace: Namespace,
        glob: &str,
    ) -> StoreResult<BTreeSet<CacheKey>>;

    /// Apply the result of one agent run.
    ///
    /// `source` is the agent type. Authoritative namespaces replace the set
    /// the source wrote last time; informative namespaces are merged into the
    /// relationship edges additively.
    async fn merge_all(
        &self,
        source: &str,
        provided: &[AgentDataType],
        result: CacheResult,
    ) -> StoreResult<MergeSummary>;

    /// Upsert one entity as `source`'s authoritative contribution, leaving
    /// the rest of what `source` wrote in place. The id is not checked
    /// against `namespace`.
    async fn put(&self, source: &str, namespace: Namespace, data: CacheData) -> StoreResult<()>;

    /// Remove entities regardless of which source wrote them.
    async fn evict_all(&self, namespace: Namespace, ids: &[CacheKey]) -> StoreResult<usize>;
}
