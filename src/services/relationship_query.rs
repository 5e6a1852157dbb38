//! Relationship query service.
//!
//! Resolves a cached entity together with an explicit set of relationship
//! namespaces. Related keys are interpreted with the key codecs only; the
//! related entities themselves are fetched solely by the `*_full` and
//! `get_application_cache_data` operations.

use futures::future::try_join_all;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::adapters::keys::KeyCodecRegistry;
use crate::domain::errors::{CacheError, StoreResult};
use crate::domain::models::{CacheData, CacheKey, KeyFields, Namespace, ParsedKey};
use crate::domain::ports::{CacheStore, RelationshipFilter};

/// An entity plus its requested relationships, parsed into key fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEntity {
    pub data: CacheData,
    /// One entry per requested namespace, possibly empty
    pub related: BTreeMap<Namespace, Vec<ParsedKey>>,
}

impl ResolvedEntity {
    pub fn related(&self, namespace: Namespace) -> &[ParsedKey] {
        self.related.get(&namespace).map_or(&[][..], Vec::as_slice)
    }

    /// Group one field of the related keys by another, e.g. cluster names
    /// by account. Keys lacking either field are left out.
    pub fn group_by(
        &self,
        namespace: Namespace,
        group_field: &str,
        value_field: &str,
    ) -> BTreeMap<String, BTreeSet<String>> {
        let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for parsed in self.related(namespace) {
            if let (Some(group), Some(value)) = (parsed.field(group_field), parsed.field(value_field)) {
                groups
                    .entry(group.to_string())
                    .or_default()
                    .insert(value.to_string());
            }
        }
        groups
    }
}

/// An entity plus the full cache data of its requested relationships.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEntityFull {
    pub data: CacheData,
    pub related: BTreeMap<Namespace, Vec<CacheData>>,
}

/// Read path over a cache store.
#[derive(Clone)]
pub struct RelationshipQuery {
    store: Arc<dyn CacheStore>,
    codecs: KeyCodecRegistry,
}

impl RelationshipQuery {
    pub fn new(store: Arc<dyn CacheStore>, codecs: KeyCodecRegistry) -> Self {
        Self { store, codecs }
    }

    pub fn codecs(&self) -> &KeyCodecRegistry {
        &self.codecs
    }

    fn parse_related(&self, data: &CacheData, expand: &[Namespace]) -> BTreeMap<Namespace, Vec<ParsedKey>> {
        expand
            .iter()
            .map(|&namespace| {
                let parsed = data
                    .related(namespace)
                    .map(|key| self.codecs.parse_key(key))
                    .filter(|parsed| {
                        if !parsed.is_valid() {
                            tracing::debug!(key = %parsed.key, %namespace, "Skipping unparseable related key");
                        }
                        parsed.is_valid()
                    })
                    .collect();
                (namespace, parsed)
            })
            .collect()
    }

    /// Resolve one entity. `None` when the root id is not cached.
    pub async fn resolve(
        &self,
        namespace: Namespace,
        id: &str,
        expand: &[Namespace],
    ) -> StoreResult<Option<ResolvedEntity>> {
        let filter = RelationshipFilter::only(expand.iter().copied());
        let Some(data) = self.store.get(namespace, id, &filter).await? else {
            return Ok(None);
        };
        let related = self.parse_related(&data, expand);
        Ok(Some(ResolvedEntity { data, related }))
    }

    /// Resolve one entity and fetch every related entity in full, one
    /// concurrent `get_all` per expanded namespace.
    pub async fn resolve_full(
        &self,
        namespace: Namespace,
        id: &str,
        expand: &[Namespace],
    ) -> StoreResult<Option<ResolvedEntityFull>> {
        let filter = RelationshipFilter::only(expand.iter().copied());
        let Some(data) = self.store.get(namespace, id, &filter).await? else {
            return Ok(None);
        };

        let fetches = expand.iter().map(|&target| {
            let keys: Vec<CacheKey> = data.related(target).cloned().collect();
            async move {
                if keys.is_empty() {
                    return Ok((target, Vec::new()));
                }
                let entities = self
                    .store
                    .get_all(target, Some(&keys), &RelationshipFilter::None)
                    .await?;
                Ok::<_, CacheError>((target, entities))
            }
        });
        let related = try_join_all(fetches).await?.into_iter().collect();
        Ok(Some(ResolvedEntityFull { data, related }))
    }

    /// Cluster names of an application, grouped by account.
    ///
    /// An application that is not cached, or a provider without a codec,
    /// yields an empty map.
    pub async fn application_clusters(
        &self,
        provider: &str,
        application: &str,
    ) -> StoreResult<BTreeMap<String, BTreeSet<String>>> {
        let Some(id) = self.application_key(provider, application) else {
            return Ok(BTreeMap::new());
        };
        Ok(self
            .resolve(Namespace::Applications, &id, &[Namespace::Clusters])
            .await?
            .map(|resolved| resolved.group_by(Namespace::Clusters, "account", "cluster"))
            .unwrap_or_default())
    }

    /// Application with its clusters and server groups fetched in full.
    pub async fn get_application_cache_data(
        &self,
        provider: &str,
        application: &str,
    ) -> StoreResult<Option<ResolvedEntityFull>> {
        let Some(id) = self.application_key(provider, application) else {
            return Ok(None);
        };
        self.resolve_full(
            Namespace::Applications,
            &id,
            &[Namespace::Clusters, Namespace::ServerGroups],
        )
        .await
    }

    /// Every cached application of a provider.
    pub async fn list_applications(
        &self,
        provider: &str,
        expand: &[Namespace],
    ) -> StoreResult<Vec<ResolvedEntity>> {
        let glob = format!("{provider}:*");
        let ids: Vec<CacheKey> = self
            .store
            .filter_identifiers(Namespace::Applications, &glob)
            .await?
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let filter = RelationshipFilter::only(expand.iter().copied());
        let applications = self
            .store
            .get_all(Namespace::Applications, Some(&ids), &filter)
            .await?;
        Ok(applications
            .into_iter()
            .map(|data| {
                let related = self.parse_related(&data, expand);
                ResolvedEntity { data, related }
            })
            .collect())
    }

    fn application_key(&self, provider: &str, application: &str) -> Option<CacheKey> {
        let codec = self.codecs.get(provider)?;
        let fields = KeyFields::from([("application".to_string(), application.to_string())]);
        codec.encode(Namespace::Applications, &fields).ok()
    }
}
