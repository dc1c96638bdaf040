//! The three route caches over a shared backend.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hub_cache::{Cache, CacheBackend, CacheResult, TtlPolicy};
use hub_core::{HubId, OutgoingEdge, RouteRecord};
use hub_graph::{Adjacency, AdjacencyBuilder};
use serde::{Deserialize, Serialize};

use crate::config::RouteCacheConfig;
use crate::keys::RouteCacheKeys;
use crate::result::ComputedPath;

/// Marker written once the graph cache holds every source hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub built_at: DateTime<Utc>,
    pub sources: usize,
    pub edges: usize,
}

/// Outgoing edge lists keyed by source hub.
#[derive(Debug, Clone)]
pub struct GraphCache {
    cache: Cache,
    keys: RouteCacheKeys,
}

impl GraphCache {
    /// Assemble the adjacency from cached entries.
    ///
    /// Returns `None` when no snapshot marker is present, meaning the
    /// entries cannot be trusted to be complete.
    pub async fn load(&self) -> CacheResult<Option<Adjacency>> {
        if !self.cache.exists(self.keys.snapshot()).await? {
            return Ok(None);
        }

        let keys = self.cache.keys(&self.keys.graph_prefix()).await?;
        let mut builder = AdjacencyBuilder::with_capacity(keys.len());
        for key in keys {
            let Some(source) = self.keys.graph_source(&key) else {
                continue;
            };
            // Removed between listing and reading.
            let Some(edges) = self.cache.get::<Vec<OutgoingEdge>>(&key).await? else {
                continue;
            };
            builder.add_source(source, edges);
        }
        Ok(Some(builder.build()))
    }

    /// Replace every entry with `graph`, built from store reads taken at
    /// `revision`, and write the snapshot marker last.
    ///
    /// Returns `None` without a marker when a route mutation advanced the
    /// revision meanwhile: the entries may predate it, so the next load
    /// rebuilds.
    pub async fn store_all(
        &self,
        graph: &Adjacency,
        revision: u64,
    ) -> CacheResult<Option<GraphSnapshot>> {
        self.cache.delete(self.keys.snapshot()).await?;
        self.cache.delete_prefix(&self.keys.graph_prefix()).await?;

        for (source, edges) in graph.sources() {
            self.cache
                .set(&self.keys.graph(source), &edges, TtlPolicy::Persistent)
                .await?;
        }
        if self.revision().await? != revision {
            return Ok(None);
        }

        let snapshot = GraphSnapshot {
            built_at: Utc::now(),
            sources: graph.source_count(),
            edges: graph.edge_count(),
        };
        self.cache
            .set(self.keys.snapshot(), &snapshot, TtlPolicy::Persistent)
            .await?;

        // A mutation may have landed between the check and the marker.
        if self.revision().await? != revision {
            self.invalidate().await?;
            return Ok(None);
        }
        Ok(Some(snapshot))
    }

    /// Write one source's edge list; an empty list removes the entry.
    pub async fn put(&self, source: &HubId, edges: &[OutgoingEdge]) -> CacheResult<()> {
        let key = self.keys.graph(source);
        if edges.is_empty() {
            self.cache.delete(&key).await?;
        } else {
            self.cache.set(&key, &edges, TtlPolicy::Persistent).await?;
        }
        Ok(())
    }

    /// Drop the snapshot marker so the next load rebuilds.
    pub async fn invalidate(&self) -> CacheResult<()> {
        self.cache.delete(self.keys.snapshot()).await?;
        Ok(())
    }

    /// Current revision token; zero before the first mutation.
    pub async fn revision(&self) -> CacheResult<u64> {
        Ok(self.cache.get(self.keys.revision()).await?.unwrap_or(0))
    }

    /// Replace the revision token with a fresh random one.
    pub async fn advance_revision(&self) -> CacheResult<u64> {
        let revision: u64 = rand::random();
        self.cache
            .set(self.keys.revision(), &revision, TtlPolicy::Persistent)
            .await?;
        Ok(revision)
    }
}

/// Stored routes keyed by ordered hub pair, with a bounded lifetime.
#[derive(Debug, Clone)]
pub struct DirectRouteCache {
    cache: Cache,
    keys: RouteCacheKeys,
    policy: TtlPolicy,
}

impl DirectRouteCache {
    pub async fn get(&self, from: &HubId, to: &HubId) -> CacheResult<Option<RouteRecord>> {
        self.cache.get(&self.keys.direct(from, to)).await
    }

    pub async fn put(&self, record: &RouteRecord) -> CacheResult<()> {
        let key = self.keys.direct(&record.from, &record.to);
        self.cache.set(&key, record, self.policy).await
    }

    pub async fn remove(&self, from: &HubId, to: &HubId) -> CacheResult<bool> {
        self.cache.delete(&self.keys.direct(from, to)).await
    }
}

/// A relay path with the graph revision it was computed against.
#[derive(Serialize, Deserialize)]
struct RelayEntry {
    revision: u64,
    path: ComputedPath,
}

/// Computed multi-hop paths, cleared as a whole on any route mutation.
///
/// Entries computed against an older graph revision read as misses.
#[derive(Debug, Clone)]
pub struct RelayPathCache {
    cache: Cache,
    keys: RouteCacheKeys,
    policy: TtlPolicy,
}

impl RelayPathCache {
    pub async fn get(
        &self,
        from: &HubId,
        to: &HubId,
        revision: u64,
    ) -> CacheResult<Option<ComputedPath>> {
        let entry: Option<RelayEntry> = self.cache.get(&self.keys.relay(from, to)).await?;
        Ok(entry
            .filter(|entry| entry.revision == revision)
            .map(|entry| entry.path))
    }

    pub async fn put(
        &self,
        from: &HubId,
        to: &HubId,
        revision: u64,
        path: &ComputedPath,
    ) -> CacheResult<()> {
        let entry = RelayEntry {
            revision,
            path: path.clone(),
        };
        self.cache
            .set(&self.keys.relay(from, to), &entry, self.policy)
            .await
    }

    /// Delete every relay entry. Returns how many were removed.
    pub async fn clear(&self) -> CacheResult<u64> {
        self.cache.delete_prefix(&self.keys.relay_prefix()).await
    }
}

/// Graph, direct-route and relay-path caches sharing one backend.
#[derive(Debug, Clone)]
pub struct RouteCaches {
    pub graph: GraphCache,
    pub direct: DirectRouteCache,
    pub relay: RelayPathCache,
}

impl RouteCaches {
    pub fn new(backend: Arc<dyn CacheBackend>, config: &RouteCacheConfig) -> Self {
        let cache = Cache::new(backend);
        let keys = RouteCacheKeys::new(config);
        Self {
            graph: GraphCache {
                cache: cache.clone(),
                keys: keys.clone(),
            },
            direct: DirectRouteCache {
                cache: cache.clone(),
                keys: keys.clone(),
                policy: TtlPolicy::Expiring(config.direct_ttl_secs),
            },
            relay: RelayPathCache {
                cache,
                keys,
                policy: TtlPolicy::Expiring(config.relay_ttl_secs),
            },
        }
    }
}
