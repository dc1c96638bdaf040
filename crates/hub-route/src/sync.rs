//! Write-through synchronization after durable route writes.
//!
//! Every step is best effort. A failure is logged and leaves the cache
//! stale; it never undoes the durable write.
//!
//! The graph revision is advanced on both sides of the graph refresh. A
//! rebuild that read the store before the write sees the first change and
//! withholds its snapshot marker. A relay path computed from the graph as it
//! was before the refresh is stamped with a revision the second change
//! retires.

use hub_cache::CacheError;
use hub_core::{HubId, OutgoingEdge, RouteRecord};
use thiserror::Error;
use tracing::{debug, warn};

use crate::caches::RouteCaches;
use crate::error::StoreError;
use crate::store::EdgeStore;

#[derive(Error, Debug)]
enum SyncError {
    #[error("reading outgoing routes failed: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl RouteCaches {
    /// Reflect a created or updated route.
    pub(crate) async fn sync_saved(&self, edges: &dyn EdgeStore, record: &RouteRecord) {
        self.advance_revision().await;
        self.clear_relays().await;
        self.refresh_graph_entry(edges, &record.from).await;

        if let Err(e) = self.direct.put(record).await {
            warn!(route_id = %record.id, error = %e, "Failed to cache direct route");
        }
        self.advance_revision().await;
    }

    /// Reflect a deleted route.
    pub(crate) async fn sync_removed(&self, edges: &dyn EdgeStore, record: &RouteRecord) {
        self.advance_revision().await;
        self.clear_relays().await;
        self.refresh_graph_entry(edges, &record.from).await;

        if let Err(e) = self.direct.remove(&record.from, &record.to).await {
            warn!(route_id = %record.id, error = %e, "Failed to evict direct route");
        }
        self.advance_revision().await;
    }

    async fn advance_revision(&self) {
        if let Err(e) = self.graph.advance_revision().await {
            warn!(error = %e, "Failed to advance graph revision");
        }
    }

    async fn clear_relays(&self) {
        match self.relay.clear().await {
            Ok(cleared) => debug!(cleared, "Cleared relay path cache"),
            Err(e) => warn!(error = %e, "Failed to clear relay path cache"),
        }
    }

    /// Re-read `source`'s outgoing routes and write them to the graph cache.
    /// On failure the snapshot marker is dropped so the next read rebuilds.
    async fn refresh_graph_entry(&self, edges: &dyn EdgeStore, source: &HubId) {
        let Err(e) = self.write_graph_entry(edges, source).await else {
            return;
        };
        warn!(from = %source, error = %e, "Failed to refresh graph cache entry");

        if let Err(e) = self.graph.invalidate().await {
            warn!(error = %e, "Failed to drop graph snapshot marker");
        }
    }

    async fn write_graph_entry(
        &self,
        edges: &dyn EdgeStore,
        source: &HubId,
    ) -> Result<(), SyncError> {
        let outgoing: Vec<OutgoingEdge> = edges
            .find_from(source)
            .await?
            .iter()
            .map(RouteRecord::outgoing)
            .collect();
        self.graph.put(source, &outgoing).await?;
        Ok(())
    }
}
