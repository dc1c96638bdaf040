//! Route resolution service.

use std::sync::Arc;

use hub_cache::CacheBackend;
use hub_core::{Distance, HubId, HubSummary, NewRoute, RouteId, RouteRecord};
use hub_graph::{Adjacency, AdjacencyBuilder, PathEngine};
use tracing::{debug, info, instrument, warn};

use crate::caches::RouteCaches;
use crate::config::RouteCacheConfig;
use crate::error::{RouteError, StoreError};
use crate::result::{ComputedPath, RouteResult, RouteView, ShortestRoute};
use crate::store::{EdgeStore, HubLookup};

/// Orchestrates the route store, the three caches and the path engine.
///
/// The service is the only writer of the caches. Share it behind an `Arc`;
/// concurrent calls take no locks beyond those of the collaborators.
pub struct RouteService {
    engine: Arc<dyn PathEngine>,
    edges: Arc<dyn EdgeStore>,
    hubs: Arc<dyn HubLookup>,
    caches: RouteCaches,
}

impl RouteService {
    pub fn new(
        engine: Arc<dyn PathEngine>,
        edges: Arc<dyn EdgeStore>,
        hubs: Arc<dyn HubLookup>,
        cache: Arc<dyn CacheBackend>,
        config: RouteCacheConfig,
    ) -> Self {
        Self {
            engine,
            edges,
            hubs,
            caches: RouteCaches::new(cache, &config),
        }
    }

    /// Cache handles, for inspection.
    pub fn caches(&self) -> &RouteCaches {
        &self.caches
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a route between two active hubs.
    #[instrument(skip_all, fields(from = %route.from, to = %route.to))]
    pub async fn create_route(&self, route: NewRoute) -> Result<RouteView, RouteError> {
        if route.from == route.to {
            return Err(RouteError::SelfRoute(route.from));
        }
        let from = self.require_hub(&route.from).await?;
        let to = self.require_hub(&route.to).await?;

        if self.edges.find_between(&route.from, &route.to).await?.is_some() {
            return Err(RouteError::RouteAlreadyExists {
                from: route.from,
                to: route.to,
            });
        }

        let (from_id, to_id) = (route.from.clone(), route.to.clone());
        let record = self.edges.insert(route).await.map_err(|e| match e {
            StoreError::Conflict(_) => RouteError::RouteAlreadyExists {
                from: from_id,
                to: to_id,
            },
            other => RouteError::Store(other),
        })?;
        info!(route_id = %record.id, distance = %record.distance, "Route created");

        self.caches.sync_saved(self.edges.as_ref(), &record).await;
        Ok(RouteView::new(&record, from, to))
    }

    /// Change a route's distance and travel time. Endpoints are fixed.
    #[instrument(skip_all, fields(route_id = %id))]
    pub async fn update_route(
        &self,
        id: &RouteId,
        distance: Distance,
        time_minutes: u32,
    ) -> Result<RouteView, RouteError> {
        let existing = self
            .edges
            .find_by_id(id)
            .await?
            .ok_or_else(|| RouteError::RouteNotFound(id.clone()))?;
        let from = self.require_hub(&existing.from).await?;
        let to = self.require_hub(&existing.to).await?;

        let record = self
            .edges
            .update(RouteRecord {
                distance,
                time_minutes,
                ..existing
            })
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => RouteError::RouteNotFound(id.clone()),
                other => RouteError::Store(other),
            })?;
        info!(from = %record.from, to = %record.to, distance = %record.distance, "Route updated");

        self.caches.sync_saved(self.edges.as_ref(), &record).await;
        Ok(RouteView::new(&record, from, to))
    }

    /// Remove a route, returning the removed record.
    #[instrument(skip_all, fields(route_id = %id))]
    pub async fn delete_route(&self, id: &RouteId) -> Result<RouteRecord, RouteError> {
        let record = self
            .edges
            .delete(id)
            .await?
            .ok_or_else(|| RouteError::RouteNotFound(id.clone()))?;
        info!(from = %record.from, to = %record.to, "Route deleted");

        self.caches.sync_removed(self.edges.as_ref(), &record).await;
        Ok(record)
    }

    /// Rebuild the graph cache from the route store. Returns the number of
    /// source hubs written.
    #[instrument(skip_all)]
    pub async fn warm_graph_cache(&self) -> Result<usize, RouteError> {
        let revision = self.graph_revision().await;
        let records = self.edges.find_all().await?;
        let graph = AdjacencyBuilder::from_records(&records).build();
        self.publish_graph(&graph, revision).await;
        Ok(graph.source_count())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Look up a stored route by id.
    pub async fn get_route(&self, id: &RouteId) -> Result<RouteView, RouteError> {
        let record = self
            .edges
            .find_by_id(id)
            .await?
            .ok_or_else(|| RouteError::RouteNotFound(id.clone()))?;
        self.view(&record).await
    }

    /// Every stored route, in store order.
    pub async fn list_routes(&self) -> Result<Vec<RouteView>, RouteError> {
        let records = self.edges.find_all().await?;
        let mut views = Vec::with_capacity(records.len());
        for record in &records {
            views.push(self.view(record).await?);
        }
        Ok(views)
    }

    /// The stored route for an exact ordered pair, if any.
    #[instrument(skip_all, fields(from = %from, to = %to))]
    pub async fn get_direct_route(
        &self,
        from: &HubId,
        to: &HubId,
    ) -> Result<Option<RouteResult>, RouteError> {
        if from == to {
            return Err(RouteError::SelfRoute(from.clone()));
        }
        self.require_hub(from).await?;
        let to_hub = self.require_hub(to).await?;

        Ok(self
            .direct_record(from, to)
            .await?
            .map(|record| ComputedPath::direct(&record).into_result(vec![to_hub])))
    }

    /// Lowest-distance route between two hubs, ties broken on travel time.
    ///
    /// A stored edge between the pair is returned as-is without running the
    /// engine, even when a multi-hop path would be shorter.
    #[instrument(skip_all, fields(from = %from, to = %to))]
    pub async fn get_shortest_route(
        &self,
        from: &HubId,
        to: &HubId,
    ) -> Result<ShortestRoute, RouteError> {
        if from == to {
            return Err(RouteError::SelfRoute(from.clone()));
        }
        self.require_hub(from).await?;
        let to_hub = self.require_hub(to).await?;

        if let Some(record) = self.direct_record(from, to).await? {
            return Ok(ShortestRoute::Found(
                ComputedPath::direct(&record).into_result(vec![to_hub]),
            ));
        }

        // Read before the graph, so a racing mutation retires the cached result.
        let revision = self.graph_revision().await;
        let path = match self.cached_relay(from, to, revision).await {
            Some(path) => path,
            None => {
                let graph = self.load_graph(revision).await?;
                let Some(path) = self.compute_relay(&graph, from, to)? else {
                    debug!("No route between hubs");
                    return Ok(ShortestRoute::NoRoute {
                        from: from.clone(),
                        to: to.clone(),
                    });
                };
                if let Some(revision) = revision {
                    if let Err(e) = self.caches.relay.put(from, to, revision, &path).await {
                        warn!(error = %e, "Failed to cache relay path");
                    }
                }
                path
            }
        };

        let mut hubs = Vec::with_capacity(path.nodes.len());
        for node in &path.nodes {
            hubs.push(self.require_hub(node).await?);
        }
        Ok(ShortestRoute::Found(path.into_result(hubs)))
    }

    /// Resolve a hub by id, falling back to its name.
    pub async fn resolve_hub(&self, id_or_name: &str) -> Result<HubSummary, RouteError> {
        if let Some(hub) = self.hubs.find_by_id(&HubId::new(id_or_name)).await? {
            return Ok(hub);
        }
        self.hubs
            .find_by_name(id_or_name)
            .await?
            .ok_or_else(|| RouteError::HubNotFound(HubId::new(id_or_name)))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn require_hub(&self, id: &HubId) -> Result<HubSummary, RouteError> {
        self.hubs
            .find_by_id(id)
            .await?
            .ok_or_else(|| RouteError::HubNotFound(id.clone()))
    }

    async fn view(&self, record: &RouteRecord) -> Result<RouteView, RouteError> {
        let from = self.require_hub(&record.from).await?;
        let to = self.require_hub(&record.to).await?;
        Ok(RouteView::new(record, from, to))
    }

    /// Read-through lookup of the direct-route cache.
    async fn direct_record(
        &self,
        from: &HubId,
        to: &HubId,
    ) -> Result<Option<RouteRecord>, RouteError> {
        match self.caches.direct.get(from, to).await {
            Ok(Some(record)) if record.connects(from, to) => {
                debug!("Direct route cache hit");
                return Ok(Some(record));
            }
            Ok(Some(_)) => warn!("Direct route cache entry for another pair, ignoring"),
            Ok(None) => debug!("Direct route cache miss"),
            Err(e) => warn!(error = %e, "Failed to read direct route cache"),
        }

        let record = self.edges.find_between(from, to).await?;
        if let Some(record) = &record {
            if let Err(e) = self.caches.direct.put(record).await {
                warn!(error = %e, "Failed to cache direct route");
            }
        }
        Ok(record)
    }

    /// Current graph revision, or `None` when it cannot be read. Without a
    /// revision nothing computed is cached.
    async fn graph_revision(&self) -> Option<u64> {
        match self.caches.graph.revision().await {
            Ok(revision) => Some(revision),
            Err(e) => {
                warn!(error = %e, "Failed to read graph revision");
                None
            }
        }
    }

    async fn cached_relay(
        &self,
        from: &HubId,
        to: &HubId,
        revision: Option<u64>,
    ) -> Option<ComputedPath> {
        match self.caches.relay.get(from, to, revision?).await {
            Ok(Some(path)) if path.is_between(from, to) => {
                debug!(hops = path.legs.len(), "Relay path cache hit");
                Some(path)
            }
            Ok(Some(_)) => {
                warn!("Relay path cache entry does not connect the pair, ignoring");
                None
            }
            Ok(None) => {
                debug!("Relay path cache miss");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to read relay path cache");
                None
            }
        }
    }

    /// Full adjacency from the graph cache, rebuilt from the route store when
    /// the cache is cold or unreadable.
    async fn load_graph(&self, revision: Option<u64>) -> Result<Adjacency, RouteError> {
        match self.caches.graph.load().await {
            Ok(Some(graph)) => {
                debug!(sources = graph.source_count(), "Graph cache hit");
                return Ok(graph);
            }
            Ok(None) => debug!("Graph cache cold, rebuilding"),
            Err(e) => warn!(error = %e, "Failed to read graph cache, rebuilding"),
        }

        let records = self.edges.find_all().await?;
        let graph = AdjacencyBuilder::from_records(&records).build();
        self.publish_graph(&graph, revision).await;
        Ok(graph)
    }

    /// Write a rebuilt graph to the cache. `revision` must have been read
    /// before the route store was.
    async fn publish_graph(&self, graph: &Adjacency, revision: Option<u64>) {
        let Some(revision) = revision else {
            return;
        };
        match self.caches.graph.store_all(graph, revision).await {
            Ok(Some(snapshot)) => {
                info!(sources = snapshot.sources, edges = snapshot.edges, "Graph cache rebuilt");
            }
            Ok(None) => debug!("Routes changed during rebuild, snapshot withheld"),
            Err(e) => warn!(error = %e, "Failed to repopulate graph cache"),
        }
    }

    fn compute_relay(
        &self,
        graph: &Adjacency,
        from: &HubId,
        to: &HubId,
    ) -> Result<Option<ComputedPath>, RouteError> {
        let Ok(found) = self.engine.shortest_path(graph, from, to) else {
            return Ok(None);
        };
        debug!(
            hops = found.hops(),
            distance = %found.total_distance,
            "Shortest path computed"
        );

        let legs = graph
            .legs_along(from, &found.nodes)
            .filter(|legs| !legs.is_empty())
            .ok_or_else(|| RouteError::InconsistentPath {
                from: from.clone(),
                to: to.clone(),
            })?;
        Ok(Some(ComputedPath::relay(legs)))
    }
}

impl std::fmt::Debug for RouteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteService")
            .field("caches", &self.caches)
            .finish_non_exhaustive()
    }
}
