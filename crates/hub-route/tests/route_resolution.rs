//! Route resolution behaviour through the public service API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hub_cache::{Cache, CacheBackend, CacheError, CacheResult, InMemoryBackend, TtlPolicy};
use hub_core::{Distance, Hub, HubId, NewRoute, OutgoingEdge, RouteId, RouteRecord, RouteType};
use hub_graph::{Adjacency, Dijkstra, PathEngine, PathNotFound, PathResult};
use hub_route::{
    EdgeStore, GraphSnapshot, InMemoryEdgeStore, InMemoryHubDirectory, RouteCacheConfig,
    RouteError, RouteService, ShortestRoute, StoreError,
};
use tokio::sync::oneshot;

// =============================================================================
// Fixtures
// =============================================================================

/// Dijkstra that counts invocations.
#[derive(Default)]
struct CountingEngine {
    calls: AtomicUsize,
}

impl CountingEngine {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PathEngine for CountingEngine {
    fn shortest_path(
        &self,
        graph: &Adjacency,
        from: &HubId,
        to: &HubId,
    ) -> Result<PathResult, PathNotFound> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Dijkstra.shortest_path(graph, from, to)
    }
}

/// Backend whose every call fails.
struct FailingBackend;

#[async_trait]
impl CacheBackend for FailingBackend {
    async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Option<Duration>) -> CacheResult<()> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn delete(&self, _key: &str) -> CacheResult<bool> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn delete_prefix(&self, _prefix: &str) -> CacheResult<u64> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn keys(&self, _prefix: &str) -> CacheResult<Vec<String>> {
        Err(CacheError::Backend("connection refused".into()))
    }
}

/// Holds the next call that passes through it until released.
#[derive(Default)]
struct Gate {
    armed: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
}

impl Gate {
    /// Returns a receiver that fires once a call is held, and the sender
    /// that lets it continue.
    fn arm(&self) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (held_tx, held_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        *self.armed.lock().unwrap() = Some((held_tx, release_rx));
        (held_rx, release_tx)
    }

    async fn pass(&self) {
        let armed = self.armed.lock().unwrap().take();
        if let Some((held, release)) = armed {
            let _ = held.send(());
            let _ = release.await;
        }
    }
}

/// In-memory edge store whose `find_all` can be held after reading.
#[derive(Default)]
struct GatedEdgeStore {
    inner: InMemoryEdgeStore,
    gate: Gate,
}

#[async_trait]
impl EdgeStore for GatedEdgeStore {
    async fn insert(&self, route: NewRoute) -> Result<RouteRecord, StoreError> {
        self.inner.insert(route).await
    }

    async fn update(&self, record: RouteRecord) -> Result<RouteRecord, StoreError> {
        self.inner.update(record).await
    }

    async fn delete(&self, id: &RouteId) -> Result<Option<RouteRecord>, StoreError> {
        self.inner.delete(id).await
    }

    async fn find_by_id(&self, id: &RouteId) -> Result<Option<RouteRecord>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_between(
        &self,
        from: &HubId,
        to: &HubId,
    ) -> Result<Option<RouteRecord>, StoreError> {
        self.inner.find_between(from, to).await
    }

    async fn find_from(&self, from: &HubId) -> Result<Vec<RouteRecord>, StoreError> {
        self.inner.find_from(from).await
    }

    async fn find_all(&self) -> Result<Vec<RouteRecord>, StoreError> {
        let records = self.inner.find_all().await?;
        self.gate.pass().await;
        Ok(records)
    }
}

/// In-memory backend that can hold a read of one key after it completes.
struct GatedBackend {
    inner: InMemoryBackend,
    key: &'static str,
    gate: Gate,
}

impl GatedBackend {
    fn on_key(key: &'static str) -> Self {
        Self {
            inner: InMemoryBackend::new(),
            key,
            gate: Gate::default(),
        }
    }
}

#[async_trait]
impl CacheBackend for GatedBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let value = self.inner.get(key).await?;
        if key == self.key {
            self.gate.pass().await;
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        self.inner.delete(key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> CacheResult<u64> {
        self.inner.delete_prefix(prefix).await
    }

    async fn keys(&self, prefix: &str) -> CacheResult<Vec<String>> {
        self.inner.keys(prefix).await
    }
}

struct Fixture {
    service: Arc<RouteService>,
    engine: Arc<CountingEngine>,
    hubs: Arc<InMemoryHubDirectory>,
    edges: Arc<InMemoryEdgeStore>,
}

const HUBS: [(&str, &str, f64, f64); 5] = [
    ("a", "Seoul", 37.56, 126.97),
    ("b", "Daejeon", 36.35, 127.38),
    ("c", "Daegu", 35.87, 128.60),
    ("d", "Busan", 35.18, 129.07),
    ("e", "Jeju", 33.50, 126.53),
];

async fn directory() -> Arc<InMemoryHubDirectory> {
    let hubs = HUBS
        .iter()
        .map(|(id, name, lat, lon)| Hub::with_id(HubId::new(*id), *name, *name, *lat, *lon).unwrap())
        .collect();
    Arc::new(InMemoryHubDirectory::with_hubs(hubs).await.unwrap())
}

async fn fixture_with(backend: Arc<dyn CacheBackend>, config: RouteCacheConfig) -> Fixture {
    let hubs = directory().await;
    let edges = Arc::new(InMemoryEdgeStore::new());
    let engine = Arc::new(CountingEngine::default());

    let service = RouteService::new(
        engine.clone(),
        edges.clone(),
        hubs.clone(),
        backend,
        config,
    );
    Fixture {
        service: Arc::new(service),
        engine,
        hubs,
        edges,
    }
}

async fn fixture() -> (Fixture, Arc<InMemoryBackend>) {
    let backend = Arc::new(InMemoryBackend::new());
    let fixture = fixture_with(backend.clone(), RouteCacheConfig::default()).await;
    (fixture, backend)
}

fn hub(id: &str) -> HubId {
    HubId::new(id)
}

fn km(value: u64) -> Distance {
    Distance::from_whole_km(value)
}

async fn add(service: &RouteService, from: &str, to: &str, distance: u64, minutes: u32) -> RouteId {
    let route = NewRoute::new(hub(from), hub(to), km(distance), minutes).unwrap();
    service.create_route(route).await.unwrap().id
}

async fn shortest(service: &RouteService, from: &str, to: &str) -> ShortestRoute {
    service.get_shortest_route(&hub(from), &hub(to)).await.unwrap()
}

// =============================================================================
// Query resolution
// =============================================================================

#[tokio::test]
async fn test_direct_edge_skips_engine() {
    let (f, _) = fixture().await;
    add(&f.service, "a", "b", 5, 10).await;

    let route = shortest(&f.service, "a", "b").await.into_route().unwrap();

    assert_eq!(route.route_type, RouteType::Direct);
    assert_eq!(route.total_distance, km(5));
    assert_eq!(route.total_time_minutes, 10);
    assert_eq!(route.node_ids(), vec![hub("b")]);
    assert_eq!(route.path[0].name, "Daejeon");
    assert_eq!(route.hops(), 1);
    assert_eq!(f.engine.calls(), 0);
}

#[tokio::test]
async fn test_two_hop_relay() {
    let (f, _) = fixture().await;
    add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;

    let route = shortest(&f.service, "a", "c").await.into_route().unwrap();

    assert_eq!(route.route_type, RouteType::Relay);
    assert_eq!(route.node_ids(), vec![hub("b"), hub("c")]);
    assert_eq!(route.total_distance, km(7));
    assert_eq!(route.total_time_minutes, 11);
    assert_eq!(route.legs[0].from, hub("a"));
    assert_eq!(route.legs[1].distance, km(4));
    assert_eq!(f.engine.calls(), 1);
}

#[tokio::test]
async fn test_repeated_queries_are_identical_and_cached() {
    let (f, backend) = fixture().await;
    add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;
    add(&f.service, "a", "d", 2, 2).await;
    add(&f.service, "d", "c", 5, 1).await;

    let first = shortest(&f.service, "a", "c").await;
    let second = shortest(&f.service, "a", "c").await;

    assert_eq!(first, second);
    assert_eq!(f.engine.calls(), 1);
    assert!(backend.get("relay-route:a:c").await.unwrap().is_some());
}

#[tokio::test]
async fn test_equal_distance_prefers_faster_path() {
    let (f, _) = fixture().await;
    add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;
    add(&f.service, "a", "d", 2, 2).await;
    add(&f.service, "d", "c", 5, 1).await;

    let route = shortest(&f.service, "a", "c").await.into_route().unwrap();
    assert_eq!(route.total_distance, km(7));
    assert_eq!(route.total_time_minutes, 3);
    assert_eq!(route.node_ids(), vec![hub("d"), hub("c")]);
}

#[tokio::test]
async fn test_stored_edge_wins_over_shorter_relay() {
    let (f, _) = fixture().await;
    add(&f.service, "a", "c", 20, 30).await;
    add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;

    let route = shortest(&f.service, "a", "c").await.into_route().unwrap();
    assert_eq!(route.route_type, RouteType::Direct);
    assert_eq!(route.total_distance, km(20));
    assert_eq!(f.engine.calls(), 0);
}

#[tokio::test]
async fn test_self_route_rejected_before_engine() {
    let (f, _) = fixture().await;
    add(&f.service, "a", "b", 1, 1).await;

    let err = f.service.get_shortest_route(&hub("a"), &hub("a")).await.unwrap_err();
    assert_eq!(err, RouteError::SelfRoute(hub("a")));
    assert_eq!(f.engine.calls(), 0);

    let looped = NewRoute {
        from: hub("a"),
        to: hub("a"),
        distance: km(1),
        time_minutes: 1,
    };
    assert_eq!(
        f.service.create_route(looped).await.unwrap_err(),
        RouteError::SelfRoute(hub("a"))
    );
}

#[tokio::test]
async fn test_disconnected_hubs_yield_no_route() {
    let (f, _) = fixture().await;
    add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;

    assert_eq!(
        shortest(&f.service, "a", "e").await,
        ShortestRoute::NoRoute {
            from: hub("a"),
            to: hub("e"),
        }
    );
    // Edges are directed.
    assert!(!shortest(&f.service, "c", "a").await.is_found());
}

#[tokio::test]
async fn test_unknown_or_deleted_hub_is_not_found() {
    let (f, _) = fixture().await;

    let err = f.service.get_shortest_route(&hub("a"), &hub("zz")).await.unwrap_err();
    assert_eq!(err, RouteError::HubNotFound(hub("zz")));

    f.hubs.soft_delete(&hub("e"), "ops").await.unwrap();
    let route = NewRoute::new(hub("a"), hub("e"), km(1), 1).unwrap();
    assert_eq!(
        f.service.create_route(route).await.unwrap_err(),
        RouteError::HubNotFound(hub("e"))
    );
}

#[tokio::test]
async fn test_get_direct_route() {
    let (f, backend) = fixture().await;
    add(&f.service, "a", "b", 5, 10).await;

    let direct = f.service.get_direct_route(&hub("a"), &hub("b")).await.unwrap().unwrap();
    assert_eq!(direct.route_type, RouteType::Direct);
    assert_eq!(direct.total_distance, km(5));

    assert!(f.service.get_direct_route(&hub("b"), &hub("a")).await.unwrap().is_none());
    assert!(backend.get("route:b:a").await.unwrap().is_none());
}

#[tokio::test]
async fn test_relay_results_use_current_hub_names() {
    let (f, _) = fixture().await;
    add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;
    shortest(&f.service, "a", "c").await;

    f.hubs
        .update_details(&hub("b"), "Daejeon Central", "Daejeon", 36.35, 127.38)
        .await
        .unwrap();

    let route = shortest(&f.service, "a", "c").await.into_route().unwrap();
    assert_eq!(route.path[0].name, "Daejeon Central");
    assert_eq!(f.engine.calls(), 1);
}

// =============================================================================
// Mutations and cache synchronization
// =============================================================================

#[tokio::test]
async fn test_create_route_writes_through() {
    let (f, backend) = fixture().await;
    let view = f
        .service
        .create_route(NewRoute::new(hub("a"), hub("b"), km(5), 10).unwrap())
        .await
        .unwrap();

    assert_eq!(view.from.name, "Seoul");
    assert_eq!(view.to.name, "Daejeon");

    let cache = Cache::new(backend);
    let edges: Vec<OutgoingEdge> = cache.get("graph:a").await.unwrap().unwrap();
    assert_eq!(edges.len(), 1);
    let record: RouteRecord = cache.get("route:a:b").await.unwrap().unwrap();
    assert_eq!(record.id, view.id);
}

#[tokio::test]
async fn test_duplicate_pair_rejected() {
    let (f, _) = fixture().await;
    add(&f.service, "a", "b", 5, 10).await;

    let again = NewRoute::new(hub("a"), hub("b"), km(6), 11).unwrap();
    assert_eq!(
        f.service.create_route(again).await.unwrap_err(),
        RouteError::RouteAlreadyExists {
            from: hub("a"),
            to: hub("b"),
        }
    );
    // The reverse direction is a separate route.
    add(&f.service, "b", "a", 5, 10).await;
}

#[tokio::test]
async fn test_update_invalidates_relay_paths() {
    let (f, _) = fixture().await;
    let ab = add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;

    let before = shortest(&f.service, "a", "c").await.into_route().unwrap();
    assert_eq!(before.total_distance, km(7));

    let view = f.service.update_route(&ab, km(10), 20).await.unwrap();
    assert_eq!(view.distance, km(10));
    assert_eq!(view.from.id, hub("a"));

    let after = shortest(&f.service, "a", "c").await.into_route().unwrap();
    assert_eq!(after.total_distance, km(14));
    assert_eq!(after.total_time_minutes, 26);

    let direct = shortest(&f.service, "a", "b").await.into_route().unwrap();
    assert_eq!(direct.total_distance, km(10));
}

#[tokio::test]
async fn test_update_can_reroute() {
    let (f, _) = fixture().await;
    let ab = add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;
    add(&f.service, "a", "d", 5, 5).await;
    add(&f.service, "d", "c", 5, 5).await;

    let before = shortest(&f.service, "a", "c").await.into_route().unwrap();
    assert_eq!(before.node_ids(), vec![hub("b"), hub("c")]);

    f.service.update_route(&ab, km(30), 5).await.unwrap();

    let after = shortest(&f.service, "a", "c").await.into_route().unwrap();
    assert_eq!(after.node_ids(), vec![hub("d"), hub("c")]);
    assert_eq!(after.total_distance, km(10));
}

#[tokio::test]
async fn test_delete_falls_through_to_relay_then_no_route() {
    let (f, backend) = fixture().await;
    add(&f.service, "a", "b", 3, 5).await;
    let bc = add(&f.service, "b", "c", 4, 6).await;
    let ac = add(&f.service, "a", "c", 20, 30).await;

    assert_eq!(
        shortest(&f.service, "a", "c").await.route().unwrap().route_type,
        RouteType::Direct
    );

    let removed = f.service.delete_route(&ac).await.unwrap();
    assert_eq!(removed.id, ac);
    assert!(backend.get("route:a:c").await.unwrap().is_none());
    let cache = Cache::new(backend.clone());
    let edges: Vec<OutgoingEdge> = cache.get("graph:a").await.unwrap().unwrap();
    assert_eq!(edges.iter().map(|e| e.to.clone()).collect::<Vec<_>>(), vec![hub("b")]);

    let relay = shortest(&f.service, "a", "c").await.into_route().unwrap();
    assert_eq!(relay.route_type, RouteType::Relay);
    assert_eq!(relay.total_distance, km(7));

    f.service.delete_route(&bc).await.unwrap();
    assert!(backend.get("graph:b").await.unwrap().is_none());
    assert!(!shortest(&f.service, "a", "c").await.is_found());
}

#[tokio::test]
async fn test_unknown_route_id() {
    let (f, _) = fixture().await;
    let missing = RouteId::new("missing");

    assert_eq!(
        f.service.update_route(&missing, km(1), 1).await.unwrap_err(),
        RouteError::RouteNotFound(missing.clone())
    );
    assert_eq!(
        f.service.delete_route(&missing).await.unwrap_err(),
        RouteError::RouteNotFound(missing.clone())
    );
    assert!(f.service.get_route(&missing).await.is_err());
}

#[tokio::test]
async fn test_get_and_list_routes() {
    let (f, _) = fixture().await;
    let ab = add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;

    let view = f.service.get_route(&ab).await.unwrap();
    assert_eq!(view.from.name, "Seoul");
    assert_eq!(view.time_minutes, 5);

    let all = f.service.list_routes().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].to.name, "Daegu");
}

#[tokio::test]
async fn test_resolve_hub_by_id_or_name() {
    let (f, _) = fixture().await;
    assert_eq!(f.service.resolve_hub("a").await.unwrap().name, "Seoul");
    assert_eq!(f.service.resolve_hub("Busan").await.unwrap().id, hub("d"));
    assert!(matches!(
        f.service.resolve_hub("Gangneung").await,
        Err(RouteError::HubNotFound(_))
    ));
}

// =============================================================================
// Cache lifecycle and failure handling
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_direct_entries_expire() {
    let backend = Arc::new(InMemoryBackend::new());
    let config = RouteCacheConfig {
        direct_ttl_secs: 60,
        ..Default::default()
    };
    let f = fixture_with(backend.clone(), config).await;
    add(&f.service, "a", "b", 5, 10).await;
    assert!(backend.get("route:a:b").await.unwrap().is_some());

    tokio::time::advance(Duration::from_secs(61)).await;
    assert!(backend.get("route:a:b").await.unwrap().is_none());
    // Graph entries do not expire.
    assert!(backend.get("graph:a").await.unwrap().is_some());

    // Read-through repopulates.
    assert!(f.service.get_direct_route(&hub("a"), &hub("b")).await.unwrap().is_some());
    assert!(backend.get("route:a:b").await.unwrap().is_some());
}

#[tokio::test]
async fn test_warm_graph_cache() {
    let (f, backend) = fixture().await;
    add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;
    add(&f.service, "a", "d", 2, 2).await;

    assert_eq!(f.service.warm_graph_cache().await.unwrap(), 2);
    let snapshot: GraphSnapshot = Cache::new(backend)
        .get("graph-meta:snapshot")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.sources, 2);
    assert_eq!(snapshot.edges, 3);
}

#[tokio::test]
async fn test_corrupt_graph_entry_is_rebuilt() {
    let (f, backend) = fixture().await;
    add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;
    f.service.warm_graph_cache().await.unwrap();

    backend.insert_raw("graph:a", b"{not json".to_vec()).await;

    let route = shortest(&f.service, "a", "c").await.into_route().unwrap();
    assert_eq!(route.total_distance, km(7));

    let cache = Cache::new(backend);
    let edges: Vec<OutgoingEdge> = cache.get("graph:a").await.unwrap().unwrap();
    assert_eq!(edges[0].to, hub("b"));
}

#[tokio::test]
async fn test_graph_entries_without_snapshot_are_ignored() {
    let (f, backend) = fixture().await;
    add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;

    // A stale entry claiming a shortcut, with no snapshot marker.
    let cache = Cache::new(backend.clone());
    let shortcut = vec![OutgoingEdge {
        to: hub("d"),
        distance: km(1),
        time_minutes: 1,
    }];
    cache.set("graph:e", &shortcut, TtlPolicy::Persistent).await.unwrap();
    backend.delete("graph-meta:snapshot").await.unwrap();

    assert!(!shortest(&f.service, "e", "d").await.is_found());
    assert!(backend.get("graph-meta:snapshot").await.unwrap().is_some());
    assert!(backend.get("graph:e").await.unwrap().is_none());
}

#[tokio::test]
async fn test_dropped_snapshot_forces_rebuild() {
    let (f, backend) = fixture().await;
    add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;
    f.service.warm_graph_cache().await.unwrap();

    // A route written behind the service's back leaves the graph cache stale.
    f.edges
        .insert(NewRoute::new(hub("c"), hub("d"), km(1), 1).unwrap())
        .await
        .unwrap();
    assert!(!shortest(&f.service, "a", "d").await.is_found());

    f.service.caches().graph.invalidate().await.unwrap();
    assert!(shortest(&f.service, "a", "d").await.is_found());
}

#[tokio::test]
async fn test_failing_cache_never_fails_the_service() {
    let f = fixture_with(Arc::new(FailingBackend), RouteCacheConfig::default()).await;

    let ab = add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;
    f.service.update_route(&ab, km(4), 6).await.unwrap();

    let route = shortest(&f.service, "a", "c").await.into_route().unwrap();
    assert_eq!(route.total_distance, km(8));
    assert_eq!(shortest(&f.service, "a", "b").await.route().unwrap().total_distance, km(4));

    assert_eq!(f.service.warm_graph_cache().await.unwrap(), 2);
    f.service.delete_route(&ab).await.unwrap();
    assert!(!shortest(&f.service, "a", "c").await.is_found());
    assert_eq!(f.edges.snapshot().await.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_queries_agree() {
    let (f, _) = fixture().await;
    add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;
    add(&f.service, "c", "d", 2, 3).await;

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let service = f.service.clone();
            tokio::spawn(async move { service.get_shortest_route(&hub("a"), &hub("d")).await })
        })
        .collect();

    let mut results = Vec::new();
    for task in tasks {
        results.push(task.await.unwrap().unwrap());
    }

    let expected = results[0].clone().into_route().unwrap();
    assert_eq!(expected.total_distance, km(9));
    assert!(results.iter().all(|r| r.route() == Some(&expected)));
}

#[tokio::test]
async fn test_update_during_graph_rebuild_is_not_lost() {
    let backend = Arc::new(InMemoryBackend::new());
    let edges = Arc::new(GatedEdgeStore::default());
    let service = Arc::new(RouteService::new(
        Arc::new(Dijkstra),
        edges.clone(),
        directory().await,
        backend.clone(),
        RouteCacheConfig::default(),
    ));
    let ab = add(&service, "a", "b", 3, 5).await;
    add(&service, "b", "c", 4, 6).await;
    assert!(backend.get("graph-meta:snapshot").await.unwrap().is_none());

    // Hold a cold-cache rebuild after it has read the old routes.
    let (held, release) = edges.gate.arm();
    let racing = tokio::spawn({
        let service = service.clone();
        async move { service.get_shortest_route(&hub("a"), &hub("c")).await }
    });
    held.await.unwrap();

    service.update_route(&ab, km(50), 60).await.unwrap();
    release.send(()).unwrap();

    // The overlapping read may answer from the old routes, but must not
    // publish them as a complete graph.
    let racing = racing.await.unwrap().unwrap().into_route().unwrap();
    assert_eq!(racing.total_distance, km(7));
    assert!(backend.get("graph-meta:snapshot").await.unwrap().is_none());

    for _ in 0..3 {
        let route = shortest(&service, "a", "c").await.into_route().unwrap();
        assert_eq!(route.total_distance, km(54));
        assert_eq!(route.total_time_minutes, 66);
    }
    let cached: Vec<OutgoingEdge> = Cache::new(backend.clone()).get("graph:a").await.unwrap().unwrap();
    assert_eq!(cached[0].distance, km(50));
    assert!(backend.get("graph-meta:snapshot").await.unwrap().is_some());
}

#[tokio::test]
async fn test_relay_from_graph_read_before_update_is_not_served() {
    let backend = Arc::new(GatedBackend::on_key("graph:a"));
    let service = Arc::new(RouteService::new(
        Arc::new(Dijkstra),
        Arc::new(InMemoryEdgeStore::new()),
        directory().await,
        backend.clone(),
        RouteCacheConfig::default(),
    ));
    let ab = add(&service, "a", "b", 3, 5).await;
    add(&service, "b", "c", 4, 6).await;
    service.warm_graph_cache().await.unwrap();

    // Hold a warm-cache read after it has loaded the old `graph:a`.
    let (held, release) = backend.gate.arm();
    let racing = tokio::spawn({
        let service = service.clone();
        async move { service.get_shortest_route(&hub("a"), &hub("c")).await }
    });
    held.await.unwrap();

    service.update_route(&ab, km(50), 60).await.unwrap();
    release.send(()).unwrap();

    let racing = racing.await.unwrap().unwrap().into_route().unwrap();
    assert_eq!(racing.total_distance, km(7));
    // Written after the relay cache was cleared, but stamped with the old revision.
    assert!(backend.get("relay-route:a:c").await.unwrap().is_some());

    let route = shortest(&service, "a", "c").await.into_route().unwrap();
    assert_eq!(route.total_distance, km(54));
}

#[tokio::test(start_paused = true)]
async fn test_relay_entries_expire() {
    let backend = Arc::new(InMemoryBackend::new());
    let config = RouteCacheConfig {
        relay_ttl_secs: 30,
        ..Default::default()
    };
    let f = fixture_with(backend.clone(), config).await;
    add(&f.service, "a", "b", 3, 5).await;
    add(&f.service, "b", "c", 4, 6).await;

    shortest(&f.service, "a", "c").await;
    assert!(backend.get("relay-route:a:c").await.unwrap().is_some());

    tokio::time::advance(Duration::from_secs(31)).await;
    assert!(backend.get("relay-route:a:c").await.unwrap().is_none());
}
