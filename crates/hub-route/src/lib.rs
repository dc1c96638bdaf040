//! Hub route resolution.
//!
//! [`RouteService`] answers direct and shortest-route queries between hubs and
//! keeps three caches consistent with the route store:
//!
//! - **Graph cache**: outgoing edges per hub (`graph:{source}`), trusted only
//!   while the snapshot marker is present
//! - **Direct-route cache**: one stored route per ordered pair
//!   (`route:{from}:{to}`), with a TTL
//! - **Relay-path cache**: computed multi-hop paths
//!   (`relay-route:{from}:{to}`), cleared on every route mutation
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hub_cache::InMemoryBackend;
//! use hub_graph::Dijkstra;
//! use hub_route::{InMemoryEdgeStore, InMemoryHubDirectory, RouteCacheConfig, RouteService};
//!
//! let service = RouteService::new(
//!     Arc::new(Dijkstra),
//!     Arc::new(InMemoryEdgeStore::new()),
//!     Arc::new(directory),
//!     Arc::new(InMemoryBackend::new()),
//!     RouteCacheConfig::default(),
//! );
//!
//! match service.get_shortest_route(&from, &to).await? {
//!     ShortestRoute::Found(route) => println!("{} via {} hops", route.total_distance, route.hops()),
//!     ShortestRoute::NoRoute { .. } => println!("unreachable"),
//! }
//! ```

mod caches;
mod config;
mod error;
mod keys;
mod memory;
mod result;
mod service;
mod store;
mod sync;

pub use caches::{DirectRouteCache, GraphCache, GraphSnapshot, RelayPathCache, RouteCaches};
pub use config::{ConfigError, RouteCacheConfig};
pub use error::{RouteError, StoreError};
pub use keys::RouteCacheKeys;
pub use memory::{InMemoryEdgeStore, InMemoryHubDirectory};
pub use result::{ComputedPath, RouteResult, RouteView, ShortestRoute};
pub use service::RouteService;
pub use store::{EdgeStore, HubLookup};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        EdgeStore, HubLookup, RouteCacheConfig, RouteError, RouteResult, RouteService,
        RouteView, ShortestRoute,
    };
}
