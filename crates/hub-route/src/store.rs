//! Collaborator interfaces consumed by the route service.

use async_trait::async_trait;
use hub_core::{HubId, HubSummary, NewRoute, RouteId, RouteRecord};

use crate::error::StoreError;

/// Durable store of hub-to-hub routes. Source of truth for every cache.
#[async_trait]
pub trait EdgeStore: Send + Sync {
    /// Persist a new route and assign its id. Fails with
    /// [`StoreError::Conflict`] if the ordered pair already has a route.
    async fn insert(&self, route: NewRoute) -> Result<RouteRecord, StoreError>;

    /// Replace a stored route by id. Fails with [`StoreError::NotFound`] if
    /// the id is unknown.
    async fn update(&self, record: RouteRecord) -> Result<RouteRecord, StoreError>;

    /// Remove a route, returning it if it existed.
    async fn delete(&self, id: &RouteId) -> Result<Option<RouteRecord>, StoreError>;

    async fn find_by_id(&self, id: &RouteId) -> Result<Option<RouteRecord>, StoreError>;

    /// The route for an exact ordered pair.
    async fn find_between(
        &self,
        from: &HubId,
        to: &HubId,
    ) -> Result<Option<RouteRecord>, StoreError>;

    /// Every route leaving `from`, in storage order.
    async fn find_from(&self, from: &HubId) -> Result<Vec<RouteRecord>, StoreError>;

    async fn find_all(&self) -> Result<Vec<RouteRecord>, StoreError>;
}

/// Resolves hubs to their display attributes. Deleted hubs do not resolve.
#[async_trait]
pub trait HubLookup: Send + Sync {
    async fn find_by_id(&self, id: &HubId) -> Result<Option<HubSummary>, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<HubSummary>, StoreError>;
}
