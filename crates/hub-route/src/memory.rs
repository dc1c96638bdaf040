//! In-memory collaborators, used by tests and the CLI.

use async_trait::async_trait;
use hub_core::{Hub, HubId, HubSummary, NewRoute, RouteId, RouteRecord};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{EdgeStore, HubLookup};

/// Route store keeping records in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryEdgeStore {
    records: RwLock<Vec<RouteRecord>>,
}

impl InMemoryEdgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store. Later records for an existing pair are rejected.
    pub fn with_records(records: Vec<RouteRecord>) -> Result<Self, StoreError> {
        let mut seeded: Vec<RouteRecord> = Vec::with_capacity(records.len());
        for record in records {
            if seeded.iter().any(|r| r.connects(&record.from, &record.to)) {
                return Err(pair_conflict(&record.from, &record.to));
            }
            if seeded.iter().any(|r| r.id == record.id) {
                return Err(StoreError::Conflict(format!("duplicate route id {}", record.id)));
            }
            seeded.push(record);
        }
        Ok(Self {
            records: RwLock::new(seeded),
        })
    }

    /// Copy of every stored record.
    pub async fn snapshot(&self) -> Vec<RouteRecord> {
        self.records.read().await.clone()
    }
}

fn pair_conflict(from: &HubId, to: &HubId) -> StoreError {
    StoreError::Conflict(format!("route {from} -> {to} already exists"))
}

#[async_trait]
impl EdgeStore for InMemoryEdgeStore {
    async fn insert(&self, route: NewRoute) -> Result<RouteRecord, StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.connects(&route.from, &route.to)) {
            return Err(pair_conflict(&route.from, &route.to));
        }
        let record = route.into_record(RouteId::generate());
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: RouteRecord) -> Result<RouteRecord, StoreError> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|r| r.id != record.id && r.connects(&record.from, &record.to))
        {
            return Err(pair_conflict(&record.from, &record.to));
        }
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| StoreError::NotFound(record.id.to_string()))?;
        *slot = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: &RouteId) -> Result<Option<RouteRecord>, StoreError> {
        let mut records = self.records.write().await;
        let position = records.iter().position(|r| &r.id == id);
        Ok(position.map(|index| records.remove(index)))
    }

    async fn find_by_id(&self, id: &RouteId) -> Result<Option<RouteRecord>, StoreError> {
        Ok(self.records.read().await.iter().find(|r| &r.id == id).cloned())
    }

    async fn find_between(
        &self,
        from: &HubId,
        to: &HubId,
    ) -> Result<Option<RouteRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.connects(from, to))
            .cloned())
    }

    async fn find_from(&self, from: &HubId) -> Result<Vec<RouteRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| &r.from == from)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<RouteRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }
}

/// Hub registry with soft deletion. Only active hubs resolve through
/// [`HubLookup`].
#[derive(Debug, Default)]
pub struct InMemoryHubDirectory {
    hubs: RwLock<Vec<Hub>>,
}

impl InMemoryHubDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the directory, enforcing the same rules as [`register`](Self::register).
    pub async fn with_hubs(hubs: Vec<Hub>) -> Result<Self, StoreError> {
        let directory = Self::new();
        for hub in hubs {
            directory.register(hub).await?;
        }
        Ok(directory)
    }

    /// Add a hub. Ids must be unique; names must be unique among active hubs.
    pub async fn register(&self, hub: Hub) -> Result<HubSummary, StoreError> {
        let mut hubs = self.hubs.write().await;
        if hubs.iter().any(|h| h.id == hub.id) {
            return Err(StoreError::Conflict(format!("hub id {} already exists", hub.id)));
        }
        if hub.is_active() && hubs.iter().any(|h| h.is_active() && h.name == hub.name) {
            return Err(StoreError::Conflict(format!("hub name {:?} already in use", hub.name)));
        }
        let summary = hub.summary();
        hubs.push(hub);
        Ok(summary)
    }

    /// Change the descriptive fields of an active hub.
    pub async fn update_details(
        &self,
        id: &HubId,
        name: &str,
        address: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<HubSummary, StoreError> {
        let mut hubs = self.hubs.write().await;
        if hubs
            .iter()
            .any(|h| h.is_active() && &h.id != id && h.name == name)
        {
            return Err(StoreError::Conflict(format!("hub name {name:?} already in use")));
        }
        let hub = hubs
            .iter_mut()
            .find(|h| &h.id == id && h.is_active())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        hub.update_details(name, address, latitude, longitude)
            .map_err(|e| StoreError::Invalid(e.to_string()))?;
        Ok(hub.summary())
    }

    /// Flag a hub as deleted by `actor`.
    pub async fn soft_delete(&self, id: &HubId, actor: &str) -> Result<(), StoreError> {
        let mut hubs = self.hubs.write().await;
        let hub = hubs
            .iter_mut()
            .find(|h| &h.id == id && h.is_active())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        hub.soft_delete(actor);
        Ok(())
    }

    /// Full record of a hub, deleted or not.
    pub async fn get(&self, id: &HubId) -> Option<Hub> {
        self.hubs.read().await.iter().find(|h| &h.id == id).cloned()
    }

    /// Every hub, including deleted ones, in registration order.
    pub async fn snapshot(&self) -> Vec<Hub> {
        self.hubs.read().await.clone()
    }
}

#[async_trait]
impl HubLookup for InMemoryHubDirectory {
    async fn find_by_id(&self, id: &HubId) -> Result<Option<HubSummary>, StoreError> {
        Ok(self
            .hubs
            .read()
            .await
            .iter()
            .find(|h| &h.id == id && h.is_active())
            .map(Hub::summary))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<HubSummary>, StoreError> {
        Ok(self
            .hubs
            .read()
            .await
            .iter()
            .find(|h| h.name == name && h.is_active())
            .map(Hub::summary))
    }
}
