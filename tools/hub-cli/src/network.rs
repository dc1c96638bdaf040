//! Network file: the hubs and routes the CLI operates on.
//!
//! ```toml
//! [[hubs]]
//! id = "icn"
//! name = "Incheon"
//! address = "Jung-gu, Incheon"
//! latitude = 37.46
//! longitude = 126.44
//!
//! [[routes]]
//! id = "r1"
//! from = "icn"
//! to = "dje"
//! distance_km = 148.5
//! minutes = 110
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use hub_core::{Distance, Hub, HubId, RouteId, RouteRecord};
use hub_route::{HubLookup, InMemoryEdgeStore, InMemoryHubDirectory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkFile {
    #[serde(default)]
    pub hubs: Vec<HubEntry>,

    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    pub id: String,
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    pub minutes: u32,
}

impl RouteEntry {
    fn from_record(record: &RouteRecord) -> Self {
        Self {
            id: record.id.to_string(),
            from: record.from.to_string(),
            to: record.to.to_string(),
            distance_km: record.distance.as_km(),
            minutes: record.time_minutes,
        }
    }

    fn to_record(&self) -> Result<RouteRecord> {
        let distance = Distance::from_km(self.distance_km)
            .with_context(|| format!("Invalid distance on route {}", self.id))?;
        let id = RouteId::parse(&self.id).context("Invalid route id")?;
        Ok(RouteRecord {
            id,
            from: HubId::new(self.from.as_str()),
            to: HubId::new(self.to.as_str()),
            distance,
            time_minutes: self.minutes,
        })
    }
}

impl NetworkFile {
    /// Read a network file. A missing file is an empty network.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read network file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse network file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write network file: {}", path.display()))
    }

    /// Build the in-memory stores, validating hubs and routes.
    pub async fn into_stores(self) -> Result<(InMemoryHubDirectory, InMemoryEdgeStore)> {
        let mut hubs = Vec::with_capacity(self.hubs.len());
        for entry in self.hubs {
            let hub = Hub::with_id(
                HubId::new(entry.id.as_str()),
                entry.name,
                entry.address,
                entry.latitude,
                entry.longitude,
            )
            .with_context(|| format!("Invalid hub {}", entry.id))?;
            hubs.push(hub);
        }
        let directory = InMemoryHubDirectory::with_hubs(hubs)
            .await
            .context("Invalid hub list")?;

        let records = self
            .routes
            .iter()
            .map(RouteEntry::to_record)
            .collect::<Result<Vec<_>>>()?;
        for record in &records {
            if record.from == record.to {
                bail!("Route {} starts and ends at hub {}", record.id, record.from);
            }
            for hub in [&record.from, &record.to] {
                if directory.find_by_id(hub).await?.is_none() {
                    bail!("Route {} references unknown hub {}", record.id, hub);
                }
            }
        }
        let edges = InMemoryEdgeStore::with_records(records).context("Invalid route list")?;

        Ok((directory, edges))
    }

    /// Capture the current contents of the stores.
    pub async fn from_stores(directory: &InMemoryHubDirectory, edges: &InMemoryEdgeStore) -> Self {
        let hubs = directory
            .snapshot()
            .await
            .into_iter()
            .filter(Hub::is_active)
            .map(|hub| HubEntry {
                id: hub.id.to_string(),
                name: hub.name,
                address: hub.address,
                latitude: hub.latitude,
                longitude: hub.longitude,
            })
            .collect();
        let routes = edges.snapshot().await.iter().map(RouteEntry::from_record).collect();
        Self { hubs, routes }
    }
}
