//! Hub records and their display projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::HubId;

/// A logistics hub.
///
/// Identity is immutable; name, address and coordinates may change. Hubs are
/// never removed, only flagged as deleted together with who deleted them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hub {
    /// Unique identifier.
    pub id: HubId,
    /// Display name, unique among active hubs.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// When the hub was created.
    pub created_at: DateTime<Utc>,
    /// When the hub was last modified.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion flag.
    #[serde(default)]
    pub deleted: bool,
    /// When the hub was soft-deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Who soft-deleted the hub.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,
}

impl Hub {
    /// Create a new hub with a generated id.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, DomainError> {
        Self::with_id(HubId::generate(), name, address, latitude, longitude)
    }

    /// Create a hub with a known id.
    pub fn with_id(
        id: HubId,
        name: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, DomainError> {
        id.validate()?;
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyField("name"));
        }
        validate_coordinates(latitude, longitude)?;

        let now = Utc::now();
        Ok(Self {
            id,
            name,
            address: address.into(),
            latitude,
            longitude,
            created_at: now,
            updated_at: now,
            deleted: false,
            deleted_at: None,
            deleted_by: None,
        })
    }

    /// Replace the descriptive fields, keeping identity.
    pub fn update_details(
        &mut self,
        name: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyField("name"));
        }
        validate_coordinates(latitude, longitude)?;

        self.name = name;
        self.address = address.into();
        self.latitude = latitude;
        self.longitude = longitude;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Flag the hub as deleted.
    pub fn soft_delete(&mut self, actor: impl Into<String>) {
        let now = Utc::now();
        self.deleted = true;
        self.deleted_at = Some(now);
        self.deleted_by = Some(actor.into());
        self.updated_at = now;
    }

    /// Whether the hub is still active.
    pub fn is_active(&self) -> bool {
        !self.deleted
    }

    /// Display attributes used to enrich route results.
    pub fn summary(&self) -> HubSummary {
        HubSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
        }
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), DomainError> {
    let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
    let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
    if lat_ok && lon_ok {
        Ok(())
    } else {
        Err(DomainError::InvalidCoordinates {
            latitude,
            longitude,
        })
    }
}

/// Display record of a hub.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct HubSummary {
    /// Hub id.
    pub id: HubId,
    /// Hub name.
    pub name: String,
    /// Hub address.
    pub address: String,
}
