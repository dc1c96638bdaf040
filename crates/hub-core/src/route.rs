//! Directed hub-to-hub routes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::distance::Distance;
use crate::error::DomainError;
use crate::ids::{HubId, RouteId};

/// How a route result was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteType {
    /// A single stored edge.
    Direct,
    /// A computed multi-hop path.
    Relay,
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "DIRECT"),
            Self::Relay => write!(f, "RELAY"),
        }
    }
}

/// Input for creating a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoute {
    /// Source hub.
    pub from: HubId,
    /// Destination hub.
    pub to: HubId,
    /// Road distance.
    pub distance: Distance,
    /// Travel time in minutes.
    pub time_minutes: u32,
}

impl NewRoute {
    /// Create a validated route request.
    pub fn new(
        from: HubId,
        to: HubId,
        distance: Distance,
        time_minutes: u32,
    ) -> Result<Self, DomainError> {
        if from == to {
            return Err(DomainError::SelfRoute(from));
        }
        Ok(Self {
            from,
            to,
            distance,
            time_minutes,
        })
    }

    /// Assign an id, producing the stored form.
    pub fn into_record(self, id: RouteId) -> RouteRecord {
        RouteRecord {
            id,
            from: self.from,
            to: self.to,
            distance: self.distance,
            time_minutes: self.time_minutes,
        }
    }
}

/// A stored directed edge between two hubs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    /// Route id.
    pub id: RouteId,
    /// Source hub.
    pub from: HubId,
    /// Destination hub.
    pub to: HubId,
    /// Road distance.
    pub distance: Distance,
    /// Travel time in minutes.
    pub time_minutes: u32,
}

impl RouteRecord {
    /// Whether this record connects the given ordered pair.
    pub fn connects(&self, from: &HubId, to: &HubId) -> bool {
        &self.from == from && &self.to == to
    }

    /// The outgoing-edge view of this record, as held in an adjacency list.
    pub fn outgoing(&self) -> OutgoingEdge {
        OutgoingEdge {
            to: self.to.clone(),
            distance: self.distance,
            time_minutes: self.time_minutes,
        }
    }

    /// The record as a single result leg.
    pub fn leg(&self) -> RouteLeg {
        RouteLeg {
            from: self.from.clone(),
            to: self.to.clone(),
            distance: self.distance,
            time_minutes: self.time_minutes,
        }
    }
}

/// An edge as seen from its source hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEdge {
    /// Destination hub.
    pub to: HubId,
    /// Road distance.
    pub distance: Distance,
    /// Travel time in minutes.
    pub time_minutes: u32,
}

/// One edge along a route result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Leg start.
    pub from: HubId,
    /// Leg end.
    pub to: HubId,
    /// Leg distance.
    pub distance: Distance,
    /// Leg travel time in minutes.
    pub time_minutes: u32,
}
