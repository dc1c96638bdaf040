//! Route query results.

use hub_core::{Distance, HubId, HubSummary, RouteId, RouteLeg, RouteRecord, RouteType};
use serde::{Deserialize, Serialize};

/// A stored route with both endpoints resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteView {
    pub id: RouteId,
    pub from: HubSummary,
    pub to: HubSummary,
    pub distance: Distance,
    pub time_minutes: u32,
    pub route_type: RouteType,
}

impl RouteView {
    pub fn new(record: &RouteRecord, from: HubSummary, to: HubSummary) -> Self {
        Self {
            id: record.id.clone(),
            from,
            to,
            distance: record.distance,
            time_minutes: record.time_minutes,
            route_type: RouteType::Direct,
        }
    }
}

/// A resolved route between two hubs.
///
/// `path` starts at the first hop after the source and ends at the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResult {
    pub route_type: RouteType,
    pub total_distance: Distance,
    pub total_time_minutes: u32,
    pub path: Vec<HubSummary>,
    pub legs: Vec<RouteLeg>,
}

impl RouteResult {
    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.legs.len()
    }

    /// Hub ids along the path, source excluded.
    pub fn node_ids(&self) -> Vec<HubId> {
        self.path.iter().map(|hub| hub.id.clone()).collect()
    }
}

/// Outcome of a shortest-route query between two valid hubs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShortestRoute {
    Found(RouteResult),
    NoRoute { from: HubId, to: HubId },
}

impl ShortestRoute {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn route(&self) -> Option<&RouteResult> {
        match self {
            Self::Found(route) => Some(route),
            Self::NoRoute { .. } => None,
        }
    }

    pub fn into_route(self) -> Option<RouteResult> {
        match self {
            Self::Found(route) => Some(route),
            Self::NoRoute { .. } => None,
        }
    }
}

/// A route as held in the relay cache: ids and legs only, so hub display
/// records are always resolved fresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedPath {
    pub route_type: RouteType,
    pub total_distance: Distance,
    pub total_time_minutes: u32,
    pub nodes: Vec<HubId>,
    pub legs: Vec<RouteLeg>,
}

impl ComputedPath {
    /// Single-edge path for a stored route.
    pub fn direct(record: &RouteRecord) -> Self {
        Self {
            route_type: RouteType::Direct,
            total_distance: record.distance,
            total_time_minutes: record.time_minutes,
            nodes: vec![record.to.clone()],
            legs: vec![record.leg()],
        }
    }

    /// Multi-hop path. Totals are summed from the legs.
    pub fn relay(legs: Vec<RouteLeg>) -> Self {
        let total_distance = Distance::sum(legs.iter().map(|leg| &leg.distance));
        let total_time_minutes = legs
            .iter()
            .fold(0u32, |acc, leg| acc.saturating_add(leg.time_minutes));
        Self {
            route_type: RouteType::Relay,
            total_distance,
            total_time_minutes,
            nodes: legs.iter().map(|leg| leg.to.clone()).collect(),
            legs,
        }
    }

    /// Whether the path starts at `from` and ends at `to` with contiguous legs.
    pub fn is_between(&self, from: &HubId, to: &HubId) -> bool {
        let contiguous = self.legs.windows(2).all(|pair| pair[0].to == pair[1].from);
        contiguous
            && self.legs.first().is_some_and(|leg| &leg.from == from)
            && self.legs.last().is_some_and(|leg| &leg.to == to)
            && self.nodes.len() == self.legs.len()
    }

    /// Attach display records, one per node.
    pub fn into_result(self, path: Vec<HubSummary>) -> RouteResult {
        RouteResult {
            route_type: self.route_type,
            total_distance: self.total_distance,
            total_time_minutes: self.total_time_minutes,
            path,
            legs: self.legs,
        }
    }
}
