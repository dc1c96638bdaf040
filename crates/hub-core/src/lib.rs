//! Hub and route domain types.
//!
//! - **Hubs**: logistics waypoints with soft-delete lifecycle
//! - **Routes**: directed edges carrying distance and travel time
//! - **Distance**: exact fixed-point kilometers

pub mod distance;
pub mod error;
pub mod hub;
pub mod ids;
pub mod route;

pub use distance::Distance;
pub use error::DomainError;
pub use hub::{Hub, HubSummary};
pub use ids::{HubId, RouteId};
pub use route::{NewRoute, OutgoingEdge, RouteLeg, RouteRecord, RouteType};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::distance::Distance;
    pub use crate::error::DomainError;
    pub use crate::hub::{Hub, HubSummary};
    pub use crate::ids::{HubId, RouteId};
    pub use crate::route::{NewRoute, OutgoingEdge, RouteLeg, RouteRecord, RouteType};
}
