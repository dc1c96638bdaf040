//! Route resolution error types.

use hub_core::{DomainError, HubId, RouteId};
use thiserror::Error;

/// Failures reported by an [`EdgeStore`](crate::EdgeStore) or
/// [`HubLookup`](crate::HubLookup) collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The record to modify does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The write would violate a uniqueness constraint.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The record failed validation.
    #[error("Invalid record: {0}")]
    Invalid(String),

    /// The underlying store failed.
    #[error("Store failure: {0}")]
    Backend(String),
}

/// Errors surfaced by [`RouteService`](crate::RouteService).
///
/// "No path between two valid hubs" is not an error; see
/// [`ShortestRoute::NoRoute`](crate::ShortestRoute::NoRoute).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    /// A referenced hub does not exist or has been deleted.
    #[error("Hub not found: {0}")]
    HubNotFound(HubId),

    /// Source and destination are the same hub.
    #[error("Source and destination are the same hub: {0}")]
    SelfRoute(HubId),

    /// No stored route has this id.
    #[error("Route not found: {0}")]
    RouteNotFound(RouteId),

    /// A route already connects this ordered pair.
    #[error("Route already exists from {from} to {to}")]
    RouteAlreadyExists { from: HubId, to: HubId },

    /// Route input failed validation.
    #[error("Invalid route: {0}")]
    InvalidRoute(DomainError),

    /// The path engine returned hops that are not edges of the graph.
    #[error("Path engine returned an inconsistent path from {from} to {to}")]
    InconsistentPath { from: HubId, to: HubId },

    /// A collaborator store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DomainError> for RouteError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::SelfRoute(hub) => RouteError::SelfRoute(hub),
            other => RouteError::InvalidRoute(other),
        }
    }
}

impl RouteError {
    /// Whether the caller supplied bad input, as opposed to a system failure.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::InconsistentPath { .. })
    }
}
