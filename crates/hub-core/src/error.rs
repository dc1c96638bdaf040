//! Domain validation errors.

use thiserror::Error;

use crate::ids::HubId;

/// Errors raised when constructing hub or route values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A route must connect two different hubs.
    #[error("Route source and destination are the same hub: {0}")]
    SelfRoute(HubId),

    /// Distance is negative, not a number, or out of range.
    #[error("Invalid distance: {0}")]
    InvalidDistance(String),

    /// Coordinates are outside the valid latitude/longitude range.
    #[error("Invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// An id is empty, padded, or contains the cache key separator.
    #[error("Invalid {kind} id: {id:?}")]
    InvalidId { kind: &'static str, id: String },

    /// A required text field is empty.
    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),
}
