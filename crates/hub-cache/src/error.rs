//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend failed to perform the operation.
    #[error("Store operation failed: {0}")]
    Backend(String),
}

impl CacheError {
    /// Whether the failure came from encoding or decoding a value.
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
