//! Raw Key-Value backend capability.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;

/// Key-Value store holding opaque byte values.
///
/// Implementations may be remote; every call can fail and callers treat the
/// store as a derived, rebuildable view.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get the value stored under `key`. Expired entries read as absent.
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Store a value, replacing any previous one. `ttl` of `None` keeps the
    /// entry until it is deleted.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()>;

    /// Delete one entry. Returns whether it existed.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Delete every entry whose key starts with `prefix`. Returns the count.
    async fn delete_prefix(&self, prefix: &str) -> CacheResult<u64>;

    /// List live keys starting with `prefix`.
    async fn keys(&self, prefix: &str) -> CacheResult<Vec<String>>;
}
