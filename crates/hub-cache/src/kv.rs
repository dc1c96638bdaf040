//! Typed cache over a raw backend, with JSON serialization.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::backend::CacheBackend;
use crate::error::CacheError;
use crate::policy::TtlPolicy;

/// Type-safe cache handle.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Cloning shares the backend.
#[derive(Clone)]
pub struct Cache {
    backend: Arc<dyn CacheBackend>,
}

impl Cache {
    /// Wrap a backend.
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let edges: Option<Vec<OutgoingEdge>> = cache.get("graph:hub-1").await?;
    /// ```
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.backend.get(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache under the given lifetime policy.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("route:a:b", &record, TtlPolicy::Expiring(3600)).await?;
    /// ```
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        policy: TtlPolicy,
    ) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.set(key, bytes, policy.ttl()).await
    }

    /// Delete a value from the cache. Returns whether it existed.
    pub async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.backend.delete(key).await
    }

    /// Delete all values whose key starts with `prefix`.
    pub async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        self.backend.delete_prefix(prefix).await
    }

    /// List keys starting with `prefix`.
    pub async fn keys(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        self.backend.keys(prefix).await
    }

    /// Check if a key holds a live value.
    pub async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.backend.get(key).await?.is_some())
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// use hub_cache::cache_key;
/// let key = cache_key!("route", "hub-a", "hub-b");
/// assert_eq!(key, "route:hub-a:hub-b");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
