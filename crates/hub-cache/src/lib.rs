//! Key-Value cache capability for hub route resolution.
//!
//! The cache is an injected capability rather than a shared global client:
//! a [`CacheBackend`] stores raw bytes with optional per-key expiry and
//! prefix deletion, and [`Cache`] layers JSON serialization on top.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hub_cache::{Cache, InMemoryBackend, TtlPolicy};
//!
//! let cache = Cache::new(Arc::new(InMemoryBackend::new()));
//!
//! // Store a value for one hour
//! cache.set("route:a:b", &record, TtlPolicy::Expiring(3600)).await?;
//!
//! // Retrieve it
//! let record: Option<RouteRecord> = cache.get("route:a:b").await?;
//!
//! // Drop a whole namespace
//! cache.delete_prefix("relay-route:").await?;
//! ```

mod backend;
mod error;
mod kv;
mod memory;
mod policy;

pub use backend::CacheBackend;
pub use error::{CacheError, CacheResult};
pub use kv::Cache;
pub use memory::InMemoryBackend;
pub use policy::TtlPolicy;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{cache_key, Cache, CacheBackend, CacheError, InMemoryBackend, TtlPolicy};
}
