//! Cache key layout.

use hub_cache::cache_key;
use hub_core::HubId;

use crate::config::RouteCacheConfig;

/// Builds the keys of the three route caches from configured namespaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCacheKeys {
    graph: String,
    snapshot: String,
    revision: String,
    direct: String,
    relay: String,
}

impl RouteCacheKeys {
    pub fn new(config: &RouteCacheConfig) -> Self {
        Self {
            graph: config.graph_namespace.clone(),
            snapshot: config.graph_snapshot_key.clone(),
            revision: config.graph_revision_key.clone(),
            direct: config.direct_namespace.clone(),
            relay: config.relay_namespace.clone(),
        }
    }

    /// `graph:{source}`
    pub fn graph(&self, source: &HubId) -> String {
        cache_key!(&self.graph, source)
    }

    /// Prefix shared by every graph entry.
    pub fn graph_prefix(&self) -> String {
        format!("{}:", self.graph)
    }

    /// Recover the source hub from a graph entry key.
    pub fn graph_source(&self, key: &str) -> Option<HubId> {
        key.strip_prefix(&self.graph_prefix())
            .filter(|rest| !rest.is_empty())
            .map(HubId::new)
    }

    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// `route:{from}:{to}`
    pub fn direct(&self, from: &HubId, to: &HubId) -> String {
        cache_key!(&self.direct, from, to)
    }

    /// `relay-route:{from}:{to}`
    pub fn relay(&self, from: &HubId, to: &HubId) -> String {
        cache_key!(&self.relay, from, to)
    }

    /// Prefix shared by every relay entry.
    pub fn relay_prefix(&self) -> String {
        format!("{}:", self.relay)
    }
}

impl Default for RouteCacheKeys {
    fn default() -> Self {
        Self::new(&RouteCacheConfig::default())
    }
}
