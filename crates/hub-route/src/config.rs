//! Cache configuration for route resolution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Key namespaces and entry lifetimes for the three route caches.
///
/// Keys are `{namespace}:{parts}`; see [`RouteCacheKeys`](crate::RouteCacheKeys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteCacheConfig {
    /// Namespace of per-hub adjacency entries.
    pub graph_namespace: String,

    /// Key of the marker written after a full graph rebuild.
    pub graph_snapshot_key: String,

    /// Key of the token replaced by every route mutation.
    pub graph_revision_key: String,

    /// Namespace of direct (single-edge) route entries.
    pub direct_namespace: String,

    /// Namespace of computed relay paths; cleared as a whole on mutation.
    pub relay_namespace: String,

    /// Lifetime of direct route entries, in seconds.
    pub direct_ttl_secs: u64,

    /// Lifetime of relay path entries, in seconds.
    pub relay_ttl_secs: u64,
}

impl Default for RouteCacheConfig {
    fn default() -> Self {
        Self {
            graph_namespace: "graph".to_string(),
            graph_snapshot_key: "graph-meta:snapshot".to_string(),
            graph_revision_key: "graph-meta:revision".to_string(),
            direct_namespace: "route".to_string(),
            relay_namespace: "relay-route".to_string(),
            direct_ttl_secs: 3600,
            relay_ttl_secs: 900,
        }
    }
}

impl RouteCacheConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that namespaces are usable and cannot shadow each other under
    /// prefix deletion, and that path entries expire.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let namespaces = [
            ("graph_namespace", &self.graph_namespace),
            ("direct_namespace", &self.direct_namespace),
            ("relay_namespace", &self.relay_namespace),
        ];

        for (field, ns) in &namespaces {
            if ns.is_empty() || ns.contains(':') {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be non-empty and must not contain ':'"
                )));
            }
        }

        for (i, (a_field, a)) in namespaces.iter().enumerate() {
            for (b_field, b) in namespaces.iter().skip(i + 1) {
                if a == b {
                    return Err(ConfigError::Invalid(format!(
                        "{a_field} and {b_field} share namespace {a:?}"
                    )));
                }
            }
        }

        for (field, key) in [
            ("graph_snapshot_key", &self.graph_snapshot_key),
            ("graph_revision_key", &self.graph_revision_key),
        ] {
            if key.is_empty() || namespaces.iter().any(|(_, ns)| key.starts_with(&format!("{ns}:"))) {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be set and outside every cache namespace"
                )));
            }
        }
        if self.graph_snapshot_key == self.graph_revision_key {
            return Err(ConfigError::Invalid(
                "graph_snapshot_key and graph_revision_key must differ".to_string(),
            ));
        }

        if self.direct_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "direct_ttl_secs must be greater than zero".to_string(),
            ));
        }
        if self.relay_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "relay_ttl_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
