//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use hub_route::RouteCacheConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file (`hubroute.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Path of the network file, relative to the config file.
    #[serde(default = "default_network")]
    pub network: String,

    /// Route cache settings.
    #[serde(default)]
    pub cache: RouteCacheConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

fn default_network() -> String {
    "network.toml".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            cache: RouteCacheConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };

        config
            .cache
            .validate()
            .with_context(|| format!("Invalid [cache] section in {}", path.display()))?;
        Ok(config)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}
