//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use hub_cache::InMemoryBackend;
use hub_core::HubId;
use hub_graph::Dijkstra;
use hub_route::{InMemoryEdgeStore, InMemoryHubDirectory, RouteService};
use tracing::debug;

use crate::config::CliConfig;
use crate::network::NetworkFile;
use crate::output::Output;

/// Located configuration, before any network is loaded.
pub struct LoadedConfig {
    pub config: CliConfig,
    /// Directory relative paths in the config resolve against.
    pub base_dir: PathBuf,
}

impl LoadedConfig {
    /// Load the given config file, or search the working directory and its
    /// parents for one.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        if let Some(path) = config_path {
            let path = cwd.join(path);
            let config = CliConfig::load(&path)?;
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
            return Ok(Self { config, base_dir });
        }

        match Self::find_config(&cwd)? {
            Some(found) => Ok(found),
            None => Ok(Self {
                config: CliConfig::default(),
                base_dir: cwd,
            }),
        }
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Result<Option<Self>> {
        let config_names = ["hubroute.toml", ".hubroute.toml", "hubroute.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let path = current.join(name);
                if path.exists() {
                    let config = CliConfig::load(&path)?;
                    return Ok(Some(Self {
                        config,
                        base_dir: current,
                    }));
                }
            }

            if !current.pop() {
                return Ok(None);
            }
        }
    }
}

/// Execution context for CLI commands.
pub struct Context {
    /// Output handler.
    pub output: Output,
    /// Route service over the loaded network.
    pub service: RouteService,
    hubs: Arc<InMemoryHubDirectory>,
    edges: Arc<InMemoryEdgeStore>,
    network_path: PathBuf,
}

impl Context {
    /// Load the network file and compose the route service over it.
    pub async fn open(loaded: LoadedConfig, output: Output) -> Result<Self> {
        let network_path = loaded.base_dir.join(&loaded.config.network);
        let network = NetworkFile::load(&network_path)?;
        debug!(
            path = %network_path.display(),
            hubs = network.hubs.len(),
            routes = network.routes.len(),
            "Loaded network file"
        );
        let (hubs, edges) = network.into_stores().await?;
        let (hubs, edges) = (Arc::new(hubs), Arc::new(edges));

        let service = RouteService::new(
            Arc::new(Dijkstra),
            edges.clone(),
            hubs.clone(),
            Arc::new(InMemoryBackend::new()),
            loaded.config.cache,
        );
        service
            .warm_graph_cache()
            .await
            .context("Failed to build route graph")?;

        Ok(Self {
            output,
            service,
            hubs,
            edges,
            network_path,
        })
    }

    /// Resolve a hub given by id or name.
    pub async fn hub(&self, id_or_name: &str) -> Result<HubId> {
        let hub = self
            .service
            .resolve_hub(id_or_name)
            .await
            .with_context(|| format!("Unknown hub '{}'", id_or_name))?;
        Ok(hub.id)
    }

    pub fn hubs(&self) -> &InMemoryHubDirectory {
        &self.hubs
    }

    pub fn network_path(&self) -> &Path {
        &self.network_path
    }

    /// Write the current hubs and routes back to the network file.
    pub async fn save_network(&self) -> Result<()> {
        NetworkFile::from_stores(&self.hubs, &self.edges)
            .await
            .save(&self.network_path)
    }
}
