use crate::errors::{LauncherError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default refresh period of the monitor (10 seconds)
pub const DEFAULT_REFRESH_SECS: u64 = 10;

/// Maximum number of history entries kept after loading the history file
pub const MAX_HISTORY_QUEUE: usize = 1440;

/// Number of most recent entries drawn on each chart
pub const PLOT_LIMIT: usize = 100;

/// Launcher settings: where the node's files live and which container to drive
#[derive(Debug, Clone, PartialEq)]
pub struct LauncherConfig {
    pub container_name: String,
    pub image: String,
    /// Host directory shared with the container
    pub volume_path: PathBuf,
    /// Mount point of `volume_path` inside the container
    pub container_mount: String,
    pub env_file: PathBuf,
    /// History file, relative to `volume_path`
    pub history_file: PathBuf,
    /// Address file, relative to `volume_path`
    pub address_file: PathBuf,
    pub refresh_interval: Duration,
    pub max_history: usize,
    pub plot_limit: usize,
    pub dapp_url: String,
    pub explorer_url: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            container_name: "edge_node_container".to_string(),
            image: "naeural/edge_node:latest".to_string(),
            volume_path: PathBuf::from("_local_cache"),
            container_mount: "/edge_node/_local_cache".to_string(),
            env_file: PathBuf::from(".env"),
            history_file: PathBuf::from("_data").join("local_history.json"),
            address_file: PathBuf::from("_data").join("local_address.txt"),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            max_history: MAX_HISTORY_QUEUE,
            plot_limit: PLOT_LIMIT,
            dapp_url: "https://app.naeural.ai".to_string(),
            explorer_url: "https://explorer.naeural.ai".to_string(),
        }
    }
}

impl LauncherConfig {
    /// Defaults overridden by `EDGE_NODE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("EDGE_NODE_CONTAINER") {
            config.container_name = name;
        }
        if let Some(image) = lookup("EDGE_NODE_IMAGE") {
            config.image = image;
        }
        if let Some(volume) = lookup("EDGE_NODE_VOLUME") {
            config.volume_path = PathBuf::from(volume);
        }
        if let Some(env_file) = lookup("EDGE_NODE_ENV_FILE") {
            config.env_file = PathBuf::from(env_file);
        }
        if let Some(secs) = lookup("EDGE_NODE_REFRESH_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                LauncherError::Config(format!("EDGE_NODE_REFRESH_SECS must be a number of seconds, got '{}'", secs))
            })?;
            if secs == 0 {
                return Err(LauncherError::Config(
                    "EDGE_NODE_REFRESH_SECS must be greater than zero".to_string(),
                ));
            }
            config.refresh_interval = Duration::from_secs(secs);
        }

        if config.container_name.trim().is_empty() {
            return Err(LauncherError::Config("container name must not be empty".to_string()));
        }

        Ok(config)
    }

    pub fn with_volume_path(mut self, volume_path: impl AsRef<Path>) -> Self {
        self.volume_path = volume_path.as_ref().to_path_buf();
        self
    }

    pub fn history_path(&self) -> PathBuf {
        self.volume_path.join(&self.history_file)
    }

    pub fn address_path(&self) -> PathBuf {
        self.volume_path.join(&self.address_file)
    }
}
