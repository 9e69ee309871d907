//! Configuration management for Coursecat

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::CatalogDelays;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Optional JSON dataset replacing the bundled one
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default = "default_fetch_all_delay_ms")]
    pub fetch_all_delay_ms: u64,
    #[serde(default = "default_fetch_by_id_delay_ms")]
    pub fetch_by_id_delay_ms: u64,
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,
}

fn default_fetch_all_delay_ms() -> u64 {
    800
}

fn default_fetch_by_id_delay_ms() -> u64 {
    500
}

fn default_search_delay_ms() -> u64 {
    300
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "~/.local/share/coursecat/state.db".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            fetch_all_delay_ms: default_fetch_all_delay_ms(),
            fetch_by_id_delay_ms: default_fetch_by_id_delay_ms(),
            search_delay_ms: default_search_delay_ms(),
        }
    }
}

impl CatalogConfig {
    /// Simulated latencies for the course provider
    pub fn delays(&self) -> CatalogDelays {
        CatalogDelays {
            fetch_all: Duration::from_millis(self.fetch_all_delay_ms),
            fetch_by_id: Duration::from_millis(self.fetch_by_id_delay_ms),
            search: Duration::from_millis(self.search_delay_ms),
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to the
    /// built-in defaults when no file exists there
    pub fn load_or_default() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default_config());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            storage: StorageConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }

    /// Storage path with `~` expanded
    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.storage.path).to_string())
    }

    /// Dataset override path with `~` expanded, if one is configured
    pub fn dataset_path(&self) -> Option<PathBuf> {
        self.catalog
            .dataset
            .as_ref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).to_string()))
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("COURSECAT_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("coursecat").join("config.toml"))
}
