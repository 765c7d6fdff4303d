//! Configuration loading and defaults for inactivity-guard.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

const APP_DIR: &str = "inactivity-guard";

/// Main configuration for inactivity-guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Milliseconds the app may stay backgrounded before locking (default: 3000).
    pub lock_threshold_ms: u64,

    /// Path to the timestamp store file.
    /// If unset, uses `<data_dir>/inactivity-guard/state.json`.
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_threshold_ms: 3000,
            store_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from the default path, or return defaults if not found.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(p) = path {
            return Self::load(p);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let default_path = config_dir.join(APP_DIR).join("config.toml");
            if default_path.exists() {
                return Self::load(&default_path);
            }
        }

        Ok(Self::default())
    }

    pub fn lock_threshold(&self) -> Duration {
        Duration::from_millis(self.lock_threshold_ms)
    }

    /// Resolve where the timestamp store lives.
    pub fn resolve_store_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.store_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .context("Could not determine data directory; set store_path in the config")?;
        Ok(data_dir.join(APP_DIR).join("state.json"))
    }
}
