//! Configuration module for OmniSky

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::board::WidgetSize;
use crate::board::persist::DEFAULT_BOARD_KEY;
use crate::paths;

/// Which key-value backend holds persisted state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `SQLite` file under the data directory
    #[default]
    Sqlite,
    /// In-process only, nothing survives the run
    Memory,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is not set (e.g. "warn", "omnisky=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Size given to new widgets when none is requested
    #[serde(default)]
    pub default_widget_size: WidgetSize,

    /// Storage backend
    #[serde(default)]
    pub storage: StorageBackend,

    /// Storage key of the board document
    #[serde(default = "default_board_key")]
    pub board_key: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_board_key() -> String {
    DEFAULT_BOARD_KEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_widget_size: WidgetSize::default(),
            storage: StorageBackend::default(),
            board_key: default_board_key(),
        }
    }
}

impl Config {
    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = paths::config_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = paths::config_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}
