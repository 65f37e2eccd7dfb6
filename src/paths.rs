//! Common paths for OmniSky data storage
//!
//! All OmniSky data is stored under ~/.config/omnisky/ on all platforms:
//! - config.toml - User configuration
//! - omnisky.sqlite - Key-value store (widget board, widget content)

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

fn dir_under(home: &Path) -> PathBuf {
    home.join(".config").join("omnisky")
}

/// Get the OmniSky data directory (~/.config/omnisky/)
///
/// The same location is used on every platform, including macOS and Windows,
/// instead of each platform's native config directory.
pub fn omnisky_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = dir_under(&home);
    fs::create_dir_all(&dir).context("Failed to create omnisky directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/omnisky/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(omnisky_dir()?.join("config.toml"))
}

/// Get the database file path (~/.config/omnisky/omnisky.sqlite)
pub fn database_path() -> Result<PathBuf> {
    Ok(omnisky_dir()?.join("omnisky.sqlite"))
}
