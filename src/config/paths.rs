//! Platform-specific configuration paths.

use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable that points at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "BIRDCOUNT_CONFIG";

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/birdcount/`
/// - macOS: `~/Library/Application Support/birdcount/`
/// - Windows: `%APPDATA%\birdcount\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
///
/// `BIRDCOUNT_CONFIG` takes precedence over the platform location.
pub fn config_file_path() -> Result<PathBuf> {
    config_file_path_with(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
}

fn config_file_path_with(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) if !path.as_os_str().is_empty() => Ok(path),
        _ => Ok(config_dir()?.join("config.toml")),
    }
}
