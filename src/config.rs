//! Configuration file lookup for the binary.

use anyhow::{Context, Result};
use mf_core::config::Config;
use std::path::{Path, PathBuf};

/// Locations searched, in order, when no `--config` is given.
const DEFAULT_PATHS: &[&str] = &["./mediaflip.toml", "~/.config/mediaflip/config.toml"];

/// Load configuration from a TOML file the user named explicitly.
pub fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("Failed to load config file: {:?}", path))
}

/// Load config from `custom_path`, else from the default locations, else
/// return the defaults.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    match resolve_config_path(custom_path) {
        Some(path) => load_config(&path),
        None => Ok(Config::default()),
    }
}

/// The config file that would be loaded, if any.
pub fn resolve_config_path(custom_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = custom_path {
        return Some(path.to_path_buf());
    }

    DEFAULT_PATHS
        .iter()
        .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
        .find(|p| p.exists())
}
