#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::DEFAULT_HISTORY_DIR;
use std::path::PathBuf;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, HistoryArgs, RequestArgs};

/// Flag, then config file, then `.history`.
pub fn resolve_history_dir(flag: Option<&str>, file: Option<&TomlConfig>) -> PathBuf {
    flag.or_else(|| file.and_then(TomlConfig::history_dir))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_DIR))
}

/// Loads the config file when one is given.
pub fn load_optional(path: Option<&str>) -> crate::Result<Option<TomlConfig>> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            Ok(Some(TomlConfig::from_file(path)?))
        }
        None => Ok(None),
    }
}
