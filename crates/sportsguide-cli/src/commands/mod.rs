pub mod config;
pub mod generate;

use sportsguide_core::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// Explicit `--config` path, or the default location.
pub(crate) fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::default_path(),
    }
}
