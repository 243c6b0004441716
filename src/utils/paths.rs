//! Project root resolution

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::CONFIG_FILE_NAME;

/// Resolve the directory commands operate on.
///
/// An explicit directory wins. Otherwise the nearest ancestor of the current
/// directory holding a config file, falling back to the current directory.
pub fn resolve_project_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        if !dir.is_dir() {
            anyhow::bail!("Project directory does not exist: {}", dir.display());
        }
        return Ok(dir.to_path_buf());
    }

    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    Ok(find_project_root_from(&current_dir).unwrap_or(current_dir))
}

/// Find the nearest directory at or above `start` holding a config file
pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .map(Path::to_path_buf)
}
