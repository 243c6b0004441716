//! Loading and saving devflow.config.json

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Config;
use crate::error::DevflowError;
use crate::utils::json::write_json_pretty;
use crate::utils::terminal::print_warning;

/// Config file name, always at the project root
pub const CONFIG_FILE_NAME: &str = "devflow.config.json";

/// Schema version stamped on every write
pub const LATEST_VERSION: u32 = 2;

/// Path of the config file under `root`
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Check whether a config file exists under `root`
pub fn exists(root: &Path) -> bool {
    config_path(root).is_file()
}

/// Read the config under `root`.
///
/// Returns `Ok(None)` when there is no file and a [`DevflowError::ConfigParse`]
/// when the file is not valid.
pub fn read(root: &Path) -> Result<Option<Config>> {
    let path = config_path(root);
    if !path.is_file() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

    let config = serde_json::from_str::<Config>(&content).map_err(|e| DevflowError::ConfigParse {
        path: path.clone(),
        message: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Read the config, failing with [`DevflowError::ConfigNotFound`] when absent
pub fn load_required(root: &Path) -> Result<Config> {
    match read(root)? {
        Some(config) => Ok(config),
        None => Err(DevflowError::ConfigNotFound {
            file: CONFIG_FILE_NAME,
            dir: root.to_path_buf(),
        }
        .into()),
    }
}

/// Read the config for commands that only use it as a hint.
///
/// A malformed file is reported as a warning and treated as absent.
pub fn load_lenient(root: &Path) -> Option<Config> {
    match read(root) {
        Ok(config) => config,
        Err(e) => {
            print_warning(&format!("{:#}", e));
            None
        }
    }
}

/// Write `config` under `root`, stamped with [`LATEST_VERSION`].
///
/// The file is replaced as a whole; nothing from a previous file is merged.
pub fn write(config: &Config, root: &Path) -> Result<()> {
    let stamped = Config {
        version: LATEST_VERSION,
        ..config.clone()
    };
    write_json_pretty(&config_path(root), &stamped)
}

/// Whether `config` was written by an older schema
pub fn is_outdated(config: &Config) -> bool {
    config.version < LATEST_VERSION
}

/// Print the standard "run config update" warning for stale configs
pub fn warn_if_outdated(config: &Config) {
    if is_outdated(config) {
        print_warning(&format!(
            "{} is at version {} (latest is {}). Run: devflow config update",
            CONFIG_FILE_NAME, config.version, LATEST_VERSION
        ));
    }
}
