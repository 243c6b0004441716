//! deploy-info.json: what was last deployed to production

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::json::write_json_pretty;

/// Deploy-state file name, always at the project root
pub const DEPLOY_INFO_FILE_NAME: &str = "deploy-info.json";

/// Last production deploy record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployInfo {
    /// RFC 3339 timestamp of the deploy
    #[serde(default)]
    pub last_deploy: String,

    /// Carried over from the previous record; never computed
    #[serde(default)]
    pub hash: String,

    /// Version recorded as deployed
    #[serde(default)]
    pub version: String,
}

impl DeployInfo {
    pub fn path(root: &Path) -> PathBuf {
        root.join(DEPLOY_INFO_FILE_NAME)
    }

    /// Load the record under `root`; `Ok(None)` when there is none yet
    pub fn load(root: &Path) -> Result<Option<Self>> {
        let path = Self::path(root);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let info = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(info))
    }

    /// Overwrite the record under `root`
    pub fn save(&self, root: &Path) -> Result<()> {
        write_json_pretty(&Self::path(root), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let info = DeployInfo {
            last_deploy: "2026-10-18T09:30:00.000Z".to_string(),
            hash: "abc123".to_string(),
            version: "1.4.2".to_string(),
        };

        info.save(temp_dir.path()).unwrap();
        let content = fs::read_to_string(DeployInfo::path(temp_dir.path())).unwrap();
        assert_eq!(
            content,
            "{\n  \"last_deploy\": \"2026-10-18T09:30:00.000Z\",\n  \"hash\": \"abc123\",\n  \"version\": \"1.4.2\"\n}\n"
        );
        assert_eq!(DeployInfo::load(temp_dir.path()).unwrap(), Some(info));
    }

    #[test]
    fn test_missing_fields_default() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(DeployInfo::path(temp_dir.path()), r#"{"version":"0.3.0"}"#).unwrap();

        let info = DeployInfo::load(temp_dir.path()).unwrap().unwrap();
        assert_eq!(info.version, "0.3.0");
        assert_eq!(info.hash, "");
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(DeployInfo::path(temp_dir.path()), "not json").unwrap();
        assert!(DeployInfo::load(temp_dir.path()).is_err());
    }
}
