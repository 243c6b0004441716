//! package.json access
//!
//! Only the fields devflow cares about are interpreted (`version`,
//! `dependencies`, `devDependencies`); everything else is kept as-is, in its
//! original key order, when the file is written back.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

use crate::error::DevflowError;
use crate::utils::json::write_json_pretty;

/// Manifest file name, always at the project root
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// A loaded package.json
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    data: Map<String, Value>,
}

impl Manifest {
    /// Load package.json from `root`
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE_NAME);
        if !path.is_file() {
            return Err(DevflowError::ManifestNotFound { path }.into());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(path, &content)
    }

    fn parse(path: PathBuf, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        match value {
            Value::Object(data) => Ok(Self { path, data }),
            _ => bail!("{} must contain a JSON object", path.display()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.data.get("name").and_then(Value::as_str)
    }

    /// The `version` field, if it is a non-empty string
    pub fn version(&self) -> Option<&str> {
        self.data
            .get("version")
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The `version` field, or [`DevflowError::MissingVersion`]
    pub fn require_version(&self) -> Result<String, DevflowError> {
        self.version()
            .map(str::to_string)
            .ok_or_else(|| DevflowError::MissingVersion {
                path: self.path.clone(),
            })
    }

    /// Replace the `version` field, keeping its position in the file
    pub fn set_version(&mut self, version: &str) {
        self.data
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Names from `dependencies` and `devDependencies` combined
    pub fn dependency_names(&self) -> BTreeSet<String> {
        ["dependencies", "devDependencies"]
            .iter()
            .filter_map(|section| self.data.get(*section).and_then(Value::as_object))
            .flat_map(|deps| deps.keys().cloned())
            .collect()
    }

    /// Write the manifest back to where it was loaded from
    pub fn save(&self) -> Result<()> {
        write_json_pretty(&self.path, &self.data)
    }
}

/// Node package manager used for the install step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Pick the package manager from the lockfile present in `root`
    pub fn detect(root: &Path) -> Self {
        if root.join("pnpm-lock.yaml").exists() {
            PackageManager::Pnpm
        } else if root.join("yarn.lock").exists() {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    pub fn install_args(&self) -> &'static [&'static str] {
        &["install"]
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let err = Manifest::load(temp_dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DevflowError>(),
            Some(DevflowError::ManifestNotFound { .. })
        ));
    }

    #[test]
    fn test_merged_dependencies() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("package.json"),
            r#"{
  "name": "web",
  "dependencies": { "react": "^18.0.0" },
  "devDependencies": { "vite": "^5.0.0", "react": "^18.0.0" }
}"#,
        )
        .unwrap();

        let manifest = Manifest::load(temp_dir.path()).unwrap();
        let deps: Vec<String> = manifest.dependency_names().into_iter().collect();
        assert_eq!(deps, vec!["react".to_string(), "vite".to_string()]);
        assert_eq!(manifest.name(), Some("web"));
    }

    #[test]
    fn test_missing_version() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("package.json"), r#"{"name":"x","version":""}"#).unwrap();

        let manifest = Manifest::load(temp_dir.path()).unwrap();
        assert!(matches!(
            manifest.require_version(),
            Err(DevflowError::MissingVersion { .. })
        ));
    }

    #[test]
    fn test_set_version_keeps_key_order() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("package.json"),
            "{\"name\":\"api\",\"version\":\"1.0.0\",\"private\":true}",
        )
        .unwrap();

        let mut manifest = Manifest::load(temp_dir.path()).unwrap();
        manifest.set_version("1.0.1");
        manifest.save().unwrap();

        let content = fs::read_to_string(temp_dir.path().join("package.json")).unwrap();
        assert_eq!(
            content,
            "{\n  \"name\": \"api\",\n  \"version\": \"1.0.1\",\n  \"private\": true\n}\n"
        );
    }

    #[test]
    fn test_package_manager_from_lockfile() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(PackageManager::detect(temp_dir.path()), PackageManager::Npm);

        fs::write(temp_dir.path().join("yarn.lock"), "").unwrap();
        assert_eq!(PackageManager::detect(temp_dir.path()), PackageManager::Yarn);

        fs::write(temp_dir.path().join("pnpm-lock.yaml"), "").unwrap();
        assert_eq!(PackageManager::detect(temp_dir.path()), PackageManager::Pnpm);
    }
}
