//! Tool detection with graceful degradation
//!
//! Finds the external programs devflow shells out to and explains how to
//! install the missing ones.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use which::which;

use crate::config::ProjectType;
use crate::error::{hints, DevflowError};
use crate::manifest::PackageManager;

/// Tool detection result
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// Path to the tool executable
    pub path: PathBuf,
    /// Tool version string (if available)
    pub version: Option<String>,
}

/// Tool requirement level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRequirement {
    /// Tool is required for the operation
    Required,
    /// Tool is recommended, warn if missing but continue
    Recommended,
    /// Tool is optional, operation can proceed without it
    Optional,
}

impl ToolRequirement {
    pub fn label(&self) -> &'static str {
        match self {
            ToolRequirement::Required => "required",
            ToolRequirement::Recommended => "recommended",
            ToolRequirement::Optional => "optional",
        }
    }
}

/// A tool the current project needs, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolNeed {
    pub name: &'static str,
    pub requirement: ToolRequirement,
    pub required_for: &'static str,
}

/// Check if a tool exists and return its information
pub fn check_tool(tool_name: &str) -> Option<ToolInfo> {
    match which(tool_name) {
        Ok(path) => {
            let version = get_tool_version(tool_name);
            Some(ToolInfo {
                name: tool_name.to_string(),
                path,
                version,
            })
        }
        Err(_) => None,
    }
}

/// Get tool version by running `tool --version`
fn get_tool_version(tool_name: &str) -> Option<String> {
    // `java -version` prints to stderr
    for flag in ["--version", "-version"] {
        if let Ok(output) = Command::new(tool_name).arg(flag).output() {
            if output.status.success() {
                let text = if output.stdout.is_empty() {
                    String::from_utf8_lossy(&output.stderr).to_string()
                } else {
                    String::from_utf8_lossy(&output.stdout).to_string()
                };
                let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
                if !first.is_empty() {
                    return Some(first.to_string());
                }
            }
        }
    }

    None
}

/// Require a tool to exist, return error with hint if missing
pub fn require_tool(tool_name: &str, required_for: &str) -> Result<ToolInfo> {
    match check_tool(tool_name) {
        Some(info) => Ok(info),
        None => Err(DevflowError::missing_tool(tool_name, required_for, get_tool_hint(tool_name)).into()),
    }
}

/// Get installation hint for a tool
pub fn get_tool_hint(tool_name: &str) -> &'static str {
    match tool_name {
        "git" => hints::git(),
        "gh" => hints::gh(),
        "npm" | "yarn" | "pnpm" | "node" => hints::node(),
        "java" | "mvn" | "gradle" => hints::java(),
        _ => "Install this tool and ensure it's in your PATH",
    }
}

/// Tools needed to work on a project of `project_type` at `root`
pub fn project_tool_needs(project_type: Option<ProjectType>, root: &Path) -> Vec<ToolNeed> {
    let mut needs = vec![
        ToolNeed {
            name: "git",
            requirement: ToolRequirement::Required,
            required_for: "deployments",
        },
        ToolNeed {
            name: "gh",
            requirement: ToolRequirement::Optional,
            required_for: "release pull requests",
        },
    ];

    match project_type {
        Some(ProjectType::SpringBootMicroservice) => {
            needs.push(ToolNeed {
                name: "java",
                requirement: ToolRequirement::Recommended,
                required_for: "running services",
            });
            needs.push(ToolNeed {
                name: "mvn",
                requirement: ToolRequirement::Optional,
                required_for: "Maven services without mvnw",
            });
            needs.push(ToolNeed {
                name: "gradle",
                requirement: ToolRequirement::Optional,
                required_for: "Gradle services without gradlew",
            });
        }
        other => {
            needs.push(ToolNeed {
                name: PackageManager::detect(root).program(),
                requirement: ToolRequirement::Recommended,
                required_for: "dependency installs after a version bump",
            });
            if other == Some(ProjectType::ReactNativeCli) {
                needs.push(ToolNeed {
                    name: "java",
                    requirement: ToolRequirement::Recommended,
                    required_for: "Android builds",
                });
            }
        }
    }

    needs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_tool_error() {
        let err = require_tool("devflow-definitely-missing-tool", "testing").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DevflowError>(),
            Some(DevflowError::MissingTool { .. })
        ));
    }

    #[test]
    fn test_spring_needs_java() {
        let temp_dir = TempDir::new().unwrap();
        let needs = project_tool_needs(Some(ProjectType::SpringBootMicroservice), temp_dir.path());
        let names: Vec<&str> = needs.iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["git", "gh", "java", "mvn", "gradle"]);
    }

    #[test]
    fn test_node_needs_lockfile_package_manager() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("pnpm-lock.yaml"), "").unwrap();

        let needs = project_tool_needs(Some(ProjectType::Nextjs), temp_dir.path());
        assert!(needs.iter().any(|n| n.name == "pnpm"));
        assert_eq!(needs[0].requirement, ToolRequirement::Required);
    }
}
