//! Check command implementation
//!
//! Reports which of the tools devflow shells out to are installed, and
//! whether git knows who is committing.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::config::store;
use crate::detect::detect_project_type;
use crate::error::DevflowError;
use crate::exec::{CommandRunner, Invocation, SystemRunner};
use crate::utils::terminal::{create_spinner, print_header};
use crate::utils::tools::{check_tool, get_tool_hint, project_tool_needs, ToolNeed, ToolRequirement};

/// Check the development environment
#[derive(Args, Debug)]
pub struct CheckCommand {}

impl CheckCommand {
    /// Execute the check command
    pub fn execute(self, project_dir: &Path) -> Result<()> {
        let project_type = match store::load_lenient(project_dir) {
            Some(config) => Some(config.project_type),
            None => detect_project_type(project_dir),
        };

        print_header(&format!(
            "Environment check ({})",
            project_type.map(|t| t.label()).unwrap_or("unknown project type")
        ));

        let mut checker = EnvironmentChecker::default();
        let spinner = create_spinner("Looking for tools...");
        let statuses: Vec<(ToolNeed, Option<String>)> = project_tool_needs(project_type, project_dir)
            .into_iter()
            .map(|need| {
                spinner.set_message(format!("Checking {}...", need.name));
                let found = check_tool(need.name).map(|info| {
                    log::debug!("{} found at {}", info.name, info.path.display());
                    info.version.unwrap_or_default()
                });
                (need, found)
            })
            .collect();
        spinner.finish_and_clear();

        for (need, found) in &statuses {
            checker.record_tool(need, found.as_deref());
        }
        checker.check_git_identity(&SystemRunner, project_dir);
        checker.print_summary();

        match checker.missing_required.first() {
            Some(need) => Err(DevflowError::missing_tool(
                need.name,
                need.required_for,
                get_tool_hint(need.name),
            )
            .into()),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
struct EnvironmentChecker {
    missing_required: Vec<ToolNeed>,
    warnings: Vec<String>,
}

impl EnvironmentChecker {
    fn record_tool(&mut self, need: &ToolNeed, version: Option<&str>) {
        match version {
            Some(v) if !v.is_empty() => println!("  ✅ {}: {}", need.name, v),
            Some(_) => println!("  ✅ {}: Found", need.name),
            None => match need.requirement {
                ToolRequirement::Required => {
                    println!("  ❌ {}: not found ({} for {})", need.name, need.requirement.label(), need.required_for);
                    self.missing_required.push(need.clone());
                }
                ToolRequirement::Recommended => {
                    println!("  ⚠️  {}: not found ({} for {})", need.name, need.requirement.label(), need.required_for);
                    self.warnings.push(format!("{} is not installed", need.name));
                }
                ToolRequirement::Optional => {
                    println!("  ℹ️  {}: not found (optional, {})", need.name, need.required_for);
                }
            },
        }
    }

    /// Reads `git config user.name` and `user.email`
    fn check_git_identity(&mut self, runner: &dyn CommandRunner, project_dir: &Path) {
        for key in ["user.name", "user.email"] {
            let invocation = Invocation::new("git", ["config", key]).current_dir(project_dir);
            let value = runner
                .run(&invocation)
                .ok()
                .filter(|r| r.success)
                .map(|r| r.stdout.trim().to_string())
                .filter(|v| !v.is_empty());

            match value {
                Some(v) => println!("  ✅ git {}: {}", key, v),
                None => {
                    println!("  ⚠️  git {} is not set", key);
                    self.warnings
                        .push(format!("Run: git config --global {} \"...\"", key));
                }
            }
        }
    }

    fn print_summary(&self) {
        print_header("Summary");

        if self.missing_required.is_empty() && self.warnings.is_empty() {
            println!("  ✅ Everything needed is installed");
        }
        for need in &self.missing_required {
            println!("  ❌ Missing {} (required for {})", need.name, need.required_for);
        }
        for warning in &self.warnings {
            println!("  ⚠️  {}", warning);
        }
        println!("{}\n", "=".repeat(60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::mock::ScriptedRunner;
    use crate::exec::subprocess::CommandResult;
    use tempfile::TempDir;

    fn need(requirement: ToolRequirement) -> ToolNeed {
        ToolNeed {
            name: "git",
            requirement,
            required_for: "deployments",
        }
    }

    #[test]
    fn test_only_required_tools_fail() {
        let mut checker = EnvironmentChecker::default();
        checker.record_tool(&need(ToolRequirement::Optional), None);
        checker.record_tool(&need(ToolRequirement::Recommended), None);
        assert!(checker.missing_required.is_empty());
        assert_eq!(checker.warnings.len(), 1);

        checker.record_tool(&need(ToolRequirement::Required), None);
        assert_eq!(checker.missing_required.len(), 1);
    }

    #[test]
    fn test_git_identity_warns_when_unset() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new()
            .on("git config user.name", CommandResult::ok("Ada Lovelace\n"))
            .on("git config user.email", CommandResult::failed(1, ""));

        let mut checker = EnvironmentChecker::default();
        checker.check_git_identity(&runner, temp.path());

        assert_eq!(runner.calls(), vec!["git config user.name", "git config user.email"]);
        assert_eq!(checker.warnings.len(), 1);
        assert!(checker.warnings[0].contains("user.email"));
    }
}
