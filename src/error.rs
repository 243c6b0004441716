//! Error types and helpers for user-friendly error messages
//!
//! Every fatal condition the CLI reports on purpose is a [`DevflowError`].
//! Anything else travels as a plain `anyhow::Error` with context attached.

use std::path::PathBuf;

use thiserror::Error;

/// Custom error types with helpful context and suggestions
#[derive(Error, Debug)]
pub enum DevflowError {
    /// Configuration content is invalid
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        hint: Option<String>,
    },

    /// A command needs the config file and there is none
    #[error("No {file} found in {}", dir.display())]
    ConfigNotFound { file: &'static str, dir: PathBuf },

    /// The config file exists but is not valid JSON for the schema
    #[error("Failed to parse {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// The project manifest is missing
    #[error("Manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    /// The manifest has no usable `version` field
    #[error("No version field in {}", path.display())]
    MissingVersion { path: PathBuf },

    /// A version string is not `major.minor.patch`
    #[error("Invalid version format: '{version}' (expected major.minor.patch)")]
    InvalidVersionFormat { version: String },

    /// The working tree has uncommitted changes
    #[error("You have uncommitted changes; commit or stash them before deploying")]
    UncommittedChanges { files: Vec<String> },

    /// The current branch is not the deploy branch
    #[error("You must be on the '{expected}' branch to deploy (currently on '{current}')")]
    WrongBranch { expected: String, current: String },

    /// An external command exited with a non-zero status
    #[error("Command `{command}` failed with exit code {exit_code}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// Tool/executable not found
    #[error("Missing tool: {tool}")]
    MissingTool {
        tool: String,
        required_for: String,
        hint: String,
    },
}

impl DevflowError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            hint: None,
        }
    }

    /// Create a configuration error with a hint
    pub fn config_error_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(
        tool: impl Into<String>,
        required_for: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            required_for: required_for.into(),
            hint: hint.into(),
        }
    }

    /// Hint shown under the error, if any
    pub fn hint(&self) -> Option<String> {
        match self {
            DevflowError::Config { hint, .. } => hint.clone(),
            DevflowError::ConfigNotFound { .. } => Some(hints::run_init().to_string()),
            DevflowError::ConfigParse { .. } => Some(hints::invalid_config().to_string()),
            DevflowError::ManifestNotFound { .. } | DevflowError::MissingVersion { .. } => {
                Some(hints::manifest_version().to_string())
            }
            DevflowError::InvalidVersionFormat { .. } => {
                Some(hints::manifest_version().to_string())
            }
            DevflowError::UncommittedChanges { .. } => Some(hints::dirty_tree().to_string()),
            DevflowError::WrongBranch { expected, .. } => {
                Some(format!("Run: git checkout {}", expected))
            }
            DevflowError::CommandFailed { .. } => None,
            DevflowError::MissingTool { hint, .. } => Some(hint.clone()),
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        match self {
            DevflowError::UncommittedChanges { files } if !files.is_empty() => {
                eprintln!("\n{}", style("CHANGED:").cyan().bold());
                for file in files.iter().take(20) {
                    eprintln!("  • {}", file);
                }
                if files.len() > 20 {
                    eprintln!("  … and {} more", files.len() - 20);
                }
            }
            DevflowError::CommandFailed { stderr, .. } if !stderr.trim().is_empty() => {
                eprintln!("\n{}", style("OUTPUT:").cyan().bold());
                for line in stderr.trim().lines().take(15) {
                    eprintln!("  {}", line);
                }
            }
            _ => {}
        }

        if let Some(h) = self.hint() {
            eprintln!("\n{} {}", style("HINT:").yellow().bold(), h);
        }

        eprintln!();
    }
}

/// Common error hints
pub mod hints {
    /// Get hint for missing Git
    pub fn git() -> &'static str {
        "Install Git from https://git-scm.com/ or use your package manager:\n\
         • macOS: brew install git\n\
         • Ubuntu: sudo apt install git\n\
         • Windows: winget install Git.Git"
    }

    /// Get hint for missing GitHub CLI
    pub fn gh() -> &'static str {
        "Install the GitHub CLI from https://cli.github.com/ and run: gh auth login\n\
         Without it, open the pull request from main to stable manually."
    }

    /// Get hint for missing Node package manager
    pub fn node() -> &'static str {
        "Install Node.js (which ships npm) from https://nodejs.org/\n\
         • pnpm: npm install -g pnpm\n\
         • yarn: npm install -g yarn"
    }

    /// Get hint for missing Java tooling
    pub fn java() -> &'static str {
        "Install a JDK (17+) and make sure `java` is on PATH.\n\
         Maven and Gradle are optional when the services ship mvnw/gradlew wrappers."
    }

    /// Get hint for missing config file
    pub fn run_init() -> &'static str {
        "To create one in this project:\n\
         • Run: devflow init"
    }

    /// Get hint for invalid config file
    pub fn invalid_config() -> &'static str {
        "devflow.config.json is not valid. Common issues:\n\
         • Invalid JSON syntax (trailing commas, missing quotes)\n\
         • Unknown projectType value\n\
         \n\
         Re-create it with: devflow init --force"
    }

    /// Get hint for manifest version problems
    pub fn manifest_version() -> &'static str {
        "package.json must contain a \"version\" field like \"1.0.0\"."
    }

    /// Get hint for a dirty working tree
    pub fn dirty_tree() -> &'static str {
        "Commit your work (git commit -am \"...\") or stash it (git stash) and retry."
    }
}
