//! CLI argument parsing using clap derive macros

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{
    android::AndroidCommand, check::CheckCommand, clean::CleanCommand, config::ConfigCommand,
    deploy::DeployCommand, init::InitCommand, services::ServicesCommand,
};
use crate::utils::paths::resolve_project_dir;

/// devflow - project-aware developer workflow
///
/// Detects what kind of project you are in, keeps a small config file next to
/// it and drives git through a guided release flow.
#[derive(Parser, Debug)]
#[command(name = "devflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project directory (default: nearest directory with devflow.config.json, else cwd)
    #[arg(short = 'C', long, global = true, env = "DEVFLOW_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect the project type and write devflow.config.json
    Init(InitCommand),

    /// Show or migrate devflow.config.json
    Config(ConfigCommand),

    /// Deploy to dev or production
    Deploy(DeployCommand),

    /// Clean build artifacts
    Clean(CleanCommand),

    /// Check required tools
    Check(CheckCommand),

    /// List Spring Boot services in launch order
    Services(ServicesCommand),

    /// Build the Android app with the Gradle wrapper
    Android(AndroidCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // Set up terminal colors
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        let project_dir = resolve_project_dir(self.project_dir.as_deref())?;
        log::debug!("project directory: {}", project_dir.display());

        // Execute the subcommand
        match self.command {
            Commands::Init(cmd) => cmd.execute(&project_dir),
            Commands::Config(cmd) => cmd.execute(&project_dir),
            Commands::Deploy(cmd) => cmd.execute(&project_dir),
            Commands::Clean(cmd) => cmd.execute(&project_dir),
            Commands::Check(cmd) => cmd.execute(&project_dir),
            Commands::Services(cmd) => cmd.execute(&project_dir),
            Commands::Android(cmd) => cmd.execute(&project_dir),
        }
    }
}
