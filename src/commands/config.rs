//! Config command - inspect and migrate devflow.config.json
//!
//! Usage:
//!   devflow config show      # Print the config and its schema version
//!   devflow config update    # Migrate an outdated config to the latest schema

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::config::{
    migrate::migrate, store, validation::validate_config, CONFIG_FILE_NAME, LATEST_VERSION,
};
use crate::utils::json::to_pretty_string;
use crate::utils::terminal::{print_info, print_success};

/// Show or migrate devflow.config.json
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the config file
    Show,

    /// Rewrite an outdated config with the latest schema version
    Update,
}

impl ConfigCommand {
    /// Execute the config command
    pub fn execute(self, project_dir: &Path) -> Result<()> {
        match self.action {
            ConfigAction::Show => show(project_dir),
            ConfigAction::Update => update(project_dir),
        }
    }
}

fn show(project_dir: &Path) -> Result<()> {
    let config = store::load_required(project_dir)?;

    let status = if store::is_outdated(&config) {
        style(format!("outdated, latest is {}", LATEST_VERSION)).yellow().to_string()
    } else {
        style("current".to_string()).green().to_string()
    };

    println!(
        "{} (version {}, {})\n",
        store::config_path(project_dir).display(),
        config.version,
        status
    );
    print!("{}", to_pretty_string(&config)?);
    Ok(())
}

fn update(project_dir: &Path) -> Result<()> {
    let config = store::load_required(project_dir)?;

    if !store::is_outdated(&config) {
        validate_config(&config)?;
        print_info(&format!(
            "{} is already at version {}; nothing to update",
            CONFIG_FILE_NAME, config.version
        ));
        return Ok(());
    }

    let from = config.version;
    let migration = migrate(&config, project_dir);
    for change in &migration.changes {
        println!("  • {}", change);
    }

    validate_config(&migration.config)?;
    store::write(&migration.config, project_dir)?;

    print_success(&format!(
        "Updated {} from version {} to {}",
        CONFIG_FILE_NAME, from, LATEST_VERSION
    ));
    Ok(())
}
