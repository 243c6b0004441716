//! Init command implementation
//!
//! Detects the project archetype, runs the matching sub-detectors and writes
//! devflow.config.json. Prompts only fill gaps detection left; the file is
//! written once every answer is in, so an aborted prompt leaves nothing behind.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use crate::config::{
    store, validation::validate_config, Config, DatabaseConfig, DbType, ProjectType,
    SpringBootConfig, CONFIG_FILE_NAME,
};
use crate::detect::{detect_database_config, detect_project_type, detect_spring_boot_services};
use crate::error::DevflowError;
use crate::utils::terminal::{print_info, print_success, print_warning};

/// Detect the project type and write devflow.config.json
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Project type (skips detection)
    #[arg(long = "type", value_enum)]
    pub project_type: Option<ProjectType>,

    /// Use detected values only (no prompts)
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Overwrite an existing config file
    #[arg(short, long)]
    pub force: bool,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(self, project_dir: &Path) -> Result<()> {
        if store::exists(project_dir) && !self.force {
            return Err(DevflowError::config_error_with_hint(
                format!("{} already exists", CONFIG_FILE_NAME),
                "Use --force to overwrite it, or run: devflow config update",
            )
            .into());
        }

        let theme = ColorfulTheme::default();
        let project_type = self.resolve_project_type(project_dir, &theme)?;
        let config = self.build_config(project_type, project_dir, &theme)?;

        validate_config(&config)?;
        store::write(&config, project_dir)?;

        print_success(&format!(
            "Wrote {} for a {} project",
            CONFIG_FILE_NAME,
            project_type.label()
        ));
        if let Some(ref spring) = config.spring_boot {
            for service in spring.launch_order() {
                println!("  {:>3}  {}", service.starting_order_index, service.name);
            }
        }
        Ok(())
    }

    fn resolve_project_type(&self, project_dir: &Path, theme: &ColorfulTheme) -> Result<ProjectType> {
        if let Some(project_type) = self.project_type {
            return Ok(project_type);
        }

        if let Some(detected) = detect_project_type(project_dir) {
            print_info(&format!("Detected project type: {}", detected.label()));
            return Ok(detected);
        }

        if self.yes {
            return Err(DevflowError::config_error_with_hint(
                "Could not detect the project type",
                "Pass it explicitly, e.g.: devflow init --type node-express",
            )
            .into());
        }

        print_warning("Could not detect the project type");
        let labels: Vec<&str> = ProjectType::ALL.iter().map(ProjectType::label).collect();
        let selection = Select::with_theme(theme)
            .with_prompt("Which kind of project is this?")
            .items(&labels)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(index) => Ok(ProjectType::ALL[index]),
            None => bail!("Cancelled; nothing was written"),
        }
    }

    fn build_config(&self, project_type: ProjectType, project_dir: &Path, theme: &ColorfulTheme) -> Result<Config> {
        let mut config = Config::new(project_type);

        if project_type.has_database() {
            if let Some(mut database) = detect_database_config(project_dir) {
                if !self.yes {
                    prompt_missing_database_fields(&mut database, theme)?;
                }
                config.database = Some(database);
            }
        }

        if project_type == ProjectType::SpringBootMicroservice {
            let services = detect_spring_boot_services(project_dir);
            if services.is_empty() {
                print_warning("No Maven or Gradle services found next to the config");
            } else {
                config.spring_boot = Some(SpringBootConfig { services });
            }
        }

        Ok(config)
    }
}

/// Ask for the database fields detection could not fill
fn prompt_missing_database_fields(database: &mut DatabaseConfig, theme: &ColorfulTheme) -> Result<()> {
    if database.db_type.is_none() {
        let labels: Vec<&str> = DbType::ALL.iter().map(DbType::as_str).collect();
        let selection = Select::with_theme(theme)
            .with_prompt("Database type")
            .items(&labels)
            .default(0)
            .interact_opt()?;
        match selection {
            Some(index) => database.db_type = Some(DbType::ALL[index]),
            None => bail!("Cancelled; nothing was written"),
        }
    }

    if database.db_name.is_none() {
        let name: String = Input::with_theme(theme)
            .with_prompt("Database name (empty to skip)")
            .allow_empty(true)
            .interact_text()?;
        database.db_name = Some(name.trim().to_string()).filter(|n| !n.is_empty());
    }

    if database.db_url_env_name.is_none() {
        let env_name: String = Input::with_theme(theme)
            .with_prompt("Env variable holding the connection URL")
            .default("DATABASE_URL".to_string())
            .interact_text()?;
        database.db_url_env_name = Some(env_name.trim().to_string()).filter(|n| !n.is_empty());
    }

    Ok(())
}
