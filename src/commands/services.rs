//! Services command - list Spring Boot services in launch order

use std::path::Path;

use anyhow::Result;
use clap::Args;
use console::style;

use crate::config::{store, ProjectType, ServiceConfig, SpringBootConfig};
use crate::detect::detect_spring_boot_services;
use crate::error::DevflowError;
use crate::utils::terminal::{print_header, print_info};

/// List Spring Boot services in launch order
#[derive(Args, Debug)]
pub struct ServicesCommand {
    /// Re-run service detection instead of reading the config (nothing is written)
    #[arg(long)]
    pub detect: bool,
}

impl ServicesCommand {
    /// Execute the services command
    pub fn execute(self, project_dir: &Path) -> Result<()> {
        if self.detect {
            let services = detect_spring_boot_services(project_dir);
            print_header("Detected services");
            print_services(&services.iter().collect::<Vec<_>>());
            if !services.is_empty() {
                print_info("Run `devflow config update` or `devflow init --force` to save them");
            }
            return Ok(());
        }

        let config = store::load_required(project_dir)?;
        store::warn_if_outdated(&config);

        if config.project_type != ProjectType::SpringBootMicroservice {
            return Err(DevflowError::config_error_with_hint(
                format!("this is a {} project, not a Spring Boot one", config.project_type.label()),
                "Use --detect to scan subdirectories anyway",
            )
            .into());
        }

        let spring = config.spring_boot.unwrap_or_else(SpringBootConfig::default);
        print_header("Services (launch order)");
        print_services(&spring.launch_order());
        Ok(())
    }
}

fn print_services(services: &[&ServiceConfig]) {
    if services.is_empty() {
        println!("  ℹ️  No services found");
        return;
    }

    let width = services.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for service in services {
        println!(
            "  {:>3}  {:<width$}  {}",
            style(service.starting_order_index).cyan(),
            service.name,
            style(&service.path).dim(),
            width = width
        );
    }
}
