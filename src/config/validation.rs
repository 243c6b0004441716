//! Configuration validation with helpful error messages
//!
//! Sections only make sense for some archetypes; this module rejects
//! combinations the rest of the tool cannot act on.

use std::collections::HashSet;

use anyhow::Result;

use super::{Config, ProjectType, SpringBootConfig};
use crate::error::DevflowError;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.database.is_some() && !config.project_type.has_database() {
        return Err(DevflowError::config_error_with_hint(
            format!(
                "A database section is not supported for {} projects",
                config.project_type
            ),
            "Remove the \"database\" section or re-run: devflow init --force",
        )
        .into());
    }

    if let Some(ref spring) = config.spring_boot {
        if config.project_type != ProjectType::SpringBootMicroservice {
            return Err(DevflowError::config_error_with_hint(
                format!(
                    "A springBoot section is not supported for {} projects",
                    config.project_type
                ),
                "Remove the \"springBoot\" section or re-run: devflow init --force",
            )
            .into());
        }
        validate_services(spring)?;
    }

    if let Some(ref assets) = config.assets_type_generator {
        if assets.images_dir.trim().is_empty() {
            return Err(DevflowError::config_error(
                "assetsTypeGenerator.imagesDir cannot be empty",
            )
            .into());
        }
    }

    Ok(())
}

/// Validate Spring Boot service entries
fn validate_services(spring: &SpringBootConfig) -> Result<()> {
    let mut seen = HashSet::new();

    for (i, service) in spring.services.iter().enumerate() {
        if service.name.trim().is_empty() {
            return Err(DevflowError::config_error(format!(
                "springBoot.services[{}] has an empty name",
                i
            ))
            .into());
        }

        if service.path.trim().is_empty() {
            return Err(DevflowError::config_error_with_hint(
                format!("Service '{}' has an empty path", service.name),
                "Set \"path\" to the service directory relative to the project root",
            )
            .into());
        }

        // Duplicate startingOrderIndex values are fine; duplicate names are not.
        if !seen.insert(service.name.as_str()) {
            return Err(DevflowError::config_error(format!(
                "Service '{}' is declared more than once",
                service.name
            ))
            .into());
        }
    }

    Ok(())
}
