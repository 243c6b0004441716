//! Bringing outdated configs up to [`LATEST_VERSION`](super::LATEST_VERSION)
//!
//! Version 1 files predate the `database` and `springBoot` sections. A
//! migration keeps every field that is present and fills the missing
//! archetype section from the sub-detectors.

use std::path::Path;

use super::{Config, ProjectType, SpringBootConfig};
use crate::detect::{detect_database_config, detect_spring_boot_services};

/// A migrated config and a description of what was filled in
#[derive(Debug, Clone)]
pub struct Migration {
    pub config: Config,
    pub changes: Vec<String>,
}

/// Fill sections an older schema could not carry
pub fn migrate(config: &Config, root: &Path) -> Migration {
    let mut migrated = config.clone();
    let mut changes = Vec::new();

    if migrated.project_type == ProjectType::SpringBootMicroservice && migrated.spring_boot.is_none() {
        let services = detect_spring_boot_services(root);
        if !services.is_empty() {
            changes.push(format!("added springBoot section with {} service(s)", services.len()));
            migrated.spring_boot = Some(SpringBootConfig { services });
        }
    }

    if migrated.project_type.has_database() && migrated.database.is_none() {
        if let Some(database) = detect_database_config(root) {
            changes.push("added database section".to_string());
            migrated.database = Some(database);
        }
    }

    Migration {
        config: migrated,
        changes,
    }
}
