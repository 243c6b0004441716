//! Spring Boot service discovery

use std::path::Path;

use crate::config::ServiceConfig;

use super::build_module_dirs;

/// Launch tier for a service directory name. Infrastructure first.
fn launch_tier(name: &str) -> u8 {
    let lower = name.to_ascii_lowercase();
    if ["registry", "discovery", "eureka", "config"]
        .iter()
        .any(|t| lower.contains(t))
    {
        0
    } else if lower.contains("gateway") {
        2
    } else {
        1
    }
}

/// Every immediate subdirectory with a Maven/Gradle marker, as a service.
///
/// Registry and config servers get the lowest `startingOrderIndex`, gateways
/// the highest; ties are broken by name. Errors yield an empty list.
pub fn detect_spring_boot_services(root: &Path) -> Vec<ServiceConfig> {
    let mut modules = match build_module_dirs(root) {
        Ok(modules) => modules,
        Err(e) => {
            log::debug!("service discovery failed in {}: {}", root.display(), e);
            return Vec::new();
        }
    };

    modules.sort_by(|a, b| (launch_tier(&a.0), &a.0).cmp(&(launch_tier(&b.0), &b.0)));

    modules
        .into_iter()
        .enumerate()
        .map(|(i, (name, _))| ServiceConfig {
            path: name.clone(),
            name,
            starting_order_index: i as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_services_in_launch_order() {
        let temp_dir = TempDir::new().unwrap();
        for (dir, marker) in [
            ("api-gateway", "pom.xml"),
            ("order-service", "build.gradle"),
            ("discovery-server", "pom.xml"),
            ("user-service", "mvnw"),
            ("docs", "README.md"),
        ] {
            fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
            fs::write(temp_dir.path().join(dir).join(marker), "").unwrap();
        }

        let services = detect_spring_boot_services(temp_dir.path());
        let summary: Vec<(&str, u32)> = services
            .iter()
            .map(|s| (s.name.as_str(), s.starting_order_index))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("discovery-server", 0),
                ("order-service", 1),
                ("user-service", 2),
                ("api-gateway", 3),
            ]
        );
        assert_eq!(services[0].path, "discovery-server");
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(detect_spring_boot_services(&temp_dir.path().join("missing")).is_empty());
    }
}
