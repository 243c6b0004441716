//! Project-type detection
//!
//! Heuristics run in a fixed order and the first match wins:
//!
//! 1. Structural Spring Boot probe over the immediate subdirectories
//! 2. package.json dependencies (`next`, `express`, `vite` + `react`,
//!    `react-native`)
//!
//! Detection never fails: I/O and parse problems are logged and read as
//! "no match", leaving the choice to the user.

pub mod database;
pub mod services;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::ProjectType;
use crate::manifest::Manifest;

pub use database::detect_database_config;
pub use services::detect_spring_boot_services;

/// Files that mark a directory as a Maven or Gradle module
pub const BUILD_MARKERS: &[&str] = &[
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "mvnw",
    "mvnw.cmd",
];

/// Terms that commonly name a microservice directory
const SERVICE_NAME_TERMS: &[&str] = &[
    "service",
    "gateway",
    "registry",
    "auth",
    "discovery",
    "eureka",
    "config-server",
    "api",
    "admin-server",
    "notification",
    "payment",
    "inventory",
];

fn service_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let alternation = SERVICE_NAME_TERMS
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("(?i)({})", alternation)).expect("service name pattern is valid")
    })
}

/// Whether a directory name looks like a microservice
pub fn looks_like_service_name(name: &str) -> bool {
    service_name_pattern().is_match(name)
}

/// Whether `dir` carries any Maven/Gradle build marker
pub fn has_build_marker(dir: &Path) -> bool {
    BUILD_MARKERS.iter().any(|marker| dir.join(marker).is_file())
}

/// Immediate subdirectories of `root` that carry a build marker, sorted by name
pub(crate) fn build_module_dirs(root: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut modules = Vec::new();

    for entry in fs::read_dir(root)?.flatten() {
        match entry.file_type() {
            Ok(t) if t.is_dir() => {}
            Ok(_) => continue,
            Err(e) => {
                log::debug!("skipping {}: {}", entry.path().display(), e);
                continue;
            }
        }

        let path = entry.path();
        if has_build_marker(&path) {
            modules.push((entry.file_name().to_string_lossy().to_string(), path));
        }
    }

    modules.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(modules)
}

/// Classify the project at `root`
pub fn detect_project_type(root: &Path) -> Option<ProjectType> {
    if is_spring_boot_layout(root) {
        log::debug!("detected spring-boot-microservice from directory structure");
        return Some(ProjectType::SpringBootMicroservice);
    }

    let detected = detect_from_manifest(root);
    log::debug!("manifest-based detection: {:?}", detected);
    detected
}

/// Structural probe: two or more build modules, or one with a service-like name
fn is_spring_boot_layout(root: &Path) -> bool {
    let modules = match build_module_dirs(root) {
        Ok(modules) => modules,
        Err(e) => {
            log::debug!("spring boot probe failed in {}: {}", root.display(), e);
            return false;
        }
    };

    modules.len() >= 2 || modules.iter().any(|(name, _)| looks_like_service_name(name))
}

fn detect_from_manifest(root: &Path) -> Option<ProjectType> {
    let manifest = match Manifest::load(root) {
        Ok(manifest) => manifest,
        Err(e) => {
            log::debug!("no usable manifest: {:#}", e);
            return None;
        }
    };

    let deps = manifest.dependency_names();
    let has = |name: &str| deps.contains(name);

    if has("next") {
        Some(ProjectType::Nextjs)
    } else if has("express") {
        Some(ProjectType::NodeExpress)
    } else if has("vite") && has("react") {
        Some(ProjectType::ViteReact)
    } else if has("react-native") {
        Some(ProjectType::ReactNativeCli)
    } else {
        None
    }
}
