//! Clean command implementation

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};
use dialoguer::{theme::ColorfulTheme, Confirm};
use walkdir::WalkDir;

use crate::config::{store, ProjectType, ServiceConfig};
use crate::detect::detect_spring_boot_services;

/// Node build outputs removed by `clean node`
const NODE_ARTIFACTS: &[&str] = &["node_modules", "dist", "build", ".next", "coverage"];

/// Per-service outputs of Maven and Gradle
const SPRING_ARTIFACTS: &[&str] = &["target", "build", ".gradle"];

/// Clean build artifacts
#[derive(Args, Debug)]
pub struct CleanCommand {
    /// What to clean
    #[arg(value_enum, default_value_t = CleanTarget::All)]
    pub target: CleanTarget,

    /// Show what would be deleted
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanTarget {
    All,
    Node,
    Android,
    Ios,
    Spring,
}

impl CleanTarget {
    fn title(&self) -> &'static str {
        match self {
            CleanTarget::All => "ALL build artifacts and caches",
            CleanTarget::Node => "Node build outputs",
            CleanTarget::Android => "Android build caches",
            CleanTarget::Ios => "iOS build caches",
            CleanTarget::Spring => "Spring Boot service outputs",
        }
    }
}

/// A directory scheduled for removal, with the name shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
struct Artifact {
    path: PathBuf,
    label: String,
}

impl Artifact {
    fn new(root: &Path, relative: impl AsRef<Path>) -> Self {
        let relative = relative.as_ref();
        Self {
            path: root.join(relative),
            label: format!("{}/", relative.display()),
        }
    }
}

/// Existing artifact directories for `target` under `root`
fn collect_artifacts(target: CleanTarget, root: &Path, services: &[ServiceConfig]) -> Vec<Artifact> {
    let mut found = Vec::new();

    match target {
        CleanTarget::All => {
            for t in [
                CleanTarget::Node,
                CleanTarget::Android,
                CleanTarget::Ios,
                CleanTarget::Spring,
            ] {
                found.extend(collect_artifacts(t, root, services));
            }
            found.dedup_by(|a, b| a.path == b.path);
            return found;
        }
        CleanTarget::Node => {
            for name in NODE_ARTIFACTS {
                found.push(Artifact::new(root, name));
            }
        }
        CleanTarget::Android => {
            let android_dir = root.join("android");
            found.push(Artifact::new(root, "android/build"));
            found.push(Artifact::new(root, "android/.gradle"));

            // android/*/build/ for every subproject
            if let Ok(entries) = fs::read_dir(&android_dir) {
                let mut modules: Vec<String> = entries
                    .flatten()
                    .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .filter(|name| name != "build" && name != ".gradle")
                    .collect();
                modules.sort();
                for module in modules {
                    found.push(Artifact::new(root, format!("android/{}/build", module)));
                }
            }
        }
        CleanTarget::Ios => {
            for rel in ["ios/Pods", "ios/build", "ios/DerivedData"] {
                found.push(Artifact::new(root, rel));
            }
        }
        CleanTarget::Spring => {
            for service in services {
                for name in SPRING_ARTIFACTS {
                    found.push(Artifact::new(root, Path::new(&service.path).join(name)));
                }
            }
        }
    }

    found.retain(|a| a.path.is_dir());
    found
}

/// Services to clean: the configured ones, else whatever detection finds
fn spring_services(root: &Path) -> Vec<ServiceConfig> {
    match store::load_lenient(root) {
        Some(config) if config.project_type == ProjectType::SpringBootMicroservice => config
            .spring_boot
            .map(|s| s.services)
            .unwrap_or_else(|| detect_spring_boot_services(root)),
        _ => detect_spring_boot_services(root),
    }
}

struct ProjectCleaner {
    dry_run: bool,
    cleaned_dirs: Vec<String>,
    cleaned_size: u64,
    failed_dirs: Vec<(String, String)>,
}

impl ProjectCleaner {
    fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            cleaned_dirs: Vec::new(),
            cleaned_size: 0,
            failed_dirs: Vec::new(),
        }
    }

    fn get_dir_size(path: &Path) -> u64 {
        WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter_map(|e| e.metadata().ok())
            .filter(|m| m.is_file())
            .map(|m| m.len())
            .sum()
    }

    fn format_size(size_bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size_bytes as f64;
        let mut unit_idx = 0;

        while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
            size /= 1024.0;
            unit_idx += 1;
        }

        format!("{:.2} {}", size, UNITS[unit_idx])
    }

    fn remove_directory(&mut self, artifact: &Artifact) {
        let size = Self::get_dir_size(&artifact.path);

        if self.dry_run {
            println!(
                "  [DRY RUN] Would remove: {} ({})",
                artifact.label,
                Self::format_size(size)
            );
            self.cleaned_dirs.push(artifact.label.clone());
            self.cleaned_size += size;
            return;
        }

        match fs::remove_dir_all(&artifact.path) {
            Ok(_) => {
                log::debug!("removed {}", artifact.path.display());
                self.cleaned_dirs.push(artifact.label.clone());
                self.cleaned_size += size;
                println!("  ✅ Removed: {} ({})", artifact.label, Self::format_size(size));
            }
            Err(e) => {
                self.failed_dirs.push((artifact.label.clone(), e.to_string()));
                println!("  ❌ Failed to remove {}: {}", artifact.label, e);
            }
        }
    }

    fn clean(&mut self, artifacts: &[Artifact]) {
        for artifact in artifacts {
            self.remove_directory(artifact);
        }
    }

    fn print_summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("  Cleaning Summary");
        println!("{}", "=".repeat(60));

        if self.dry_run {
            println!("  [DRY RUN MODE - No files were actually deleted]");
        }

        if !self.cleaned_dirs.is_empty() {
            let verb = if self.dry_run { "Would clean" } else { "Successfully cleaned" };
            println!("  ✅ {} {} directories:", verb, self.cleaned_dirs.len());
            for dir_name in &self.cleaned_dirs {
                println!("     - {}", dir_name);
            }
            println!("\n  💾 Total space: {}", Self::format_size(self.cleaned_size));
        } else {
            println!("  ℹ️  No directories were cleaned");
        }

        if !self.failed_dirs.is_empty() {
            println!("\n  ❌ Failed to clean {} directories:", self.failed_dirs.len());
            for (dir_name, error) in &self.failed_dirs {
                println!("     - {}: {}", dir_name, error);
            }
        }

        println!("{}\n", "=".repeat(60));

        if self.dry_run {
            println!("💡 Tip: Run without --dry-run to actually delete the files");
        }
    }
}

impl CleanCommand {
    /// Execute the clean command
    pub fn execute(self, project_dir: &Path) -> Result<()> {
        println!("\n{}", "=".repeat(60));
        println!("  Cleaning {}", self.target.title());
        println!("{}", "=".repeat(60));

        let services = match self.target {
            CleanTarget::All | CleanTarget::Spring => spring_services(project_dir),
            _ => Vec::new(),
        };
        let artifacts = collect_artifacts(self.target, project_dir, &services);

        if artifacts.is_empty() {
            println!("  ℹ️  Nothing to clean");
            return Ok(());
        }

        if !self.dry_run && !self.yes {
            for artifact in &artifacts {
                println!("  • {}", artifact.label);
            }
            let proceed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Remove {} directories?", artifacts.len()))
                .default(false)
                .interact_opt()?
                .unwrap_or(false);
            if !proceed {
                println!("  ⏭️  Aborted");
                return Ok(());
            }
        }

        let mut cleaner = ProjectCleaner::new(self.dry_run);
        cleaner.clean(&artifacts);
        cleaner.print_summary();

        Ok(())
    }
}
