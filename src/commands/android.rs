//! Android command - drive the Gradle wrapper in android/

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use walkdir::WalkDir;

use crate::error::DevflowError;
use crate::exec::{command_exists, CommandRunner, Invocation, SystemRunner};
use crate::utils::terminal::{print_header, print_info, print_success};

const ANDROID_DIR: &str = "android";

#[cfg(windows)]
const GRADLE_WRAPPER: &str = "gradlew.bat";
#[cfg(not(windows))]
const GRADLE_WRAPPER: &str = "gradlew";

/// Build or clean the Android app
#[derive(Args, Debug)]
pub struct AndroidCommand {
    #[command(subcommand)]
    pub action: AndroidAction,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum AndroidAction {
    /// Assemble an APK (debug unless --release)
    Build {
        #[arg(long)]
        release: bool,
    },

    /// Run `gradlew clean`
    Clean,
}

impl AndroidAction {
    fn task(&self) -> &'static str {
        match self {
            AndroidAction::Build { release: false } => "assembleDebug",
            AndroidAction::Build { release: true } => "assembleRelease",
            AndroidAction::Clean => "clean",
        }
    }
}

impl AndroidCommand {
    /// Execute the android command
    pub fn execute(self, project_dir: &Path) -> Result<()> {
        let android_dir = project_dir.join(ANDROID_DIR);
        if !android_dir.is_dir() {
            return Err(DevflowError::config_error_with_hint(
                format!("no {}/ directory in {}", ANDROID_DIR, project_dir.display()),
                "Run this from a React Native project root",
            )
            .into());
        }

        let invocation = gradle_invocation(&android_dir, self.action)?;
        print_header(&format!("gradle {}", self.action.task()));
        SystemRunner.run_checked(&invocation)?;

        match self.action {
            AndroidAction::Build { .. } => {
                let apks = find_apks(&android_dir);
                if apks.is_empty() {
                    print_info("Build finished but no APK was found under android/");
                }
                for apk in apks {
                    print_success(&format!("APK: {}", apk.display()));
                }
            }
            AndroidAction::Clean => print_success("Android build cleaned"),
        }
        Ok(())
    }
}

/// Gradle command for `action`, preferring the project's wrapper
fn gradle_invocation(android_dir: &Path, action: AndroidAction) -> Result<Invocation> {
    let wrapper = android_dir.join(GRADLE_WRAPPER);
    let program = if wrapper.is_file() {
        wrapper.to_string_lossy().into_owned()
    } else if command_exists("gradle") {
        log::debug!("{} not found, falling back to gradle on PATH", wrapper.display());
        "gradle".to_string()
    } else {
        return Err(DevflowError::missing_tool(
            "gradle",
            "Android builds",
            crate::utils::tools::get_tool_hint("gradle"),
        )
        .into());
    };

    Ok(Invocation::new(&program, [action.task()])
        .current_dir(android_dir)
        .inherit_io())
}

/// APKs produced under `android/*/build/outputs/apk`
fn find_apks(android_dir: &Path) -> Vec<PathBuf> {
    let mut apks: Vec<PathBuf> = WalkDir::new(android_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map(|x| x == "apk").unwrap_or(false))
        .filter(|e| e.path().components().any(|c| c.as_os_str() == "outputs"))
        .map(|e| e.into_path())
        .collect();
    apks.sort();
    apks
}
