//! Output and browser seams for the deploy pipeline

use anyhow::{Context, Result};
use console::style;

use super::DeployStage;
use crate::utils::terminal::{print_info, print_success, print_warning};

/// Receives progress from the pipeline
pub trait Reporter {
    /// A pipeline stage is starting
    fn stage(&self, stage: DeployStage);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn success(&self, message: &str);
}

/// Reporter that writes to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn stage(&self, stage: DeployStage) {
        match stage.position() {
            Some((n, total)) => eprintln!(
                "\n{} {}",
                style(format!("[{}/{}]", n, total)).cyan().bold(),
                style(stage.label()).bold()
            ),
            None => eprintln!("\n{}", style(stage.label()).bold()),
        }
    }

    fn info(&self, message: &str) {
        print_info(message);
    }

    fn warn(&self, message: &str) {
        print_warning(message);
    }

    fn success(&self, message: &str) {
        print_success(message);
    }
}

/// Opens URLs for the user
pub trait Browser {
    fn open(&self, url: &str) -> Result<()>;
}

/// Browser backed by the platform opener
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        open::that(url).with_context(|| format!("Failed to open {}", url))
    }
}
