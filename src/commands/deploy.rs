//! Deploy command implementation

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::store;
use crate::deploy::{
    ConsoleReporter, DeployOptions, Deployer, SystemBrowser, DEV_BRANCH, MAIN_BRANCH,
};
use crate::exec::SystemRunner;
use crate::manifest::Manifest;
use crate::utils::terminal::print_header;
use crate::utils::tools::require_tool;

/// Deploy to dev or production
#[derive(Args, Debug)]
pub struct DeployCommand {
    #[command(subcommand)]
    pub target: DeployTarget,
}

#[derive(Subcommand, Debug)]
pub enum DeployTarget {
    /// Force-push main to the dev branch
    Dev,

    /// Release main: merge stable, bump the version if needed, push and open a PR
    Prod {
        /// Do not open a pull request to stable
        #[arg(long)]
        skip_pr: bool,
    },
}

impl DeployCommand {
    /// Execute the deploy command
    pub fn execute(self, project_dir: &Path) -> Result<()> {
        let config = store::load_required(project_dir)?;
        store::warn_if_outdated(&config);
        require_tool("git", "deployments")?;

        let runner = SystemRunner;
        let reporter = ConsoleReporter;
        let browser = SystemBrowser;
        let deployer = Deployer::new(project_dir, &runner, &reporter, &browser);

        match self.target {
            DeployTarget::Dev => {
                print_header(&format!("Deploying {} to {}", MAIN_BRANCH, DEV_BRANCH));
                deployer.deploy_dev()
            }
            DeployTarget::Prod { skip_pr } => {
                print_header("Production deploy");
                let outcome = deployer
                    .with_options(DeployOptions { create_pr: !skip_pr })
                    .deploy_prod()?;

                print_header("Deploy Summary");
                if let Some(name) = Manifest::load(project_dir).ok().and_then(|m| m.name().map(str::to_string)) {
                    println!("  Package:      {}", name);
                }
                println!("  Version:      v{}", outcome.version);
                println!(
                    "  Auto-bumped:  {}",
                    match (&outcome.previous_version, outcome.bumped) {
                        (Some(prev), true) => format!("yes (from v{})", prev),
                        _ => "no".to_string(),
                    }
                );
                println!("  Deployed at:  {}", outcome.timestamp);
                if let Some(ref url) = outcome.pr_url {
                    println!("  Pull request: {}", url);
                }
                if !outcome.warnings.is_empty() {
                    println!("\n  ⚠️  Completed with {} warning(s):", outcome.warnings.len());
                    for warning in &outcome.warnings {
                        println!("     - {}", warning);
                    }
                }
                println!("{}\n", "=".repeat(60));
                Ok(())
            }
        }
    }
}
