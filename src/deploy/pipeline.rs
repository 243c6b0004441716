//! Dev and production deploy flows
//!
//! The production flow is a linear state machine:
//!
//! ```text
//! Idle → Pulling → ValidatingWorkingTree → ValidatingBranch → DecidingVersion
//!      → Committing → Pushing → CreatingPr → Done
//! ```
//!
//! Every transition before `CreatingPr` is fatal on failure. Pull request
//! creation only degrades to a warning because the release commit is already
//! pushed by then. Each external command runs exactly once.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};

use super::info::DeployInfo;
use super::reporter::{Browser, Reporter};
use super::{DEV_BRANCH, MAIN_BRANCH, REMOTE, STABLE_BRANCH};
use crate::error::DevflowError;
use crate::exec::{CommandRunner, Invocation};
use crate::manifest::{Manifest, PackageManager};
use crate::version::increment_patch;

/// States of the production deploy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStage {
    Idle,
    Pulling,
    ValidatingWorkingTree,
    ValidatingBranch,
    DecidingVersion,
    Committing,
    Pushing,
    CreatingPr,
    Done,
}

impl DeployStage {
    pub fn label(&self) -> &'static str {
        match self {
            DeployStage::Idle => "Starting production deploy",
            DeployStage::Pulling => "Pulling latest changes from stable",
            DeployStage::ValidatingWorkingTree => "Checking working tree",
            DeployStage::ValidatingBranch => "Checking current branch",
            DeployStage::DecidingVersion => "Deciding release version",
            DeployStage::Committing => "Committing release",
            DeployStage::Pushing => "Pushing to main",
            DeployStage::CreatingPr => "Creating pull request",
            DeployStage::Done => "Done",
        }
    }

    /// 1-based position among the working stages, with the total
    pub fn position(&self) -> Option<(usize, usize)> {
        const WORKING: usize = 7;
        let n = match self {
            DeployStage::Pulling => 1,
            DeployStage::ValidatingWorkingTree => 2,
            DeployStage::ValidatingBranch => 3,
            DeployStage::DecidingVersion => 4,
            DeployStage::Committing => 5,
            DeployStage::Pushing => 6,
            DeployStage::CreatingPr => 7,
            DeployStage::Idle | DeployStage::Done => return None,
        };
        Some((n, WORKING))
    }
}

/// Knobs for a production deploy
#[derive(Debug, Clone, Copy)]
pub struct DeployOptions {
    /// Open a pull request from main to stable at the end
    pub create_pr: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self { create_pr: true }
    }
}

/// Summary of a finished production deploy
#[derive(Debug, Clone, Default)]
pub struct DeployOutcome {
    /// Version from the previous deploy record, if there was one
    pub previous_version: Option<String>,
    /// Version that was deployed
    pub version: String,
    /// Whether the patch version was incremented by this run
    pub bumped: bool,
    pub timestamp: String,
    pub pr_url: Option<String>,
    pub warnings: Vec<String>,
    /// Every state visited, in order
    pub stages: Vec<DeployStage>,
}

/// Runs deploys for the project at `root`
pub struct Deployer<'a> {
    root: &'a Path,
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn Reporter,
    browser: &'a dyn Browser,
    options: DeployOptions,
    clock: fn() -> DateTime<Utc>,
}

impl<'a> Deployer<'a> {
    pub fn new(
        root: &'a Path,
        runner: &'a dyn CommandRunner,
        reporter: &'a dyn Reporter,
        browser: &'a dyn Browser,
    ) -> Self {
        Self {
            root,
            runner,
            reporter,
            browser,
            options: DeployOptions::default(),
            clock: Utc::now,
        }
    }

    pub fn with_options(mut self, options: DeployOptions) -> Self {
        self.options = options;
        self
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    fn git<const N: usize>(&self, args: [&str; N]) -> Invocation {
        Invocation::new("git", args).current_dir(self.root)
    }

    /// Force-push local main to the dev branch
    pub fn deploy_dev(&self) -> Result<()> {
        let refspec = format!("{}:{}", MAIN_BRANCH, DEV_BRANCH);
        self.reporter
            .info(&format!("Force-pushing {} to {}", MAIN_BRANCH, DEV_BRANCH));
        self.runner
            .run_checked(&self.git(["push", REMOTE, refspec.as_str(), "--force"]))?;
        self.reporter
            .success(&format!("{} deployed to {}", MAIN_BRANCH, DEV_BRANCH));
        Ok(())
    }

    /// Run the production deploy to completion or to the first fatal error
    pub fn deploy_prod(&self) -> Result<DeployOutcome> {
        let mut outcome = DeployOutcome::default();
        let mut stage = DeployStage::Idle;

        loop {
            outcome.stages.push(stage);
            if stage == DeployStage::Done {
                break;
            }
            if stage.position().is_some() {
                self.reporter.stage(stage);
            }
            stage = self.transition(stage, &mut outcome)?;
        }

        self.reporter.success(&format!(
            "Deployed v{} to {}",
            outcome.version, MAIN_BRANCH
        ));
        Ok(outcome)
    }

    /// Perform the work of `stage` and return the next one
    pub fn transition(&self, stage: DeployStage, outcome: &mut DeployOutcome) -> Result<DeployStage> {
        let next = match stage {
            DeployStage::Idle => DeployStage::Pulling,
            DeployStage::Pulling => {
                self.pull()?;
                DeployStage::ValidatingWorkingTree
            }
            DeployStage::ValidatingWorkingTree => {
                self.ensure_clean_tree()?;
                DeployStage::ValidatingBranch
            }
            DeployStage::ValidatingBranch => {
                self.ensure_main_branch()?;
                DeployStage::DecidingVersion
            }
            DeployStage::DecidingVersion => {
                self.decide_version(outcome)?;
                DeployStage::Committing
            }
            DeployStage::Committing => {
                self.commit(outcome)?;
                DeployStage::Pushing
            }
            DeployStage::Pushing => {
                self.runner
                    .run_checked(&self.git(["push", REMOTE, MAIN_BRANCH]))?;
                DeployStage::CreatingPr
            }
            DeployStage::CreatingPr => {
                self.create_pull_request(outcome);
                DeployStage::Done
            }
            DeployStage::Done => DeployStage::Done,
        };
        Ok(next)
    }

    /// Merge stable into the current branch; local side wins conflicts
    fn pull(&self) -> Result<()> {
        self.runner.run_checked(&self.git([
            "pull",
            REMOTE,
            STABLE_BRANCH,
            "--no-edit",
            "-X",
            "ours",
        ]))?;
        Ok(())
    }

    fn ensure_clean_tree(&self) -> Result<()> {
        let status = self
            .runner
            .run_checked(&self.git(["status", "--porcelain"]))?;

        let files: Vec<String> = status
            .stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.trim().to_string())
            .collect();

        if !files.is_empty() {
            return Err(DevflowError::UncommittedChanges { files }.into());
        }
        Ok(())
    }

    fn ensure_main_branch(&self) -> Result<()> {
        let result = self
            .runner
            .run_checked(&self.git(["rev-parse", "--abbrev-ref", "HEAD"]))?;
        let branch = result.stdout.trim();

        if branch != MAIN_BRANCH {
            return Err(DevflowError::WrongBranch {
                expected: MAIN_BRANCH.to_string(),
                current: branch.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Auto-increment when the manifest still carries the last deployed
    /// version, then record the deploy. Nothing is written before the
    /// decision is known to be valid.
    fn decide_version(&self, outcome: &mut DeployOutcome) -> Result<()> {
        let mut manifest = Manifest::load(self.root)?;
        let current = manifest.require_version()?;

        let previous = match DeployInfo::load(self.root) {
            Ok(Some(info)) => {
                outcome.previous_version = Some(info.version.clone());
                info
            }
            Ok(None) => {
                self.reporter
                    .info("No previous deploy recorded, treating this as the first deploy");
                DeployInfo::default()
            }
            Err(e) => {
                self.record_warning(
                    outcome,
                    format!("Ignoring unreadable deploy record: {:#}", e),
                );
                DeployInfo::default()
            }
        };

        let version = if current == previous.version {
            let next = increment_patch(&current)?;
            self.reporter.info(&format!(
                "v{} was already deployed, bumping to v{}",
                current, next
            ));

            manifest.set_version(&next);
            manifest.save()?;

            let package_manager = PackageManager::detect(self.root);
            self.reporter
                .info(&format!("Running {} install", package_manager));
            self.runner.run_checked(
                &Invocation::new(package_manager.program(), package_manager.install_args().iter().copied())
                    .current_dir(self.root)
                    .inherit_io(),
            )?;

            outcome.bumped = true;
            next
        } else {
            self.reporter.info(&format!(
                "Deploying v{} (last deployed: {})",
                current,
                if previous.version.is_empty() {
                    "none"
                } else {
                    previous.version.as_str()
                }
            ));
            current
        };

        let timestamp = (self.clock)().to_rfc3339_opts(SecondsFormat::Millis, true);
        DeployInfo {
            last_deploy: timestamp.clone(),
            hash: previous.hash,
            version: version.clone(),
        }
        .save(self.root)?;

        outcome.version = version;
        outcome.timestamp = timestamp;
        Ok(())
    }

    fn commit(&self, outcome: &DeployOutcome) -> Result<()> {
        let message = commit_message(&outcome.version, &outcome.timestamp);
        self.runner.run_checked(&self.git(["add", "-A"]))?;
        self.runner
            .run_checked(&self.git(["commit", "-m", message.as_str()]))?;
        Ok(())
    }

    /// Open a PR from main to stable. Failures are recorded, never returned.
    fn create_pull_request(&self, outcome: &mut DeployOutcome) {
        if !self.options.create_pr {
            self.reporter.info("Skipping pull request creation");
            return;
        }

        let title = format!("Release v{}", outcome.version);
        let body = format!(
            "Production release v{} deployed at {}.",
            outcome.version, outcome.timestamp
        );
        let invocation = Invocation::new(
            "gh",
            [
                "pr",
                "create",
                "--base",
                STABLE_BRANCH,
                "--head",
                MAIN_BRANCH,
                "--title",
                title.as_str(),
                "--body",
                body.as_str(),
            ],
        )
        .current_dir(self.root);

        let url = match self.runner.run(&invocation) {
            Ok(result) if result.success => result
                .stdout
                .lines()
                .map(str::trim)
                .rev()
                .find(|l| l.starts_with("http"))
                .map(str::to_string),
            Ok(result) => {
                self.record_warning(
                    outcome,
                    format!(
                        "Could not create pull request ({}): {}",
                        result.exit_code,
                        result.stderr.trim()
                    ),
                );
                return;
            }
            Err(e) => {
                self.record_warning(
                    outcome,
                    format!("Could not run gh to create the pull request: {:#}", e),
                );
                return;
            }
        };

        let Some(url) = url else {
            self.record_warning(
                outcome,
                "Pull request created but gh did not print its URL".to_string(),
            );
            return;
        };

        if let Err(e) = self.browser.open(&url) {
            self.record_warning(
                outcome,
                format!("Pull request created but could not be opened: {:#}", e),
            );
        }
        self.reporter.info(&format!("Pull request: {}", url));
        outcome.pr_url = Some(url);
    }

    fn record_warning(&self, outcome: &mut DeployOutcome, message: String) {
        self.reporter.warn(&message);
        outcome.warnings.push(message);
    }
}

/// Release commit message
pub fn commit_message(version: &str, timestamp: &str) -> String {
    format!("chore(release): deploy v{} at {}", version, timestamp)
}
