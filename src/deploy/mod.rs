//! Guided deployments
//!
//! `dev` force-pushes main to the dev branch. `prod` runs the release
//! pipeline in [`pipeline`] and records the result in deploy-info.json.

pub mod info;
pub mod pipeline;
pub mod reporter;

pub use pipeline::{DeployOptions, DeployStage, Deployer};
pub use reporter::{ConsoleReporter, SystemBrowser};

/// Remote every branch is pushed to
pub const REMOTE: &str = "origin";

/// Branch releases are cut from
pub const MAIN_BRANCH: &str = "main";

/// Branch that receives release pull requests
pub const STABLE_BRANCH: &str = "stable";

/// Branch mirrored from main by `deploy dev`
pub const DEV_BRANCH: &str = "dev";
