//! devflow - developer workflow CLI
//!
//! Wraps git, the Node package managers and Gradle behind a handful of
//! project-aware commands: config management, artifact cleanup and a guided
//! production deploy.
//!
//! ## Architecture
//!
//! ```text
//! cli → commands/ → config/ + detect/ → deploy/ → exec/ (git, npm, gh)
//! ```

mod cli;
mod commands;
mod config;
mod deploy;
mod detect;
mod error;
mod exec;
mod manifest;
mod utils;
mod version;

use clap::Parser;

use cli::Cli;
use error::DevflowError;
use utils::terminal::print_error;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
    log::debug!("parsed arguments: {:?}", cli);

    if let Err(e) = cli.execute() {
        match e.downcast_ref::<DevflowError>() {
            Some(err) => err.display_with_hints(),
            None => print_error(&format!("{:#}", e)),
        }
        std::process::exit(1);
    }
}
