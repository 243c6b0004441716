//! Command implementations
//!
//! Each command module provides a clap-derived struct and execute method.

pub mod android;
pub mod check;
pub mod clean;
pub mod config;
pub mod deploy;
pub mod init;
pub mod services;
