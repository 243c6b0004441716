//! External process execution

pub mod subprocess;

#[cfg(test)]
pub mod mock;

pub use subprocess::{command_exists, CommandRunner, Invocation, SystemRunner};
