//! Shared helpers

pub mod json;
pub mod paths;
pub mod terminal;
pub mod tools;
