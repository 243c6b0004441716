//! Project configuration (devflow.config.json)

pub mod migrate;
mod schema;
pub mod store;
pub mod validation;

pub use schema::{Config, DatabaseConfig, DbType, ProjectType, ServiceConfig, SpringBootConfig};
pub use store::{CONFIG_FILE_NAME, LATEST_VERSION};
