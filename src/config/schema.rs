//! devflow.config.json schema
//!
//! ```json
//! {
//!   "version": 2,
//!   "projectType": "spring-boot-microservice",
//!   "springBoot": {
//!     "services": [
//!       { "name": "discovery-server", "path": "discovery-server", "startingOrderIndex": 0 },
//!       { "name": "api-gateway", "path": "api-gateway", "startingOrderIndex": 1 }
//!     ]
//!   }
//! }
//! ```

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// Root configuration from devflow.config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Schema version the file was written with
    #[serde(default, deserialize_with = "lenient_version")]
    pub version: u32,

    /// Project archetype
    pub project_type: ProjectType,

    /// Database layout (node-express only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,

    /// Microservices (spring-boot-microservice only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spring_boot: Option<SpringBootConfig>,

    /// Image asset index generator settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_type_generator: Option<AssetsTypeGeneratorConfig>,
}

impl Config {
    /// A config with only the project type set, stamped with version 0
    pub fn new(project_type: ProjectType) -> Self {
        Self {
            version: 0,
            project_type,
            database: None,
            spring_boot: None,
            assets_type_generator: None,
        }
    }
}

/// Project archetypes the tool knows how to handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    NodeExpress,
    ViteReact,
    ReactNativeCli,
    SpringBootMicroservice,
    Nextjs,
}

impl ProjectType {
    pub const ALL: [ProjectType; 5] = [
        ProjectType::NodeExpress,
        ProjectType::ViteReact,
        ProjectType::ReactNativeCli,
        ProjectType::SpringBootMicroservice,
        ProjectType::Nextjs,
    ];

    /// Identifier as stored on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::NodeExpress => "node-express",
            ProjectType::ViteReact => "vite-react",
            ProjectType::ReactNativeCli => "react-native-cli",
            ProjectType::SpringBootMicroservice => "spring-boot-microservice",
            ProjectType::Nextjs => "nextjs",
        }
    }

    /// Human readable label for prompts
    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::NodeExpress => "Node.js + Express",
            ProjectType::ViteReact => "Vite + React",
            ProjectType::ReactNativeCli => "React Native CLI",
            ProjectType::SpringBootMicroservice => "Spring Boot microservices",
            ProjectType::Nextjs => "Next.js",
        }
    }

    /// Whether a `database` section is meaningful for this archetype
    pub fn has_database(&self) -> bool {
        matches!(self, ProjectType::NodeExpress)
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database layout discovered under `database/` and in `.env`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dumps_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrations_dir: Option<String>,

    /// Name of the env variable holding the connection URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_url_env_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_type: Option<DbType>,
}

impl DatabaseConfig {
    pub fn is_empty(&self) -> bool {
        self.dumps_dir.is_none()
            && self.migrations_dir.is_none()
            && self.db_url_env_name.is_none()
            && self.db_name.is_none()
            && self.db_type.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    Mysql,
    Postgres,
    Sqlite,
    Mongodb,
}

impl DbType {
    pub const ALL: [DbType; 4] = [DbType::Mysql, DbType::Postgres, DbType::Sqlite, DbType::Mongodb];

    /// Map a connection URL scheme to a database type
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.to_ascii_lowercase().as_str() {
            "mysql" => Some(DbType::Mysql),
            "postgres" | "postgresql" => Some(DbType::Postgres),
            "sqlite" => Some(DbType::Sqlite),
            "mongodb" | "mongo" => Some(DbType::Mongodb),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DbType::Mysql => "mysql",
            DbType::Postgres => "postgres",
            DbType::Sqlite => "sqlite",
            DbType::Mongodb => "mongodb",
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spring Boot services section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpringBootConfig {
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

impl SpringBootConfig {
    /// Services in launch order. Equal indices keep their declaration order.
    pub fn launch_order(&self) -> Vec<&ServiceConfig> {
        let mut ordered: Vec<&ServiceConfig> = self.services.iter().collect();
        ordered.sort_by_key(|s| s.starting_order_index);
        ordered
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub name: String,

    /// Directory relative to the project root
    pub path: String,

    pub starting_order_index: u32,
}

/// Settings for the image asset index generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetsTypeGeneratorConfig {
    pub images_dir: String,
    pub image_name_case: ImageNameCase,
    pub info_comment: InfoComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageNameCase {
    #[serde(rename = "kebab-case")]
    KebabCase,
    #[serde(rename = "snake_case")]
    SnakeCase,
    #[serde(rename = "any")]
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfoComment {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "short_info")]
    ShortInfo,
}

/// Missing, negative or non-numeric versions read as 0
fn lenient_version<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let version = match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    };
    Ok(u32::try_from(version).unwrap_or(u32::MAX))
}
