//! Configuration type definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::request::DEFAULT_PAGE_SIZE;
use crate::drivers::common::SslMode;
use crate::error::BrowseError;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database to browse.
    pub connection: ConnectionConfig,

    /// Browsing defaults.
    #[serde(default)]
    pub browse: BrowseConfig,
}

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
    #[serde(alias = "mariadb")]
    Mysql,
}

impl DatabaseType {
    pub fn default_port(&self) -> u16 {
        match self {
            DatabaseType::Postgres => 5432,
            DatabaseType::Mysql => 3306,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Postgres => "postgres",
            DatabaseType::Mysql => "mysql",
        }
    }
}

impl FromStr for DatabaseType {
    type Err = BrowseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DatabaseType::Postgres),
            "mysql" | "mariadb" => Ok(DatabaseType::Mysql),
            other => Err(BrowseError::Config(format!(
                "Unknown database type: '{}'. Supported types: postgres, mysql",
                other
            ))),
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database engine.
    #[serde(rename = "type")]
    pub db_type: DatabaseType,

    /// Database host.
    pub host: String,

    /// Database port (default: 5432 for PostgreSQL, 3306 for MySQL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password. Never written back out.
    #[serde(default, skip_serializing)]
    pub password: String,

    /// SSL mode (default: disable).
    #[serde(default)]
    pub ssl_mode: SslMode,

    /// Pool size (default: 4).
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

impl ConnectionConfig {
    /// Effective port.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.db_type.default_port())
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("db_type", &self.db_type)
            .field("host", &self.host)
            .field("port", &self.port())
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Defaults applied by the CLI when a request leaves them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Schema used when none is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_schema: Option<String>,

    /// Rows per page (default: 50).
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            default_schema: None,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BrowseConfig {
    /// Schema to browse, falling back to the engine's conventional default.
    pub fn schema_or_default(&self, db_type: DatabaseType, database: &str) -> String {
        match &self.default_schema {
            Some(schema) => schema.clone(),
            None => match db_type {
                DatabaseType::Postgres => "public".to_string(),
                // MySQL schemas are databases
                DatabaseType::Mysql => database.to_string(),
            },
        }
    }
}

fn default_max_connections() -> usize {
    4
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
