//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::common::SslMode;
    use crate::error::BrowseError;

    const SAMPLE: &str = r#"
connection:
  type: postgres
  host: db.internal
  database: app
  user: app
  password: hunter2
  ssl_mode: verify-full
browse:
  default_schema: sales
  default_page_size: 25
"#;

    #[test]
    fn test_from_yaml() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.connection.db_type, DatabaseType::Postgres);
        assert_eq!(config.connection.port(), 5432);
        assert_eq!(config.connection.ssl_mode, SslMode::VerifyFull);
        assert_eq!(config.connection.max_connections, 4);
        assert_eq!(config.browse.default_schema.as_deref(), Some("sales"));
        assert_eq!(config.browse.default_page_size, 25);
    }

    #[test]
    fn test_mysql_defaults() {
        let yaml = "connection:\n  type: mariadb\n  host: h\n  database: shop\n  user: u\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.connection.db_type, DatabaseType::Mysql);
        assert_eq!(config.connection.port(), 3306);
        assert_eq!(config.connection.ssl_mode, SslMode::Disable);
        assert_eq!(config.browse.default_page_size, 50);
        assert_eq!(
            config
                .browse
                .schema_or_default(config.connection.db_type, &config.connection.database),
            "shop"
        );
    }

    #[test]
    fn test_password_never_serialized() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        let out = serde_yaml::to_string(&config).unwrap();
        assert!(!out.contains("hunter2"));
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn test_unknown_type_is_yaml_error() {
        let yaml = "connection:\n  type: oracle\n  host: h\n  database: d\n  user: u\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, BrowseError::Yaml(_)));
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG_ERROR);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/dbbrowse.yaml").unwrap_err();
        assert!(matches!(err, BrowseError::Io(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dbbrowse.yaml");
        std::fs::write(&path, SAMPLE).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.connection.host, "db.internal");
    }
}
