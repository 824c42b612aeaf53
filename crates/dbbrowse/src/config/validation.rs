//! Configuration validation.

use super::Config;
use crate::core::identifier::validate_identifier;
use crate::error::{BrowseError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let conn = &config.connection;

    if conn.host.is_empty() {
        return Err(BrowseError::Config("connection.host is required".into()));
    }
    if conn.database.is_empty() {
        return Err(BrowseError::Config("connection.database is required".into()));
    }
    if conn.user.is_empty() {
        return Err(BrowseError::Config("connection.user is required".into()));
    }
    if conn.port == Some(0) {
        return Err(BrowseError::Config("connection.port must not be 0".into()));
    }
    if conn.max_connections == 0 {
        return Err(BrowseError::Config(
            "connection.max_connections must be at least 1".into(),
        ));
    }

    if config.browse.default_page_size == 0 {
        return Err(BrowseError::Config(
            "browse.default_page_size must be at least 1".into(),
        ));
    }
    if let Some(schema) = &config.browse.default_schema {
        validate_identifier(schema)
            .map_err(|e| BrowseError::Config(format!("browse.default_schema: {}", e)))?;
    }

    Ok(())
}
