//! Error types for query building and catalog introspection.

use thiserror::Error;

/// Boxed driver error carried by [`BrowseError::Introspection`].
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for the browsing data layer.
#[derive(Error, Debug)]
pub enum BrowseError {
    /// A schema, table, or column name cannot be safely quoted.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A filter's operator/value combination cannot be rendered.
    #[error("Unsupported filter value: {0}")]
    UnsupportedFilterValue(String),

    /// A row predicate could not be built from the supplied primary key values.
    #[error("Missing primary key value: {0}")]
    MissingPrimaryKeyValue(String),

    /// An edit request is structurally malformed (no columns, no rows, ...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A catalog query failed; the driver error is preserved as the source.
    #[error("Introspection failed while {context}: {source}")]
    Introspection {
        context: String,
        #[source]
        source: DriverError,
    },

    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection pool error with context
    #[error("Pool error: {message}\n  Context: {context}")]
    Pool { message: String, context: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Process exit code for configuration errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Process exit code for rejected requests (identifiers, filters, edits).
pub const EXIT_REQUEST_ERROR: u8 = 2;
/// Process exit code for failed catalog queries.
pub const EXIT_INTROSPECTION_ERROR: u8 = 3;
/// Process exit code for connection failures.
pub const EXIT_POOL_ERROR: u8 = 4;
/// Process exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;

impl BrowseError {
    /// Create a Pool error with context about where it occurred
    pub fn pool(message: impl ToString, context: impl Into<String>) -> Self {
        BrowseError::Pool {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Wrap a driver error raised by a catalog query.
    pub fn introspection<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BrowseError::Introspection {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Map the error onto a process exit code.
    pub fn exit_code(&self) -> u8 {
        match self {
            BrowseError::Config(_) | BrowseError::Yaml(_) => EXIT_CONFIG_ERROR,
            BrowseError::InvalidIdentifier(_)
            | BrowseError::UnsupportedFilterValue(_)
            | BrowseError::MissingPrimaryKeyValue(_)
            | BrowseError::InvalidRequest(_)
            | BrowseError::Json(_) => EXIT_REQUEST_ERROR,
            BrowseError::Introspection { .. } => EXIT_INTROSPECTION_ERROR,
            BrowseError::Pool { .. } => EXIT_POOL_ERROR,
            BrowseError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for browsing operations.
pub type Result<T> = std::result::Result<T, BrowseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(BrowseError::Config("x".into()).exit_code(), EXIT_CONFIG_ERROR);
        assert_eq!(
            BrowseError::InvalidIdentifier("".into()).exit_code(),
            EXIT_REQUEST_ERROR
        );
        assert_eq!(BrowseError::pool("down", "connecting").exit_code(), EXIT_POOL_ERROR);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(BrowseError::from(io).exit_code(), EXIT_IO_ERROR);
    }

    #[test]
    fn test_introspection_keeps_driver_error() {
        let driver = std::io::Error::new(std::io::ErrorKind::Other, "relation does not exist");
        let err = BrowseError::introspection("listing columns", driver);
        assert_eq!(err.exit_code(), EXIT_INTROSPECTION_ERROR);

        let detailed = err.format_detailed();
        assert!(detailed.contains("listing columns"));
        assert!(detailed.contains("Caused by:"));
        assert!(detailed.contains("relation does not exist"));
    }
}
