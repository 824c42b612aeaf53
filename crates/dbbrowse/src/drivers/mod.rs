//! Database driver implementations.
//!
//! This module provides database-specific implementations of the core traits:
//!
//! - [`postgres`]: PostgreSQL dialect and catalog reader
//! - [`mysql`]: MySQL/MariaDB dialect and catalog reader
//! - [`common`]: Shared utilities (TLS)
//!
//! # Architecture
//!
//! Each driver module implements:
//! - `Dialect`: SQL syntax strategy for the database engine
//! - `CatalogReader`: Schema introspection against a live pool
//!
//! The enums below dispatch to the configured engine with a plain `match`
//! instead of a `Box<dyn Trait>`.

pub mod common;
pub mod mysql;
pub mod postgres;

use async_trait::async_trait;
use tracing::info;

pub use common::{SslMode, TlsBuilder};

pub use mysql::MysqlDialect;
pub use postgres::{PostgresCatalog, PostgresDialect};

#[cfg(feature = "mysql")]
pub use mysql::MysqlCatalog;

use crate::config::{Config, DatabaseType};
use crate::core::schema::{ColumnInfo, ConstraintInfo, IndexInfo, TableInfo, TableSummary};
use crate::core::traits::{CatalogReader, Dialect};
use crate::error::Result;

/// Enum-based static dispatch for dialects.
#[derive(Debug, Clone)]
pub enum DialectImpl {
    Postgres(PostgresDialect),
    Mysql(MysqlDialect),
}

impl Dialect for DialectImpl {
    fn name(&self) -> &str {
        match self {
            DialectImpl::Postgres(d) => d.name(),
            DialectImpl::Mysql(d) => d.name(),
        }
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        match self {
            DialectImpl::Postgres(d) => d.quote_ident(name),
            DialectImpl::Mysql(d) => d.quote_ident(name),
        }
    }

    fn param_placeholder(&self, index: usize) -> String {
        match self {
            DialectImpl::Postgres(d) => d.param_placeholder(index),
            DialectImpl::Mysql(d) => d.param_placeholder(index),
        }
    }

    fn case_insensitive_like(&self, column: &str, placeholder: &str) -> String {
        match self {
            DialectImpl::Postgres(d) => d.case_insensitive_like(column, placeholder),
            DialectImpl::Mysql(d) => d.case_insensitive_like(column, placeholder),
        }
    }

    fn supports_returning(&self) -> bool {
        match self {
            DialectImpl::Postgres(d) => d.supports_returning(),
            DialectImpl::Mysql(d) => d.supports_returning(),
        }
    }
}

impl DialectImpl {
    /// Create a dialect implementation from a database type string.
    ///
    /// # Errors
    ///
    /// Returns an error if the database type is not recognized.
    pub fn from_db_type(db_type: &str) -> Result<Self> {
        let db_type: DatabaseType = db_type.parse()?;
        Ok(Self::for_type(db_type))
    }

    /// Create the dialect for a parsed database type.
    pub fn for_type(db_type: DatabaseType) -> Self {
        match db_type {
            DatabaseType::Postgres => DialectImpl::Postgres(PostgresDialect::new()),
            DatabaseType::Mysql => DialectImpl::Mysql(MysqlDialect::new()),
        }
    }
}

/// Enum-based static dispatch for catalog readers.
pub enum CatalogReaderImpl {
    Postgres(PostgresCatalog),
    #[cfg(feature = "mysql")]
    Mysql(MysqlCatalog),
}

#[async_trait]
impl CatalogReader for CatalogReaderImpl {
    async fn list_schemas(&self) -> Result<Vec<String>> {
        match self {
            CatalogReaderImpl::Postgres(c) => c.list_schemas().await,
            #[cfg(feature = "mysql")]
            CatalogReaderImpl::Mysql(c) => c.list_schemas().await,
        }
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<TableSummary>> {
        match self {
            CatalogReaderImpl::Postgres(c) => c.list_tables(schema).await,
            #[cfg(feature = "mysql")]
            CatalogReaderImpl::Mysql(c) => c.list_tables(schema).await,
        }
    }

    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<ColumnInfo>> {
        match self {
            CatalogReaderImpl::Postgres(c) => c.list_columns(schema, table).await,
            #[cfg(feature = "mysql")]
            CatalogReaderImpl::Mysql(c) => c.list_columns(schema, table).await,
        }
    }

    async fn list_constraints(&self, schema: &str, table: &str) -> Result<Vec<ConstraintInfo>> {
        match self {
            CatalogReaderImpl::Postgres(c) => c.list_constraints(schema, table).await,
            #[cfg(feature = "mysql")]
            CatalogReaderImpl::Mysql(c) => c.list_constraints(schema, table).await,
        }
    }

    async fn list_indexes(&self, schema: &str, table: &str) -> Result<Vec<IndexInfo>> {
        match self {
            CatalogReaderImpl::Postgres(c) => c.list_indexes(schema, table).await,
            #[cfg(feature = "mysql")]
            CatalogReaderImpl::Mysql(c) => c.list_indexes(schema, table).await,
        }
    }

    async fn describe_table(&self, schema: &str, table: &str) -> Result<TableInfo> {
        match self {
            CatalogReaderImpl::Postgres(c) => c.describe_table(schema, table).await,
            #[cfg(feature = "mysql")]
            CatalogReaderImpl::Mysql(c) => c.describe_table(schema, table).await,
        }
    }

    fn db_type(&self) -> &str {
        match self {
            CatalogReaderImpl::Postgres(c) => c.db_type(),
            #[cfg(feature = "mysql")]
            CatalogReaderImpl::Mysql(c) => c.db_type(),
        }
    }

    async fn close(&self) {
        match self {
            CatalogReaderImpl::Postgres(c) => c.close().await,
            #[cfg(feature = "mysql")]
            CatalogReaderImpl::Mysql(c) => c.close().await,
        }
    }
}

/// Connect a catalog reader for the configured connection.
///
/// # Errors
///
/// Returns `BrowseError::Pool` when the pool cannot be created or the first
/// connection fails, and `BrowseError::Config` for MySQL connections when
/// the crate was built without the `mysql` feature.
pub async fn connect_catalog(config: &Config) -> Result<CatalogReaderImpl> {
    let conn = &config.connection;
    info!(
        "Connecting to {} at {}:{}/{}",
        conn.db_type,
        conn.host,
        conn.port(),
        conn.database
    );

    match conn.db_type {
        DatabaseType::Postgres => Ok(CatalogReaderImpl::Postgres(
            PostgresCatalog::connect(conn).await?,
        )),
        #[cfg(feature = "mysql")]
        DatabaseType::Mysql => Ok(CatalogReaderImpl::Mysql(MysqlCatalog::connect(conn).await?)),
        #[cfg(not(feature = "mysql"))]
        DatabaseType::Mysql => Err(crate::error::BrowseError::Config(
            "MySQL support requires the 'mysql' feature".to_string(),
        )),
    }
}
