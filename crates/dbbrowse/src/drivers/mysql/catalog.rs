//! MySQL/MariaDB catalog reader.
//!
//! Uses an SQLx pool; rows are decoded into the raw catalog structs and
//! normalized by [`crate::catalog`].

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow, MySqlSslMode};
use sqlx::Row;
use tracing::{debug, info};

use crate::catalog::{
    normalize_columns, normalize_constraint, normalize_index, split_aggregated, ColumnRow,
    ConstraintRow, IndexRow, RawEnumLabels,
};
use crate::config::ConnectionConfig;
use crate::core::schema::{ColumnInfo, ConstraintInfo, IndexInfo, TableKind, TableSummary};
use crate::core::traits::CatalogReader;
use crate::drivers::common::SslMode;
use crate::error::{BrowseError, Result};

use super::queries;

/// Connection pool timeout.
const POOL_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// MySQL/MariaDB catalog reader.
pub struct MysqlCatalog {
    pool: MySqlPool,
}

fn mysql_ssl_mode(mode: SslMode) -> MySqlSslMode {
    match mode {
        SslMode::Disable => MySqlSslMode::Disabled,
        SslMode::Require => MySqlSslMode::Required,
        SslMode::VerifyCa => MySqlSslMode::VerifyCa,
        SslMode::VerifyFull => MySqlSslMode::VerifyIdentity,
    }
}

impl MysqlCatalog {
    /// Create a pool from configuration and test one connection.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port())
            .database(&config.database)
            .username(&config.user)
            .password(&config.password)
            .ssl_mode(mysql_ssl_mode(config.ssl_mode));

        let max_connections = u32::try_from(config.max_connections).unwrap_or(u32::MAX);
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(POOL_CONNECTION_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| BrowseError::pool(e, "creating MySQL pool"))?;

        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| BrowseError::pool(e, "testing MySQL connection"))?;

        info!(
            "Connected to MySQL: {}:{}/{}",
            config.host,
            config.port(),
            config.database
        );

        Ok(Self { pool })
    }

    /// Wrap a pool owned by the caller.
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, context: &str, sql: &str, binds: &[&str]) -> Result<Vec<MySqlRow>> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(*value);
        }
        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BrowseError::introspection(context, e))
    }
}

fn column_row(row: &MySqlRow) -> std::result::Result<ColumnRow, sqlx::Error> {
    let ordinal: i64 = row.try_get("ordinal_position")?;
    let column_type: Option<String> = row.try_get("column_type")?;
    Ok(ColumnRow {
        ordinal_position: i32::try_from(ordinal).unwrap_or(i32::MAX),
        name: row.try_get("column_name")?,
        data_type: row.try_get("data_type")?,
        is_nullable: row.try_get("is_nullable")?,
        default_value: row.try_get("column_default")?,
        is_primary_key: row.try_get::<i64, _>("is_primary_key")? == 1,
        fk_schema: row.try_get("ref_schema")?,
        fk_table: row.try_get("ref_table")?,
        fk_column: row.try_get("ref_column")?,
        fk_on_delete: row.try_get("on_delete")?,
        fk_on_update: row.try_get("on_update")?,
        enum_labels: column_type.map_or(RawEnumLabels::None, RawEnumLabels::ColumnType),
    })
}

fn constraint_row(row: &MySqlRow) -> std::result::Result<ConstraintRow, sqlx::Error> {
    let columns: Option<String> = row.try_get("columns")?;
    let ref_columns: Option<String> = row.try_get("ref_columns")?;
    Ok(ConstraintRow {
        name: row.try_get("constraint_name")?,
        constraint_type: row.try_get("constraint_type")?,
        columns: split_aggregated(columns.as_deref(), ','),
        referenced_schema: row.try_get("ref_schema")?,
        referenced_table: row.try_get("ref_table")?,
        referenced_columns: split_aggregated(ref_columns.as_deref(), ','),
        on_delete: row.try_get("on_delete")?,
        on_update: row.try_get("on_update")?,
        definition: None,
    })
}

fn index_row(row: &MySqlRow) -> std::result::Result<IndexRow, sqlx::Error> {
    let name: String = row.try_get("index_name")?;
    let columns: Option<String> = row.try_get("columns")?;
    Ok(IndexRow {
        is_primary: name == "PRIMARY",
        is_unique: row.try_get::<i64, _>("non_unique")? == 0,
        columns: split_aggregated(columns.as_deref(), ','),
        method: row.try_get("index_type")?,
        name,
    })
}

#[async_trait]
impl CatalogReader for MysqlCatalog {
    async fn list_schemas(&self) -> Result<Vec<String>> {
        let context = "listing schemas";
        let rows = self.fetch(context, queries::LIST_SCHEMAS, &[]).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("schema_name"))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| BrowseError::introspection(context, e))
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<TableSummary>> {
        let context = format!("listing tables of {}", schema);
        let rows = self.fetch(&context, queries::LIST_TABLES, &[schema]).await?;
        rows.iter()
            .map(|row| -> std::result::Result<TableSummary, sqlx::Error> {
                let table_type: String = row.try_get("table_type")?;
                Ok(TableSummary {
                    schema: schema.to_string(),
                    name: row.try_get("table_name")?,
                    kind: TableKind::from_table_type(&table_type),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| BrowseError::introspection(context, e))
    }

    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<ColumnInfo>> {
        let context = format!("listing columns of {}.{}", schema, table);
        let rows = self
            .fetch(&context, queries::LIST_COLUMNS, &[schema, table])
            .await?;
        let raw = rows
            .iter()
            .map(column_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| BrowseError::introspection(context.as_str(), e))?;

        let columns = normalize_columns(raw);
        debug!("Loaded {} columns for {}.{}", columns.len(), schema, table);
        Ok(columns)
    }

    async fn list_constraints(&self, schema: &str, table: &str) -> Result<Vec<ConstraintInfo>> {
        let context = format!("listing constraints of {}.{}", schema, table);
        let rows = self
            .fetch(&context, queries::LIST_CONSTRAINTS, &[schema, table])
            .await?;
        let constraints = rows
            .iter()
            .map(|row| constraint_row(row).map(normalize_constraint))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| BrowseError::introspection(context.as_str(), e))?;

        debug!(
            "Loaded {} constraints for {}.{}",
            constraints.len(),
            schema,
            table
        );
        Ok(constraints)
    }

    async fn list_indexes(&self, schema: &str, table: &str) -> Result<Vec<IndexInfo>> {
        let context = format!("listing indexes of {}.{}", schema, table);
        let rows = self
            .fetch(&context, queries::LIST_INDEXES, &[schema, table])
            .await?;
        let indexes = rows
            .iter()
            .map(|row| index_row(row).map(normalize_index))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| BrowseError::introspection(context.as_str(), e))?;

        debug!("Loaded {} indexes for {}.{}", indexes.len(), schema, table);
        Ok(indexes)
    }

    fn db_type(&self) -> &str {
        "mysql"
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
