//! PostgreSQL catalog reader.
//!
//! Reads schema structure through a deadpool-postgres pool. Rows are decoded
//! into the raw catalog structs and normalized by [`crate::catalog`].

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use tokio_postgres::{Config as PgConfig, Row};
use tracing::{debug, info, warn};

use crate::catalog::{
    normalize_columns, normalize_constraint, normalize_index, ColumnRow, ConstraintRow, IndexRow,
    RawEnumLabels,
};
use crate::config::ConnectionConfig;
use crate::core::schema::{ColumnInfo, ConstraintInfo, IndexInfo, TableKind, TableSummary};
use crate::core::traits::CatalogReader;
use crate::drivers::common::TlsBuilder;
use crate::error::{BrowseError, Result};

use super::queries;

/// PostgreSQL catalog reader.
pub struct PostgresCatalog {
    pool: Pool,
}

impl PostgresCatalog {
    /// Create a pool from configuration and test one connection.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let mut pg_config = PgConfig::new();
        pg_config.host(&config.host);
        pg_config.port(config.port());
        pg_config.dbname(&config.database);
        pg_config.user(&config.user);
        pg_config.password(&config.password);
        pg_config.application_name("dbbrowse");

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let pool = match TlsBuilder::new(config.ssl_mode).build()? {
            None => {
                warn!("PostgreSQL TLS is disabled. Credentials will be transmitted in plaintext.");
                let mgr = Manager::from_config(pg_config, tokio_postgres::NoTls, mgr_config);
                Pool::builder(mgr)
                    .max_size(config.max_connections)
                    .build()
                    .map_err(|e| BrowseError::pool(e, "creating PostgreSQL pool"))?
            }
            Some(tls_connector) => {
                let mgr = Manager::from_config(pg_config, tls_connector, mgr_config);
                Pool::builder(mgr)
                    .max_size(config.max_connections)
                    .build()
                    .map_err(|e| BrowseError::pool(e, "creating PostgreSQL pool"))?
            }
        };

        let client = pool
            .get()
            .await
            .map_err(|e| BrowseError::pool(e, "testing PostgreSQL connection"))?;
        client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| BrowseError::pool(e, "testing PostgreSQL connection"))?;

        info!(
            "Connected to PostgreSQL: {}:{}/{}",
            config.host,
            config.port(),
            config.database
        );

        Ok(Self { pool })
    }

    /// Wrap a pool owned by the caller.
    pub fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    async fn client(&self, context: &str) -> Result<Object> {
        self.pool
            .get()
            .await
            .map_err(|e| BrowseError::introspection(context, e))
    }

    async fn query(
        &self,
        context: &str,
        sql: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        let client = self.client(context).await?;
        client
            .query(sql, params)
            .await
            .map_err(|e| BrowseError::introspection(context, e))
    }
}

fn column_row(row: &Row) -> std::result::Result<ColumnRow, tokio_postgres::Error> {
    let enum_labels = match row.try_get::<_, Option<Vec<String>>>(11)? {
        Some(labels) => RawEnumLabels::Labels(labels),
        None => RawEnumLabels::None,
    };
    Ok(ColumnRow {
        ordinal_position: row.try_get(0)?,
        name: row.try_get(1)?,
        data_type: row.try_get(2)?,
        is_nullable: row.try_get(3)?,
        default_value: row.try_get(4)?,
        is_primary_key: row.try_get(5)?,
        fk_schema: row.try_get(6)?,
        fk_table: row.try_get(7)?,
        fk_column: row.try_get(8)?,
        fk_on_delete: row.try_get(9)?,
        fk_on_update: row.try_get(10)?,
        enum_labels,
    })
}

fn constraint_row(row: &Row) -> std::result::Result<ConstraintRow, tokio_postgres::Error> {
    Ok(ConstraintRow {
        name: row.try_get(0)?,
        constraint_type: row.try_get(1)?,
        columns: row.try_get(2)?,
        referenced_schema: row.try_get(3)?,
        referenced_table: row.try_get(4)?,
        referenced_columns: row.try_get(5)?,
        on_delete: row.try_get(6)?,
        on_update: row.try_get(7)?,
        definition: row.try_get(8)?,
    })
}

fn index_row(row: &Row) -> std::result::Result<IndexRow, tokio_postgres::Error> {
    Ok(IndexRow {
        name: row.try_get(0)?,
        columns: row.try_get(1)?,
        is_unique: row.try_get(2)?,
        is_primary: row.try_get(3)?,
        method: row.try_get(4)?,
    })
}

#[async_trait]
impl CatalogReader for PostgresCatalog {
    async fn list_schemas(&self) -> Result<Vec<String>> {
        let context = "listing schemas";
        let rows = self.query(context, queries::LIST_SCHEMAS, &[]).await?;
        rows.iter()
            .map(|row| row.try_get::<_, String>(0))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| BrowseError::introspection(context, e))
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<TableSummary>> {
        let context = format!("listing tables of {}", schema);
        let rows = self.query(&context, queries::LIST_TABLES, &[&schema]).await?;
        rows.iter()
            .map(|row| -> std::result::Result<TableSummary, tokio_postgres::Error> {
                Ok(TableSummary {
                    schema: schema.to_string(),
                    name: row.try_get(0)?,
                    kind: TableKind::from_table_type(&row.try_get::<_, String>(1)?),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| BrowseError::introspection(context, e))
    }

    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<ColumnInfo>> {
        let context = format!("listing columns of {}.{}", schema, table);
        let rows = self
            .query(&context, queries::LIST_COLUMNS, &[&schema, &table])
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
            .query(&context, queries::LIST_CONSTRAINTS, &[&schema, &table])
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
            .query(&context, queries::LIST_INDEXES, &[&schema, &table])
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
        "postgres"
    }

    async fn close(&self) {
        self.pool.close();
    }
}
