//! Core traits for dialect-aware query building and catalog introspection.
//!
//! - [`Dialect`]: SQL syntax strategy for one database engine
//! - [`CatalogReader`]: Reads schema structure from a live database
//!
//! # Design Patterns
//!
//! - **Strategy**: `Dialect` implementations provide interchangeable syntax rules
//! - **Template Method**: `CatalogReader::describe_table` composes the per-table listings

use async_trait::async_trait;

use crate::error::Result;

use super::schema::{ColumnInfo, ConstraintInfo, IndexInfo, TableInfo, TableSummary};

/// SQL syntax strategy for different database engines.
///
/// Keeps the query assembler engine-agnostic: everything that differs between
/// PostgreSQL and MySQL in generated SQL text goes through this trait.
pub trait Dialect: Send + Sync {
    /// Get the dialect identifier (e.g., "postgres", "mysql").
    fn name(&self) -> &str;

    /// Quote an identifier (schema, table, or column name).
    ///
    /// - PostgreSQL: `"identifier"`
    /// - MySQL: `` `identifier` ``
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::InvalidIdentifier` for names that cannot be quoted.
    fn quote_ident(&self, name: &str) -> Result<String>;

    /// Quote and qualify a table name with its schema.
    fn qualify(&self, schema: &str, table: &str) -> Result<String> {
        Ok(format!(
            "{}.{}",
            self.quote_ident(schema)?,
            self.quote_ident(table)?
        ))
    }

    /// Get a parameter placeholder for the given 1-based index.
    ///
    /// - PostgreSQL: `$1`, `$2`, etc.
    /// - MySQL: `?` (positional; the index is still tracked by callers)
    fn param_placeholder(&self, index: usize) -> String;

    /// Render a case-insensitive pattern match of a quoted column against a
    /// placeholder.
    fn case_insensitive_like(&self, column: &str, placeholder: &str) -> String {
        format!("{} ILIKE {}", column, placeholder)
    }

    /// Whether `INSERT ... RETURNING *` is available.
    fn supports_returning(&self) -> bool {
        false
    }
}

/// Read schema structure from a database's system catalogs.
///
/// All methods are read-only. Driver failures are returned as
/// `BrowseError::Introspection` with the driver error attached.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// List user schemas (system namespaces excluded).
    async fn list_schemas(&self) -> Result<Vec<String>>;

    /// List tables and views in a schema.
    async fn list_tables(&self, schema: &str) -> Result<Vec<TableSummary>>;

    /// List columns of a table in ordinal order.
    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<ColumnInfo>>;

    /// List constraints of a table.
    async fn list_constraints(&self, schema: &str, table: &str) -> Result<Vec<ConstraintInfo>>;

    /// List indexes of a table.
    async fn list_indexes(&self, schema: &str, table: &str) -> Result<Vec<IndexInfo>>;

    /// Describe a table: columns, constraints, and indexes.
    ///
    /// Template method composing the three per-table listings.
    async fn describe_table(&self, schema: &str, table: &str) -> Result<TableInfo> {
        let columns = self.list_columns(schema, table).await?;
        let constraints = self.list_constraints(schema, table).await?;
        let indexes = self.list_indexes(schema, table).await?;
        Ok(TableInfo {
            schema: schema.to_string(),
            name: table.to_string(),
            columns,
            constraints,
            indexes,
        })
    }

    /// Get the database type identifier (e.g., "postgres", "mysql").
    fn db_type(&self) -> &str;

    /// Close the connection pool.
    async fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{ConstraintKind, TableKind};

    struct FixedCatalog;

    #[async_trait]
    impl CatalogReader for FixedCatalog {
        async fn list_schemas(&self) -> Result<Vec<String>> {
            Ok(vec!["public".to_string()])
        }

        async fn list_tables(&self, schema: &str) -> Result<Vec<TableSummary>> {
            Ok(vec![TableSummary {
                schema: schema.to_string(),
                name: "users".to_string(),
                kind: TableKind::Table,
            }])
        }

        async fn list_columns(&self, _schema: &str, _table: &str) -> Result<Vec<ColumnInfo>> {
            Ok(vec![ColumnInfo {
                ordinal_position: 1,
                name: "id".to_string(),
                data_type: "integer".to_string(),
                is_nullable: false,
                default_value: None,
                is_primary_key: true,
                enum_values: vec![],
                foreign_key: None,
            }])
        }

        async fn list_constraints(
            &self,
            _schema: &str,
            _table: &str,
        ) -> Result<Vec<ConstraintInfo>> {
            Ok(vec![ConstraintInfo {
                name: "users_pkey".to_string(),
                kind: ConstraintKind::PrimaryKey,
                columns: vec!["id".to_string()],
                referenced_schema: None,
                referenced_table: None,
                referenced_columns: vec![],
                on_delete: None,
                on_update: None,
                definition: None,
            }])
        }

        async fn list_indexes(&self, _schema: &str, _table: &str) -> Result<Vec<IndexInfo>> {
            Ok(vec![])
        }

        fn db_type(&self) -> &str {
            "fixed"
        }

        async fn close(&self) {}
    }

    #[tokio::test]
    async fn test_describe_table_composes_listings() {
        let info = FixedCatalog.describe_table("public", "users").await.unwrap();
        assert_eq!(info.full_name(), "public.users");
        assert_eq!(info.columns.len(), 1);
        assert_eq!(info.primary_key_columns(), vec!["id"]);
        assert!(info.indexes.is_empty());
    }
}
