//! # dbbrowse
//!
//! Data layer for browsing and editing PostgreSQL and MySQL tables.
//!
//! - **Query building**: typed filters, sort rules and paging compile into
//!   parameterized `SELECT`, `COUNT`, `UPDATE`, `INSERT` and `DELETE`
//!   statements. Identifiers are always quoted; values always travel as
//!   bound parameters.
//! - **Catalog introspection**: schemas, tables, columns (with primary key,
//!   foreign key and enum details), constraints and indexes.
//!
//! Builders are pure and never touch a database. Executing the statements is
//! left to the caller's own connection.
//!
//! ## Example
//!
//! ```rust
//! use dbbrowse::core::{CompareOperator, SortDirection, TableFilterCondition, TableSortRule};
//! use dbbrowse::{build_table_data_query, PostgresDialect, TableDataOptions};
//!
//! let opts = TableDataOptions::new("public", "users")
//!     .with_filter(TableFilterCondition::compare("age", CompareOperator::Gt, 18i64))
//!     .with_sort(TableSortRule::new("name", SortDirection::Asc))
//!     .with_limit(10)
//!     .with_offset(20);
//!
//! let built = build_table_data_query(&PostgresDialect::new(), &opts).unwrap();
//! assert_eq!(
//!     built.query,
//!     r#"SELECT * FROM "public"."users" WHERE "age" > $1 ORDER BY "name" ASC LIMIT $2 OFFSET $3"#
//! );
//! assert_eq!(built.params.len(), 3);
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod query;

// Re-exports for convenient access
pub use crate::config::{BrowseConfig, Config, ConnectionConfig, DatabaseType};
pub use crate::core::{
    CatalogReader, Dialect, SqlValue, TableCountOptions, TableDataOptions, TableInfo,
    UpdateCellRequest,
};
pub use drivers::{connect_catalog, CatalogReaderImpl, DialectImpl, MysqlDialect, PostgresDialect};
pub use error::{BrowseError, Result};
pub use query::{
    build_delete_rows_query, build_insert_row_query, build_table_count_query,
    build_table_data_query, build_update_cell_query, build_where_clause, BuiltQuery,
    CompiledClause,
};
