//! Core abstractions shared by the query builder and the catalog readers.
//!
//! - [`identifier`]: Identifier validation and quoting
//! - [`literal`]: Parsing of catalog literal text (array literals, MySQL enums)
//! - [`filter`]: Typed filter conditions and sort rules
//! - [`request`]: Browse and edit requests consumed by the assembler
//! - [`value`]: Bound parameter values
//! - [`schema`]: Table, column, constraint, and index metadata
//! - [`traits`]: The `Dialect` and `CatalogReader` seams
//!
//! The core module is database-agnostic; engine specifics live in `drivers`.

pub mod filter;
pub mod identifier;
pub mod literal;
pub mod request;
pub mod schema;
pub mod traits;
pub mod value;

pub use filter::{
    normalize_is_value, CompareOperator, IsSentinel, SortDirection, TableFilterCondition,
    TableSortRule,
};
pub use identifier::quote_identifier;
pub use literal::{parse_array_literal, parse_mysql_enum_values};
pub use request::{
    ColumnValue, DeleteRowsRequest, InsertRowRequest, TableCountOptions, TableDataOptions,
    UpdateCellRequest, DEFAULT_PAGE_SIZE,
};
pub use schema::{
    ColumnInfo, ConstraintInfo, ConstraintKind, ForeignKeyInfo, IndexInfo, ReferentialAction,
    TableInfo, TableKind, TableSummary,
};
pub use traits::{CatalogReader, Dialect};
pub use value::SqlValue;
