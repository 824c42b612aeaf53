//! Request types consumed by the query assembler.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::filter::{TableFilterCondition, TableSortRule};
use crate::core::value::SqlValue;

/// Page size used when a request does not specify a limit.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// A page of rows from one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDataOptions {
    pub schema: String,
    pub table: String,
    #[serde(default)]
    pub filters: Vec<TableFilterCondition>,
    #[serde(default)]
    pub sort_rules: Vec<TableSortRule>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl TableDataOptions {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            filters: Vec::new(),
            sort_rules: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn with_filter(mut self, filter: TableFilterCondition) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_sort(mut self, rule: TableSortRule) -> Self {
        self.sort_rules.push(rule);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Effective row limit (defaults to [`DEFAULT_PAGE_SIZE`]).
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Effective row offset (defaults to 0).
    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}

/// Row count for one table under a set of filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCountOptions {
    pub schema: String,
    pub table: String,
    #[serde(default)]
    pub filters: Vec<TableFilterCondition>,
}

impl From<&TableDataOptions> for TableCountOptions {
    fn from(opts: &TableDataOptions) -> Self {
        Self {
            schema: opts.schema.clone(),
            table: opts.table.clone(),
            filters: opts.filters.clone(),
        }
    }
}

/// Change a single cell, addressed by the row's primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCellRequest {
    pub schema: String,
    pub table: String,
    pub column_to_update: String,
    pub new_value: SqlValue,
    /// Primary key columns in predicate order.
    pub primary_key_columns: Vec<String>,
    /// Current primary key values of the row, keyed by column.
    pub primary_key_values: HashMap<String, SqlValue>,
}

/// One column assignment of an inserted row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnValue {
    pub column: String,
    pub value: SqlValue,
}

impl ColumnValue {
    pub fn new(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Insert one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRowRequest {
    pub schema: String,
    pub table: String,
    pub values: Vec<ColumnValue>,
}

/// Delete rows addressed by their primary keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRowsRequest {
    pub schema: String,
    pub table: String,
    pub primary_key_columns: Vec<String>,
    /// Primary key values of each row to delete.
    pub rows: Vec<HashMap<String, SqlValue>>,
}
