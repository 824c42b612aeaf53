//! Normalization of raw catalog rows.
//!
//! Drivers fetch rows from `information_schema` / `pg_catalog` into the raw
//! structs below, keeping values as the database spells them. The functions
//! here turn them into [`ColumnInfo`], [`ConstraintInfo`] and [`IndexInfo`]
//! without touching a database, so every mapping rule is unit-testable.

use tracing::warn;

use crate::core::literal::parse_mysql_enum_values;
use crate::core::schema::{
    ColumnInfo, ConstraintInfo, ConstraintKind, ForeignKeyInfo, IndexInfo, ReferentialAction,
};

/// Where a column's enum labels come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawEnumLabels {
    #[default]
    None,
    /// Labels decoded from a `text[]` column, already in sort order.
    Labels(Vec<String>),
    /// MySQL `COLUMN_TYPE`, e.g. `enum('a','b')`.
    ColumnType(String),
}

/// One column as read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnRow {
    pub ordinal_position: i32,
    pub name: String,
    pub data_type: String,
    /// `YES` / `NO` as in `information_schema.columns.is_nullable`.
    pub is_nullable: String,
    pub default_value: Option<String>,
    pub is_primary_key: bool,
    pub fk_schema: Option<String>,
    pub fk_table: Option<String>,
    pub fk_column: Option<String>,
    pub fk_on_delete: Option<String>,
    pub fk_on_update: Option<String>,
    pub enum_labels: RawEnumLabels,
}

/// One constraint with its columns already aggregated in key order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstraintRow {
    pub name: String,
    /// `PRIMARY KEY`, `FOREIGN KEY`, `UNIQUE`, `CHECK`, ...
    pub constraint_type: String,
    pub columns: Vec<String>,
    pub referenced_schema: Option<String>,
    pub referenced_table: Option<String>,
    pub referenced_columns: Vec<String>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
    pub definition: Option<String>,
}

/// One index with its columns already aggregated in index order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexRow {
    pub name: String,
    pub columns: Vec<String>,
    pub is_unique: bool,
    pub is_primary: bool,
    pub method: Option<String>,
}

/// Map a referential rule, treating anything unrecognized as `NO ACTION`.
pub fn normalize_action(raw: Option<&str>) -> ReferentialAction {
    match raw {
        None => ReferentialAction::NoAction,
        Some(s) => ReferentialAction::parse(s).unwrap_or_else(|| {
            warn!("Unrecognized referential action '{}', using NO ACTION", s);
            ReferentialAction::NoAction
        }),
    }
}

pub fn normalize_column(row: ColumnRow) -> ColumnInfo {
    let foreign_key = match (row.fk_schema, row.fk_table, row.fk_column) {
        (Some(referenced_schema), Some(referenced_table), Some(referenced_column)) => {
            Some(ForeignKeyInfo {
                referenced_schema,
                referenced_table,
                referenced_column,
                on_delete: normalize_action(row.fk_on_delete.as_deref()),
                on_update: normalize_action(row.fk_on_update.as_deref()),
            })
        }
        _ => None,
    };

    let enum_values = match row.enum_labels {
        RawEnumLabels::None => Vec::new(),
        RawEnumLabels::Labels(labels) => labels,
        RawEnumLabels::ColumnType(raw) => parse_mysql_enum_values(&raw),
    };

    ColumnInfo {
        ordinal_position: row.ordinal_position,
        name: row.name,
        data_type: row.data_type,
        is_nullable: row.is_nullable.trim().eq_ignore_ascii_case("YES"),
        default_value: row.default_value,
        is_primary_key: row.is_primary_key,
        enum_values,
        foreign_key,
    }
}

/// Normalize column rows, sorting by ordinal position.
///
/// A column joined to several foreign keys shows up once per key; only the
/// first row for each ordinal is kept.
pub fn normalize_columns(rows: Vec<ColumnRow>) -> Vec<ColumnInfo> {
    let mut columns: Vec<ColumnInfo> = Vec::with_capacity(rows.len());
    for row in rows {
        if columns
            .iter()
            .any(|c| c.ordinal_position == row.ordinal_position)
        {
            continue;
        }
        columns.push(normalize_column(row));
    }
    columns.sort_by_key(|c| c.ordinal_position);
    columns
}

pub fn normalize_constraint(row: ConstraintRow) -> ConstraintInfo {
    let kind = ConstraintKind::parse(&row.constraint_type);
    let (on_delete, on_update) = if kind == ConstraintKind::ForeignKey {
        (
            Some(normalize_action(row.on_delete.as_deref())),
            Some(normalize_action(row.on_update.as_deref())),
        )
    } else {
        (None, None)
    };

    ConstraintInfo {
        name: row.name,
        kind,
        columns: row.columns,
        referenced_schema: row.referenced_schema,
        referenced_table: row.referenced_table,
        referenced_columns: row.referenced_columns,
        on_delete,
        on_update,
        definition: row.definition.filter(|d| !d.is_empty()),
    }
}

pub fn normalize_index(row: IndexRow) -> IndexInfo {
    IndexInfo {
        name: row.name,
        columns: row.columns,
        is_unique: row.is_unique || row.is_primary,
        is_primary: row.is_primary,
        method: row.method.map(|m| m.to_lowercase()),
    }
}

/// Split a `GROUP_CONCAT` result into its elements.
///
/// MySQL has no array type, so key columns are aggregated into a
/// separator-joined string.
pub fn split_aggregated(raw: Option<&str>, separator: char) -> Vec<String> {
    match raw {
        None | Some("") => Vec::new(),
        Some(s) => s.split(separator).map(str::to_string).collect(),
    }
}
