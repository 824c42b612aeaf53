//! Table structure metadata recovered from catalog views.
//!
//! These types are plain values built fresh for every introspection call.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Referential action of a foreign key (`ON DELETE` / `ON UPDATE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReferentialAction {
    #[serde(rename = "CASCADE")]
    Cascade,
    #[serde(rename = "RESTRICT")]
    Restrict,
    #[serde(rename = "SET NULL")]
    SetNull,
    #[serde(rename = "SET DEFAULT")]
    SetDefault,
    #[default]
    #[serde(rename = "NO ACTION")]
    NoAction,
}

impl ReferentialAction {
    /// Parse a rule as spelled by `information_schema` (`SET NULL`), with
    /// underscores (`SET_NULL`), or as a `pg_constraint` action code.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().replace('_', " ").as_str() {
            "CASCADE" | "C" => Some(ReferentialAction::Cascade),
            "RESTRICT" | "R" => Some(ReferentialAction::Restrict),
            "SET NULL" | "N" => Some(ReferentialAction::SetNull),
            "SET DEFAULT" | "D" => Some(ReferentialAction::SetDefault),
            "NO ACTION" | "A" => Some(ReferentialAction::NoAction),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
            ReferentialAction::NoAction => "NO ACTION",
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Target of a single-column foreign key reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyInfo {
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_column: String,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    /// Ordinal position (1-based).
    pub ordinal_position: i32,

    /// Column name.
    pub name: String,

    /// Declared data type (e.g. "integer", "character varying", "USER-DEFINED").
    pub data_type: String,

    /// Whether the column allows NULL.
    pub is_nullable: bool,

    /// Default expression, as the catalog reports it.
    pub default_value: Option<String>,

    /// Whether the column is part of the primary key.
    pub is_primary_key: bool,

    /// Enum labels in declaration order; empty for non-enum columns.
    pub enum_values: Vec<String>,

    /// Foreign key target, if the column references another table.
    pub foreign_key: Option<ForeignKeyInfo>,
}

impl ColumnInfo {
    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }
}

/// Kind of a table constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    #[serde(rename = "PRIMARY KEY")]
    PrimaryKey,
    #[serde(rename = "FOREIGN KEY")]
    ForeignKey,
    #[serde(rename = "UNIQUE")]
    Unique,
    #[serde(rename = "CHECK")]
    Check,
    #[serde(rename = "EXCLUDE")]
    Exclude,
    #[serde(rename = "OTHER")]
    Other,
}

impl ConstraintKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRIMARY KEY" => ConstraintKind::PrimaryKey,
            "FOREIGN KEY" => ConstraintKind::ForeignKey,
            "UNIQUE" => ConstraintKind::Unique,
            "CHECK" => ConstraintKind::Check,
            "EXCLUDE" => ConstraintKind::Exclude,
            _ => ConstraintKind::Other,
        }
    }
}

/// Constraint metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintInfo {
    pub name: String,
    pub kind: ConstraintKind,
    /// Constrained columns in key order.
    pub columns: Vec<String>,
    pub referenced_schema: Option<String>,
    pub referenced_table: Option<String>,
    /// Referenced columns, positionally matching `columns`.
    pub referenced_columns: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
    /// Constraint definition text, where the engine exposes it.
    pub definition: Option<String>,
}

/// Index metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    pub name: String,
    /// Indexed columns in index order.
    pub columns: Vec<String>,
    pub is_unique: bool,
    pub is_primary: bool,
    /// Access method (btree, hash, gin, FULLTEXT, ...).
    pub method: Option<String>,
}

/// Whether a listed relation is a base table or a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    #[serde(rename = "TABLE")]
    Table,
    #[serde(rename = "VIEW")]
    View,
}

impl TableKind {
    /// Map an `information_schema.tables.table_type` value.
    pub fn from_table_type(table_type: &str) -> Self {
        if table_type.to_ascii_uppercase().contains("VIEW") {
            TableKind::View
        } else {
            TableKind::Table
        }
    }
}

/// Entry of a table listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub schema: String,
    pub name: String,
    pub kind: TableKind,
}

/// Normalized description of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub schema: String,
    pub name: String,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnInfo>,
    pub constraints: Vec<ConstraintInfo>,
    pub indexes: Vec<IndexInfo>,
}

impl TableInfo {
    /// Get the fully qualified table name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Find a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Primary key column names in key order.
    ///
    /// Uses the primary key constraint when present, falling back to the
    /// per-column flags in ordinal order.
    pub fn primary_key_columns(&self) -> Vec<String> {
        if let Some(pk) = self
            .constraints
            .iter()
            .find(|c| c.kind == ConstraintKind::PrimaryKey)
        {
            return pk.columns.clone();
        }
        self.columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Check if the table has a primary key (and so supports cell edits).
    pub fn has_primary_key(&self) -> bool {
        !self.primary_key_columns().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_column(pos: i32, name: &str, is_pk: bool) -> ColumnInfo {
        ColumnInfo {
            ordinal_position: pos,
            name: name.to_string(),
            data_type: "integer".to_string(),
            is_nullable: !is_pk,
            default_value: None,
            is_primary_key: is_pk,
            enum_values: vec![],
            foreign_key: None,
        }
    }

    fn make_table(columns: Vec<ColumnInfo>, constraints: Vec<ConstraintInfo>) -> TableInfo {
        TableInfo {
            schema: "public".to_string(),
            name: "order_items".to_string(),
            columns,
            constraints,
            indexes: vec![],
        }
    }

    #[test]
    fn test_referential_action_parse() {
        assert_eq!(ReferentialAction::parse("CASCADE"), Some(ReferentialAction::Cascade));
        assert_eq!(ReferentialAction::parse("set null"), Some(ReferentialAction::SetNull));
        assert_eq!(ReferentialAction::parse("SET_DEFAULT"), Some(ReferentialAction::SetDefault));
        assert_eq!(ReferentialAction::parse("a"), Some(ReferentialAction::NoAction));
        assert_eq!(ReferentialAction::parse("r"), Some(ReferentialAction::Restrict));
        assert_eq!(ReferentialAction::parse("SOMETIMES"), None);
    }

    #[test]
    fn test_referential_action_serializes_with_spaces() {
        assert_eq!(
            serde_json::to_string(&ReferentialAction::SetNull).unwrap(),
            "\"SET NULL\""
        );
    }

    #[test]
    fn test_primary_key_prefers_constraint_order() {
        let table = make_table(
            vec![make_column(1, "order_id", true), make_column(2, "line_no", true)],
            vec![ConstraintInfo {
                name: "order_items_pkey".to_string(),
                kind: ConstraintKind::PrimaryKey,
                columns: vec!["line_no".to_string(), "order_id".to_string()],
                referenced_schema: None,
                referenced_table: None,
                referenced_columns: vec![],
                on_delete: None,
                on_update: None,
                definition: None,
            }],
        );
        assert_eq!(table.primary_key_columns(), vec!["line_no", "order_id"]);
        assert!(table.has_primary_key());
    }

    #[test]
    fn test_primary_key_falls_back_to_column_flags() {
        let table = make_table(
            vec![make_column(1, "id", true), make_column(2, "qty", false)],
            vec![],
        );
        assert_eq!(table.primary_key_columns(), vec!["id"]);
        assert_eq!(table.full_name(), "public.order_items");
        assert!(table.column("qty").is_some());
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_table_kind_from_table_type() {
        assert_eq!(TableKind::from_table_type("BASE TABLE"), TableKind::Table);
        assert_eq!(TableKind::from_table_type("VIEW"), TableKind::View);
        assert_eq!(TableKind::from_table_type("SYSTEM VIEW"), TableKind::View);
    }
}
