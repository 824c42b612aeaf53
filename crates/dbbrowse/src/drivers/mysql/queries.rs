//! MySQL catalog queries against `INFORMATION_SCHEMA`.
//!
//! Text columns are cast to `CHAR` and integers to `SIGNED` so every row
//! decodes as `String` / `i64` regardless of server version and collation.
//! Multi-column keys are folded with `GROUP_CONCAT(... SEPARATOR ',')`.

/// Schemas, without the server's own.
pub const LIST_SCHEMAS: &str = r#"
    SELECT CAST(SCHEMA_NAME AS CHAR(255)) AS schema_name
    FROM INFORMATION_SCHEMA.SCHEMATA
    WHERE SCHEMA_NAME NOT IN ('information_schema', 'mysql', 'performance_schema', 'sys')
    ORDER BY SCHEMA_NAME
"#;

pub const LIST_TABLES: &str = r#"
    SELECT
        CAST(TABLE_NAME AS CHAR(255)) AS table_name,
        CAST(TABLE_TYPE AS CHAR(64)) AS table_type
    FROM INFORMATION_SCHEMA.TABLES
    WHERE TABLE_SCHEMA = ?
    ORDER BY TABLE_NAME
"#;

/// Columns joined to their single-column foreign keys; a column in several
/// such keys yields several rows. Composite keys are listed as constraints.
pub const LIST_COLUMNS: &str = r#"
    SELECT
        CAST(c.ORDINAL_POSITION AS SIGNED) AS ordinal_position,
        CAST(c.COLUMN_NAME AS CHAR(255)) AS column_name,
        CAST(c.DATA_TYPE AS CHAR(255)) AS data_type,
        CAST(c.IS_NULLABLE AS CHAR(3)) AS is_nullable,
        CAST(c.COLUMN_DEFAULT AS CHAR) AS column_default,
        CAST(EXISTS (
            SELECT 1
            FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE pk
            WHERE pk.TABLE_SCHEMA = c.TABLE_SCHEMA
              AND pk.TABLE_NAME = c.TABLE_NAME
              AND pk.COLUMN_NAME = c.COLUMN_NAME
              AND pk.CONSTRAINT_NAME = 'PRIMARY'
        ) AS SIGNED) AS is_primary_key,
        CAST(k.REFERENCED_TABLE_SCHEMA AS CHAR(255)) AS ref_schema,
        CAST(k.REFERENCED_TABLE_NAME AS CHAR(255)) AS ref_table,
        CAST(k.REFERENCED_COLUMN_NAME AS CHAR(255)) AS ref_column,
        CAST(r.DELETE_RULE AS CHAR(32)) AS on_delete,
        CAST(r.UPDATE_RULE AS CHAR(32)) AS on_update,
        CAST(c.COLUMN_TYPE AS CHAR) AS column_type
    FROM INFORMATION_SCHEMA.COLUMNS c
    LEFT JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE k
      ON k.TABLE_SCHEMA = c.TABLE_SCHEMA
     AND k.TABLE_NAME = c.TABLE_NAME
     AND k.COLUMN_NAME = c.COLUMN_NAME
     AND k.REFERENCED_TABLE_NAME IS NOT NULL
     AND NOT EXISTS (
        SELECT 1
        FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE k2
        WHERE k2.CONSTRAINT_SCHEMA = k.CONSTRAINT_SCHEMA
          AND k2.TABLE_NAME = k.TABLE_NAME
          AND k2.CONSTRAINT_NAME = k.CONSTRAINT_NAME
          AND k2.ORDINAL_POSITION > 1
     )
    LEFT JOIN INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS r
      ON r.CONSTRAINT_SCHEMA = k.CONSTRAINT_SCHEMA
     AND r.CONSTRAINT_NAME = k.CONSTRAINT_NAME
    WHERE c.TABLE_SCHEMA = ? AND c.TABLE_NAME = ?
    ORDER BY c.ORDINAL_POSITION, k.CONSTRAINT_NAME
"#;

pub const LIST_CONSTRAINTS: &str = r#"
    SELECT
        CAST(tc.CONSTRAINT_NAME AS CHAR(255)) AS constraint_name,
        CAST(tc.CONSTRAINT_TYPE AS CHAR(64)) AS constraint_type,
        CAST(GROUP_CONCAT(k.COLUMN_NAME ORDER BY k.ORDINAL_POSITION SEPARATOR ',') AS CHAR)
            AS columns,
        CAST(MAX(k.REFERENCED_TABLE_SCHEMA) AS CHAR(255)) AS ref_schema,
        CAST(MAX(k.REFERENCED_TABLE_NAME) AS CHAR(255)) AS ref_table,
        CAST(GROUP_CONCAT(k.REFERENCED_COLUMN_NAME ORDER BY k.ORDINAL_POSITION SEPARATOR ',')
            AS CHAR) AS ref_columns,
        CAST(MAX(r.DELETE_RULE) AS CHAR(32)) AS on_delete,
        CAST(MAX(r.UPDATE_RULE) AS CHAR(32)) AS on_update
    FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
    LEFT JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE k
      ON k.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA
     AND k.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
     AND k.TABLE_SCHEMA = tc.TABLE_SCHEMA
     AND k.TABLE_NAME = tc.TABLE_NAME
    LEFT JOIN INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS r
      ON r.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA
     AND r.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
     AND r.TABLE_NAME = tc.TABLE_NAME
    WHERE tc.TABLE_SCHEMA = ? AND tc.TABLE_NAME = ?
    GROUP BY tc.CONSTRAINT_NAME, tc.CONSTRAINT_TYPE
    ORDER BY tc.CONSTRAINT_TYPE, tc.CONSTRAINT_NAME
"#;

/// Indexes; functional key parts have a NULL column and drop out of the
/// aggregate.
pub const LIST_INDEXES: &str = r#"
    SELECT
        CAST(INDEX_NAME AS CHAR(255)) AS index_name,
        CAST(GROUP_CONCAT(COLUMN_NAME ORDER BY SEQ_IN_INDEX SEPARATOR ',') AS CHAR) AS columns,
        CAST(MIN(NON_UNIQUE) AS SIGNED) AS non_unique,
        CAST(MAX(INDEX_TYPE) AS CHAR(32)) AS index_type
    FROM INFORMATION_SCHEMA.STATISTICS
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
    GROUP BY INDEX_NAME
    ORDER BY INDEX_NAME
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_schemas_are_excluded() {
        for schema in ["'information_schema'", "'mysql'", "'performance_schema'", "'sys'"] {
            assert!(LIST_SCHEMAS.contains(schema), "{schema}");
        }
    }

    #[test]
    fn test_per_table_queries_bind_schema_and_table() {
        assert_eq!(LIST_TABLES.matches('?').count(), 1);
        for sql in [LIST_COLUMNS, LIST_CONSTRAINTS, LIST_INDEXES] {
            assert_eq!(sql.matches('?').count(), 2);
            assert!(!sql.contains('$'));
        }
    }

    #[test]
    fn test_column_foreign_keys_are_single_column() {
        assert!(LIST_COLUMNS.contains("k2.ORDINAL_POSITION > 1"));
        assert!(LIST_COLUMNS.contains("ORDER BY c.ORDINAL_POSITION"));
    }

    #[test]
    fn test_key_columns_keep_their_order() {
        assert!(LIST_CONSTRAINTS.contains("ORDER BY k.ORDINAL_POSITION SEPARATOR ','"));
        assert!(LIST_INDEXES.contains("ORDER BY SEQ_IN_INDEX SEPARATOR ','"));
    }
}
