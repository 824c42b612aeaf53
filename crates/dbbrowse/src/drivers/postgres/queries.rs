//! PostgreSQL catalog queries.
//!
//! All queries take the schema as `$1` and, where relevant, the table as `$2`.
//! Integer columns are cast to `int4` and arrays to `text[]` so rows decode
//! into plain Rust types.

/// User schemas.
pub const LIST_SCHEMAS: &str = r#"
    SELECT nspname::text
    FROM pg_catalog.pg_namespace
    WHERE nspname NOT IN ('pg_catalog', 'information_schema')
      AND nspname NOT LIKE 'pg\_temp\_%'
      AND nspname NOT LIKE 'pg\_toast%'
    ORDER BY nspname
"#;

/// Tables and views of one schema.
pub const LIST_TABLES: &str = r#"
    SELECT table_name::text, table_type::text
    FROM information_schema.tables
    WHERE table_schema = $1
    ORDER BY table_name
"#;

/// Columns with primary key membership, single-column foreign key target and
/// enum labels (`text[]` in sort order).
pub const LIST_COLUMNS: &str = r#"
    SELECT
        c.ordinal_position::int4,
        c.column_name::text,
        c.data_type::text,
        c.is_nullable::text,
        c.column_default::text,
        EXISTS (
            SELECT 1
            FROM pg_catalog.pg_constraint pk
            JOIN pg_catalog.pg_class t ON t.oid = pk.conrelid
            JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
            JOIN pg_catalog.pg_attribute a
              ON a.attrelid = t.oid AND a.attnum = ANY (pk.conkey)
            WHERE pk.contype = 'p'
              AND n.nspname = c.table_schema
              AND t.relname = c.table_name
              AND a.attname = c.column_name
        ) AS is_primary_key,
        fk.ref_schema,
        fk.ref_table,
        fk.ref_column,
        fk.on_delete,
        fk.on_update,
        (
            SELECT array_agg(e.enumlabel::text ORDER BY e.enumsortorder)
            FROM pg_catalog.pg_type ty
            JOIN pg_catalog.pg_namespace tn ON tn.oid = ty.typnamespace
            JOIN pg_catalog.pg_enum e ON e.enumtypid = ty.oid
            WHERE c.data_type = 'USER-DEFINED'
              AND tn.nspname = c.udt_schema
              AND ty.typname = c.udt_name
        ) AS enum_labels
    FROM information_schema.columns c
    LEFT JOIN LATERAL (
        SELECT
            rn.nspname::text AS ref_schema,
            rt.relname::text AS ref_table,
            ra.attname::text AS ref_column,
            CASE con.confdeltype
                WHEN 'a' THEN 'NO ACTION'
                WHEN 'r' THEN 'RESTRICT'
                WHEN 'c' THEN 'CASCADE'
                WHEN 'n' THEN 'SET NULL'
                WHEN 'd' THEN 'SET DEFAULT'
            END AS on_delete,
            CASE con.confupdtype
                WHEN 'a' THEN 'NO ACTION'
                WHEN 'r' THEN 'RESTRICT'
                WHEN 'c' THEN 'CASCADE'
                WHEN 'n' THEN 'SET NULL'
                WHEN 'd' THEN 'SET DEFAULT'
            END AS on_update
        FROM pg_catalog.pg_constraint con
        JOIN pg_catalog.pg_class t ON t.oid = con.conrelid
        JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
        JOIN pg_catalog.pg_attribute a
          ON a.attrelid = t.oid AND a.attnum = con.conkey[1]
        JOIN pg_catalog.pg_class rt ON rt.oid = con.confrelid
        JOIN pg_catalog.pg_namespace rn ON rn.oid = rt.relnamespace
        JOIN pg_catalog.pg_attribute ra
          ON ra.attrelid = rt.oid AND ra.attnum = con.confkey[1]
        WHERE con.contype = 'f'
          AND array_length(con.conkey, 1) = 1
          AND n.nspname = c.table_schema
          AND t.relname = c.table_name
          AND a.attname = c.column_name
        ORDER BY con.conname
        LIMIT 1
    ) fk ON true
    WHERE c.table_schema = $1 AND c.table_name = $2
    ORDER BY c.ordinal_position
"#;

/// Constraints with columns in key order and foreign key references.
pub const LIST_CONSTRAINTS: &str = r#"
    SELECT
        con.conname::text,
        CASE con.contype
            WHEN 'p' THEN 'PRIMARY KEY'
            WHEN 'f' THEN 'FOREIGN KEY'
            WHEN 'u' THEN 'UNIQUE'
            WHEN 'c' THEN 'CHECK'
            WHEN 'x' THEN 'EXCLUDE'
            ELSE 'OTHER'
        END AS constraint_type,
        ARRAY(
            SELECT a.attname::text
            FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord)
            JOIN pg_catalog.pg_attribute a
              ON a.attrelid = con.conrelid AND a.attnum = k.attnum
            ORDER BY k.ord
        ) AS columns,
        rn.nspname::text AS ref_schema,
        rt.relname::text AS ref_table,
        ARRAY(
            SELECT a.attname::text
            FROM unnest(con.confkey) WITH ORDINALITY AS k(attnum, ord)
            JOIN pg_catalog.pg_attribute a
              ON a.attrelid = con.confrelid AND a.attnum = k.attnum
            ORDER BY k.ord
        ) AS ref_columns,
        CASE WHEN con.contype = 'f' THEN con.confdeltype::text END AS on_delete,
        CASE WHEN con.contype = 'f' THEN con.confupdtype::text END AS on_update,
        pg_catalog.pg_get_constraintdef(con.oid, true) AS definition
    FROM pg_catalog.pg_constraint con
    JOIN pg_catalog.pg_class t ON t.oid = con.conrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
    LEFT JOIN pg_catalog.pg_class rt ON rt.oid = con.confrelid
    LEFT JOIN pg_catalog.pg_namespace rn ON rn.oid = rt.relnamespace
    WHERE n.nspname = $1 AND t.relname = $2
    ORDER BY con.contype, con.conname
"#;

/// Indexes with columns in index order.
///
/// Expression index keys (attnum 0) have no attribute and are skipped.
pub const LIST_INDEXES: &str = r#"
    SELECT
        ic.relname::text AS index_name,
        ARRAY(
            SELECT a.attname::text
            FROM unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord)
            JOIN pg_catalog.pg_attribute a
              ON a.attrelid = ix.indrelid AND a.attnum = k.attnum
            ORDER BY k.ord
        ) AS columns,
        ix.indisunique,
        ix.indisprimary,
        am.amname::text AS method
    FROM pg_catalog.pg_index ix
    JOIN pg_catalog.pg_class ic ON ic.oid = ix.indexrelid
    JOIN pg_catalog.pg_class t ON t.oid = ix.indrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
    JOIN pg_catalog.pg_am am ON am.oid = ic.relam
    WHERE n.nspname = $1 AND t.relname = $2
    ORDER BY ic.relname
"#;
