//! Statement assembly for table browsing and cell editing.
//!
//! Every builder is pure: the same request and dialect always produce the
//! same `{query, params}` pair, and no I/O happens here. Executing the
//! statement is the caller's business.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::core::request::{
    DeleteRowsRequest, InsertRowRequest, TableCountOptions, TableDataOptions, UpdateCellRequest,
};
use crate::core::traits::Dialect;
use crate::core::value::SqlValue;
use crate::error::{BrowseError, Result};

use super::where_clause::{
    build_order_by_clause, build_where_clause, CompiledClause, RenderedCondition,
};

/// A complete statement and its bound parameters in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltQuery {
    pub query: String,
    pub params: Vec<SqlValue>,
}

/// Build the paged `SELECT` for a table.
///
/// Parameters are the filter values in order, then limit, then offset.
pub fn build_table_data_query<D: Dialect + ?Sized>(
    dialect: &D,
    opts: &TableDataOptions,
) -> Result<BuiltQuery> {
    let table = dialect.qualify(&opts.schema, &opts.table)?;
    let mut query = format!("SELECT * FROM {}", table);

    let CompiledClause {
        clause,
        mut params,
        next_index,
    } = build_where_clause(dialect, &opts.filters, Vec::new(), 1)?;

    if let Some(clause) = clause {
        query.push_str(" WHERE ");
        query.push_str(&clause);
    }

    if let Some(order_by) = build_order_by_clause(dialect, &opts.sort_rules)? {
        query.push_str(" ORDER BY ");
        query.push_str(&order_by);
    }

    let offset = i64::try_from(opts.offset()).map_err(|_| {
        BrowseError::InvalidRequest(format!("offset {} is out of range", opts.offset()))
    })?;

    query.push_str(&format!(
        " LIMIT {} OFFSET {}",
        dialect.param_placeholder(next_index),
        dialect.param_placeholder(next_index + 1)
    ));
    params.push(SqlValue::from(opts.limit()));
    params.push(SqlValue::Int(offset));

    debug!("Table data query: {}", query);
    Ok(BuiltQuery { query, params })
}

/// Build the `COUNT(*)` matching a data query's filters.
///
/// Placeholders start at 1 because the count runs as its own statement.
pub fn build_table_count_query<D: Dialect + ?Sized>(
    dialect: &D,
    opts: &TableCountOptions,
) -> Result<BuiltQuery> {
    let table = dialect.qualify(&opts.schema, &opts.table)?;
    let mut query = format!("SELECT COUNT(*) as total FROM {}", table);

    let compiled = build_where_clause(dialect, &opts.filters, Vec::new(), 1)?;
    if let Some(clause) = &compiled.clause {
        query.push_str(" WHERE ");
        query.push_str(clause);
    }

    debug!("Table count query: {}", query);
    Ok(BuiltQuery {
        query,
        params: compiled.params,
    })
}

/// Build the `UPDATE` of one cell.
///
/// Parameters are the new value, then the primary key values in
/// `primary_key_columns` order.
///
/// # Errors
///
/// `MissingPrimaryKeyValue` when the key column list is empty or a listed
/// column has no value; the statement is never built without a full key.
pub fn build_update_cell_query<D: Dialect + ?Sized>(
    dialect: &D,
    req: &UpdateCellRequest,
) -> Result<BuiltQuery> {
    let table = dialect.qualify(&req.schema, &req.table)?;
    let column = dialect.quote_ident(&req.column_to_update)?;

    let key = primary_key_predicate(
        dialect,
        &req.primary_key_columns,
        &req.primary_key_values,
        2,
    )?;

    let query = format!(
        "UPDATE {} SET {} = {} WHERE {}",
        table,
        column,
        dialect.param_placeholder(1),
        key.sql
    );

    let mut params = Vec::with_capacity(1 + key.params.len());
    params.push(req.new_value.clone());
    params.extend(key.params);

    debug!("Update cell query: {}", query);
    Ok(BuiltQuery { query, params })
}

/// Build the `INSERT` of one row.
///
/// PostgreSQL returns the stored row (`RETURNING *`) so defaults and
/// generated keys are visible to the caller.
pub fn build_insert_row_query<D: Dialect + ?Sized>(
    dialect: &D,
    req: &InsertRowRequest,
) -> Result<BuiltQuery> {
    if req.values.is_empty() {
        return Err(BrowseError::InvalidRequest(format!(
            "insert into {}.{} has no column values",
            req.schema, req.table
        )));
    }

    let mut seen = HashSet::with_capacity(req.values.len());
    for cv in &req.values {
        if !seen.insert(cv.column.as_str()) {
            return Err(BrowseError::InvalidRequest(format!(
                "column {:?} is assigned more than once",
                cv.column
            )));
        }
    }

    let table = dialect.qualify(&req.schema, &req.table)?;
    let columns = req
        .values
        .iter()
        .map(|cv| dialect.quote_ident(&cv.column))
        .collect::<Result<Vec<_>>>()?;
    let placeholders: Vec<String> = (1..=req.values.len())
        .map(|idx| dialect.param_placeholder(idx))
        .collect();

    let mut query = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );
    if dialect.supports_returning() {
        query.push_str(" RETURNING *");
    }

    let params = req.values.iter().map(|cv| cv.value.clone()).collect();

    debug!("Insert row query: {}", query);
    Ok(BuiltQuery { query, params })
}

/// Build a `DELETE` of the rows identified by their primary keys.
///
/// Each row becomes one parenthesized key group; groups are joined with
/// `OR`. Parameters are row-major in `primary_key_columns` order.
pub fn build_delete_rows_query<D: Dialect + ?Sized>(
    dialect: &D,
    req: &DeleteRowsRequest,
) -> Result<BuiltQuery> {
    if req.rows.is_empty() {
        return Err(BrowseError::InvalidRequest(format!(
            "delete from {}.{} names no rows",
            req.schema, req.table
        )));
    }

    let table = dialect.qualify(&req.schema, &req.table)?;

    let (groups, params, _) = req.rows.iter().try_fold(
        (Vec::with_capacity(req.rows.len()), Vec::new(), 1usize),
        |(mut groups, mut params, next_index), row| -> Result<_> {
            let key = primary_key_predicate(dialect, &req.primary_key_columns, row, next_index)?;
            let next_index = next_index + key.params.len();
            groups.push(format!("({})", key.sql));
            params.extend(key.params);
            Ok((groups, params, next_index))
        },
    )?;

    let query = format!("DELETE FROM {} WHERE {}", table, groups.join(" OR "));

    debug!("Delete rows query: {} ({} rows)", query, req.rows.len());
    Ok(BuiltQuery { query, params })
}

/// Render `pk1 = p AND pk2 = p ...` starting at placeholder `start_idx`.
fn primary_key_predicate<D: Dialect + ?Sized>(
    dialect: &D,
    columns: &[String],
    values: &HashMap<String, SqlValue>,
    start_idx: usize,
) -> Result<RenderedCondition> {
    if columns.is_empty() {
        return Err(BrowseError::MissingPrimaryKeyValue(
            "no primary key columns given".to_string(),
        ));
    }

    let mut parts = Vec::with_capacity(columns.len());
    let mut params = Vec::with_capacity(columns.len());

    for (offset, column) in columns.iter().enumerate() {
        let value = values.get(column).ok_or_else(|| {
            BrowseError::MissingPrimaryKeyValue(format!(
                "no value for primary key column {:?}",
                column
            ))
        })?;
        parts.push(format!(
            "{} = {}",
            dialect.quote_ident(column)?,
            dialect.param_placeholder(start_idx + offset)
        ));
        params.push(value.clone());
    }

    Ok(RenderedCondition {
        sql: parts.join(" AND "),
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{CompareOperator, IsSentinel, SortDirection};
    use crate::core::filter::{TableFilterCondition, TableSortRule};
    use crate::core::request::ColumnValue;
    use crate::drivers::{MysqlDialect, PostgresDialect};

    fn users_page() -> TableDataOptions {
        TableDataOptions::new("public", "users")
            .with_filter(TableFilterCondition::compare(
                "age",
                CompareOperator::Gt,
                18i64,
            ))
            .with_sort(TableSortRule::new("name", SortDirection::Asc))
            .with_limit(10)
            .with_offset(20)
    }

    fn pk(pairs: &[(&str, SqlValue)]) -> HashMap<String, SqlValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // =========================================================================
    // SELECT / COUNT
    // =========================================================================

    #[test]
    fn test_data_query_parameter_order() {
        let built = build_table_data_query(&PostgresDialect::new(), &users_page()).unwrap();
        assert_eq!(
            built.query,
            "SELECT * FROM \"public\".\"users\" WHERE \"age\" > $1 ORDER BY \"name\" ASC \
             LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            built.params,
            vec![SqlValue::Int(18), SqlValue::Int(10), SqlValue::Int(20)]
        );
    }

    #[test]
    fn test_data_query_defaults() {
        let opts = TableDataOptions::new("public", "users");
        let built = build_table_data_query(&PostgresDialect::new(), &opts).unwrap();
        assert_eq!(
            built.query,
            "SELECT * FROM \"public\".\"users\" LIMIT $1 OFFSET $2"
        );
        assert_eq!(built.params, vec![SqlValue::Int(50), SqlValue::Int(0)]);
    }

    #[test]
    fn test_data_query_is_filter_shifts_nothing() {
        let opts = TableDataOptions::new("public", "users")
            .with_filter(TableFilterCondition::is("deleted_at", IsSentinel::Null))
            .with_filter(TableFilterCondition::compare(
                "id",
                CompareOperator::Lt,
                100i64,
            ));
        let built = build_table_data_query(&PostgresDialect::new(), &opts).unwrap();
        assert!(built
            .query
            .contains("WHERE \"deleted_at\" IS NULL AND \"id\" < $1 LIMIT $2 OFFSET $3"));
        assert_eq!(built.params.len(), 3);
    }

    #[test]
    fn test_data_query_mysql() {
        let built = build_table_data_query(&MysqlDialect::new(), &users_page()).unwrap();
        assert_eq!(
            built.query,
            "SELECT * FROM `public`.`users` WHERE `age` > ? ORDER BY `name` ASC LIMIT ? OFFSET ?"
        );
        assert_eq!(built.params.len(), 3);
    }

    #[test]
    fn test_data_query_offset_out_of_range() {
        let opts = TableDataOptions::new("public", "users").with_offset(u64::MAX);
        let err = build_table_data_query(&PostgresDialect::new(), &opts).unwrap_err();
        assert!(matches!(err, BrowseError::InvalidRequest(_)));
    }

    #[test]
    fn test_count_query_ignores_paging() {
        let count = TableCountOptions::from(&users_page());
        let built = build_table_count_query(&PostgresDialect::new(), &count).unwrap();
        assert_eq!(
            built.query,
            "SELECT COUNT(*) as total FROM \"public\".\"users\" WHERE \"age\" > $1"
        );
        assert_eq!(built.params, vec![SqlValue::Int(18)]);
    }

    #[test]
    fn test_builders_are_deterministic() {
        let dialect = PostgresDialect::new();
        let opts = users_page();
        assert_eq!(
            build_table_data_query(&dialect, &opts).unwrap(),
            build_table_data_query(&dialect, &opts).unwrap()
        );
    }

    // =========================================================================
    // UPDATE
    // =========================================================================

    #[test]
    fn test_update_params_value_then_keys() {
        let req = UpdateCellRequest {
            schema: "s".to_string(),
            table: "t".to_string(),
            column_to_update: "email".to_string(),
            new_value: SqlValue::from("x@y.com"),
            primary_key_columns: vec!["id".to_string()],
            primary_key_values: pk(&[("id", SqlValue::Int(5))]),
        };
        let built = build_update_cell_query(&PostgresDialect::new(), &req).unwrap();
        assert_eq!(
            built.query,
            "UPDATE \"s\".\"t\" SET \"email\" = $1 WHERE \"id\" = $2"
        );
        assert_eq!(built.params, vec![SqlValue::from("x@y.com"), SqlValue::Int(5)]);
    }

    #[test]
    fn test_update_composite_key_follows_column_order() {
        let req = UpdateCellRequest {
            schema: "s".to_string(),
            table: "t".to_string(),
            column_to_update: "qty".to_string(),
            new_value: SqlValue::Int(3),
            primary_key_columns: vec!["order_id".to_string(), "line".to_string()],
            primary_key_values: pk(&[("line", SqlValue::Int(2)), ("order_id", SqlValue::Int(9))]),
        };
        let built = build_update_cell_query(&PostgresDialect::new(), &req).unwrap();
        assert_eq!(
            built.query,
            "UPDATE \"s\".\"t\" SET \"qty\" = $1 WHERE \"order_id\" = $2 AND \"line\" = $3"
        );
        assert_eq!(
            built.params,
            vec![SqlValue::Int(3), SqlValue::Int(9), SqlValue::Int(2)]
        );
    }

    #[test]
    fn test_update_missing_key_value() {
        let req = UpdateCellRequest {
            schema: "s".to_string(),
            table: "t".to_string(),
            column_to_update: "email".to_string(),
            new_value: SqlValue::Null,
            primary_key_columns: vec!["id".to_string()],
            primary_key_values: HashMap::new(),
        };
        let err = build_update_cell_query(&PostgresDialect::new(), &req).unwrap_err();
        assert!(matches!(err, BrowseError::MissingPrimaryKeyValue(_)));
    }

    #[test]
    fn test_update_empty_key_list() {
        let req = UpdateCellRequest {
            schema: "s".to_string(),
            table: "t".to_string(),
            column_to_update: "email".to_string(),
            new_value: SqlValue::Null,
            primary_key_columns: vec![],
            primary_key_values: pk(&[("id", SqlValue::Int(1))]),
        };
        let err = build_update_cell_query(&PostgresDialect::new(), &req).unwrap_err();
        assert!(matches!(err, BrowseError::MissingPrimaryKeyValue(_)));
    }

    // =========================================================================
    // INSERT / DELETE
    // =========================================================================

    #[test]
    fn test_insert_returning_on_postgres() {
        let req = InsertRowRequest {
            schema: "public".to_string(),
            table: "users".to_string(),
            values: vec![
                ColumnValue::new("name", "ada"),
                ColumnValue::new("age", 36i64),
            ],
        };
        let built = build_insert_row_query(&PostgresDialect::new(), &req).unwrap();
        assert_eq!(
            built.query,
            "INSERT INTO \"public\".\"users\" (\"name\", \"age\") VALUES ($1, $2) RETURNING *"
        );
        assert_eq!(built.params, vec![SqlValue::from("ada"), SqlValue::Int(36)]);

        let built = build_insert_row_query(&MysqlDialect::new(), &req).unwrap();
        assert_eq!(
            built.query,
            "INSERT INTO `public`.`users` (`name`, `age`) VALUES (?, ?)"
        );
    }

    #[test]
    fn test_insert_rejects_empty_and_duplicate_columns() {
        let mut req = InsertRowRequest {
            schema: "public".to_string(),
            table: "users".to_string(),
            values: vec![],
        };
        assert!(matches!(
            build_insert_row_query(&PostgresDialect::new(), &req),
            Err(BrowseError::InvalidRequest(_))
        ));

        req.values = vec![ColumnValue::new("a", 1i64), ColumnValue::new("a", 2i64)];
        assert!(matches!(
            build_insert_row_query(&PostgresDialect::new(), &req),
            Err(BrowseError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_delete_rows_groups() {
        let req = DeleteRowsRequest {
            schema: "s".to_string(),
            table: "t".to_string(),
            primary_key_columns: vec!["a".to_string(), "b".to_string()],
            rows: vec![
                pk(&[("a", SqlValue::Int(1)), ("b", SqlValue::Int(2))]),
                pk(&[("b", SqlValue::Int(4)), ("a", SqlValue::Int(3))]),
            ],
        };
        let built = build_delete_rows_query(&PostgresDialect::new(), &req).unwrap();
        assert_eq!(
            built.query,
            "DELETE FROM \"s\".\"t\" WHERE (\"a\" = $1 AND \"b\" = $2) OR (\"a\" = $3 AND \"b\" = $4)"
        );
        assert_eq!(
            built.params,
            vec![
                SqlValue::Int(1),
                SqlValue::Int(2),
                SqlValue::Int(3),
                SqlValue::Int(4)
            ]
        );
    }

    #[test]
    fn test_delete_rows_errors() {
        let mut req = DeleteRowsRequest {
            schema: "s".to_string(),
            table: "t".to_string(),
            primary_key_columns: vec!["id".to_string()],
            rows: vec![],
        };
        assert!(matches!(
            build_delete_rows_query(&PostgresDialect::new(), &req),
            Err(BrowseError::InvalidRequest(_))
        ));

        req.rows = vec![pk(&[("other", SqlValue::Int(1))])];
        assert!(matches!(
            build_delete_rows_query(&PostgresDialect::new(), &req),
            Err(BrowseError::MissingPrimaryKeyValue(_))
        ));
    }
}
