//! Filter and sort compilation.
//!
//! Compilation is a fold over the filter list: each condition renders to a
//! SQL fragment plus the parameters it binds, and the accumulator carries the
//! parameter list and the next placeholder index forward. Callers continue
//! allocating placeholders (LIMIT/OFFSET, SET values) from the returned
//! `next_index`.

use tracing::debug;

use crate::core::filter::{CompareOperator, TableFilterCondition, TableSortRule};
use crate::core::traits::Dialect;
use crate::core::value::SqlValue;
use crate::error::{BrowseError, Result};

/// Result of compiling a filter list.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledClause {
    /// Conjunction of the rendered conditions, without the `WHERE` keyword.
    /// `None` when no condition rendered.
    pub clause: Option<String>,
    /// All bound parameters so far, in placeholder order.
    pub params: Vec<SqlValue>,
    /// Next free 1-based placeholder index.
    pub next_index: usize,
}

/// A rendered predicate and the parameters it binds.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RenderedCondition {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Compile filter conditions into a parameterized `AND` conjunction.
///
/// `params` holds the parameters already bound by the caller and
/// `next_index` the placeholder index to allocate next; both are returned
/// extended. Conditions render in input order:
///
/// - comparison: one placeholder, one parameter
/// - `IN`: one placeholder per element; an empty list is skipped entirely,
///   so the filter matches every row rather than none
/// - `IS`: keyword only, no parameter
pub fn build_where_clause<D: Dialect + ?Sized>(
    dialect: &D,
    filters: &[TableFilterCondition],
    params: Vec<SqlValue>,
    next_index: usize,
) -> Result<CompiledClause> {
    let start = CompiledClause {
        clause: None,
        params,
        next_index,
    };

    let (conditions, compiled) = filters.iter().try_fold(
        (Vec::with_capacity(filters.len()), start),
        |(mut conditions, mut acc), filter| -> Result<_> {
            if let Some(rendered) = render_condition(dialect, filter, acc.next_index)? {
                acc.next_index += rendered.params.len();
                acc.params.extend(rendered.params);
                conditions.push(rendered.sql);
            }
            Ok((conditions, acc))
        },
    )?;

    let clause = if conditions.is_empty() {
        None
    } else {
        Some(conditions.join(" AND "))
    };

    Ok(CompiledClause { clause, ..compiled })
}

/// Render one condition starting at placeholder `start_idx`.
///
/// Returns `None` for conditions that are dropped (empty `IN`).
fn render_condition<D: Dialect + ?Sized>(
    dialect: &D,
    filter: &TableFilterCondition,
    start_idx: usize,
) -> Result<Option<RenderedCondition>> {
    let column = dialect.quote_ident(filter.column())?;

    let rendered = match filter {
        TableFilterCondition::Compare {
            operator, value, ..
        } => {
            ensure_scalar(filter.column(), value)?;
            let placeholder = dialect.param_placeholder(start_idx);
            let sql = match operator {
                CompareOperator::ILike => dialect.case_insensitive_like(&column, &placeholder),
                op => format!("{} {} {}", column, op.as_sql(), placeholder),
            };
            RenderedCondition {
                sql,
                params: vec![value.clone()],
            }
        }
        TableFilterCondition::In { values, .. } => {
            if values.is_empty() {
                debug!("Dropping empty IN filter on column {}", filter.column());
                return Ok(None);
            }
            for value in values {
                ensure_scalar(filter.column(), value)?;
            }
            let placeholders = (start_idx..start_idx + values.len())
                .map(|idx| dialect.param_placeholder(idx))
                .collect::<Vec<_>>()
                .join(", ");
            RenderedCondition {
                sql: format!("{} IN ({})", column, placeholders),
                params: values.clone(),
            }
        }
        TableFilterCondition::Is { value, .. } => RenderedCondition {
            sql: format!("{} IS {}", column, value.as_sql()),
            params: Vec::new(),
        },
    };

    Ok(Some(rendered))
}

fn ensure_scalar(column: &str, value: &SqlValue) -> Result<()> {
    if value.is_scalar() {
        Ok(())
    } else {
        Err(BrowseError::UnsupportedFilterValue(format!(
            "filter on column {:?} compares against a structured value {}",
            column, value
        )))
    }
}

/// Compile sort rules into an ORDER BY list (without the keyword).
///
/// Rules with an empty column are dropped. Returns `None` when no rule
/// remains; row order is then whatever the database returns.
pub fn build_order_by_clause<D: Dialect + ?Sized>(
    dialect: &D,
    rules: &[TableSortRule],
) -> Result<Option<String>> {
    let parts = rules
        .iter()
        .filter(|rule| !rule.column.is_empty())
        .map(|rule| {
            Ok(format!(
                "{} {}",
                dialect.quote_ident(&rule.column)?,
                rule.direction.as_sql()
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    if parts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(parts.join(", ")))
    }
}
