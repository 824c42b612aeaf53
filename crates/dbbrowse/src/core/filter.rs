//! Typed filter conditions and sort rules for table browsing.
//!
//! A filter is one of three shapes, selected by its operator family:
//!
//! - comparison: `column <op> value` with one bound parameter
//! - `IN`: `column IN (...)` with one bound parameter per list element
//! - `IS`: `column IS <keyword>` where the keyword is one of the
//!   [`IsSentinel`] values and is never bound
//!
//! On the wire a filter is the flat object `{"column", "operator", "value"}`.
//! Decoding checks the operator/value combination, so a
//! [`TableFilterCondition`] that exists is always renderable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::value::SqlValue;
use crate::error::{BrowseError, Result};

/// Comparison operators that bind exactly one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOperator {
    Eq,
    NotEq,
    Gt,
    Lt,
    Gte,
    Lte,
    Like,
    /// Case-insensitive LIKE.
    ILike,
}

impl CompareOperator {
    /// SQL spelling of the operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOperator::Eq => "=",
            CompareOperator::NotEq => "<>",
            CompareOperator::Gt => ">",
            CompareOperator::Lt => "<",
            CompareOperator::Gte => ">=",
            CompareOperator::Lte => "<=",
            CompareOperator::Like => "LIKE",
            CompareOperator::ILike => "ILIKE",
        }
    }

    /// Parse an operator token. Keyword operators are case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "=" => Some(CompareOperator::Eq),
            "<>" | "!=" => Some(CompareOperator::NotEq),
            ">" => Some(CompareOperator::Gt),
            "<" => Some(CompareOperator::Lt),
            ">=" => Some(CompareOperator::Gte),
            "<=" => Some(CompareOperator::Lte),
            "LIKE" => Some(CompareOperator::Like),
            "ILIKE" => Some(CompareOperator::ILike),
            _ => None,
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Keyword operands of the `IS` operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsSentinel {
    Null,
    NotNull,
    True,
    False,
}

impl IsSentinel {
    /// SQL keyword rendered after `IS`.
    pub fn as_sql(&self) -> &'static str {
        match self {
            IsSentinel::Null => "NULL",
            IsSentinel::NotNull => "NOT NULL",
            IsSentinel::True => "TRUE",
            IsSentinel::False => "FALSE",
        }
    }
}

impl FromStr for IsSentinel {
    type Err = BrowseError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "NULL" => Ok(IsSentinel::Null),
            "NOT NULL" => Ok(IsSentinel::NotNull),
            "TRUE" => Ok(IsSentinel::True),
            "FALSE" => Ok(IsSentinel::False),
            _ => Err(BrowseError::UnsupportedFilterValue(format!(
                "IS expects NULL, NOT NULL, TRUE or FALSE, got {:?}",
                s
            ))),
        }
    }
}

/// Map a raw `IS` operand onto its SQL keyword.
///
/// # Errors
///
/// Returns `BrowseError::UnsupportedFilterValue` for anything other than the
/// four sentinel values.
pub fn normalize_is_value(raw: &str) -> Result<&'static str> {
    Ok(raw.parse::<IsSentinel>()?.as_sql())
}

/// A single filter condition on a table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFilterCondition", into = "RawFilterCondition")]
pub enum TableFilterCondition {
    /// `column <operator> value`
    Compare {
        column: String,
        operator: CompareOperator,
        value: SqlValue,
    },
    /// `column IN (values...)`
    In { column: String, values: Vec<SqlValue> },
    /// `column IS <sentinel>`
    Is { column: String, value: IsSentinel },
}

impl TableFilterCondition {
    pub fn compare(
        column: impl Into<String>,
        operator: CompareOperator,
        value: impl Into<SqlValue>,
    ) -> Self {
        TableFilterCondition::Compare {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn is_in(column: impl Into<String>, values: Vec<SqlValue>) -> Self {
        TableFilterCondition::In {
            column: column.into(),
            values,
        }
    }

    pub fn is(column: impl Into<String>, value: IsSentinel) -> Self {
        TableFilterCondition::Is {
            column: column.into(),
            value,
        }
    }

    /// The unquoted column this condition applies to.
    pub fn column(&self) -> &str {
        match self {
            TableFilterCondition::Compare { column, .. }
            | TableFilterCondition::In { column, .. }
            | TableFilterCondition::Is { column, .. } => column,
        }
    }
}

/// Flat wire form of a filter condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawFilterCondition {
    column: String,
    operator: String,
    #[serde(default)]
    value: serde_json::Value,
}

impl TryFrom<RawFilterCondition> for TableFilterCondition {
    type Error = BrowseError;

    fn try_from(raw: RawFilterCondition) -> Result<Self> {
        let operator = raw.operator.trim().to_ascii_uppercase();
        match operator.as_str() {
            "IN" => match raw.value {
                serde_json::Value::Array(items) => {
                    let values: Vec<SqlValue> =
                        items.into_iter().map(SqlValue::from_json).collect();
                    if let Some(bad) = values.iter().find(|v| !v.is_scalar()) {
                        return Err(BrowseError::UnsupportedFilterValue(format!(
                            "IN on column {:?} expects scalar elements, got {:?}",
                            raw.column, bad
                        )));
                    }
                    Ok(TableFilterCondition::In {
                        column: raw.column,
                        values,
                    })
                }
                other => Err(BrowseError::UnsupportedFilterValue(format!(
                    "IN on column {:?} expects a list, got {}",
                    raw.column, other
                ))),
            },
            "IS" => match raw.value {
                serde_json::Value::String(s) => Ok(TableFilterCondition::Is {
                    column: raw.column,
                    value: s.parse()?,
                }),
                // a bare JSON null means IS NULL
                serde_json::Value::Null => Ok(TableFilterCondition::Is {
                    column: raw.column,
                    value: IsSentinel::Null,
                }),
                other => Err(BrowseError::UnsupportedFilterValue(format!(
                    "IS on column {:?} expects a sentinel keyword, got {}",
                    raw.column, other
                ))),
            },
            _ => {
                let op = CompareOperator::parse(&operator).ok_or_else(|| {
                    BrowseError::UnsupportedFilterValue(format!(
                        "unknown filter operator {:?} on column {:?}",
                        raw.operator, raw.column
                    ))
                })?;
                let value = SqlValue::from_json(raw.value);
                if !value.is_scalar() {
                    return Err(BrowseError::UnsupportedFilterValue(format!(
                        "operator {} on column {:?} expects a scalar value",
                        op, raw.column
                    )));
                }
                Ok(TableFilterCondition::Compare {
                    column: raw.column,
                    operator: op,
                    value,
                })
            }
        }
    }
}

impl From<TableFilterCondition> for RawFilterCondition {
    fn from(condition: TableFilterCondition) -> Self {
        match condition {
            TableFilterCondition::Compare {
                column,
                operator,
                value,
            } => RawFilterCondition {
                column,
                operator: operator.as_sql().to_string(),
                value: value.into(),
            },
            TableFilterCondition::In { column, values } => RawFilterCondition {
                column,
                operator: "IN".to_string(),
                value: serde_json::Value::Array(values.into_iter().map(Into::into).collect()),
            },
            TableFilterCondition::Is { column, value } => RawFilterCondition {
                column,
                operator: "IS".to_string(),
                value: serde_json::Value::String(value.as_sql().to_string()),
            },
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = BrowseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(BrowseError::InvalidRequest(format!(
                "sort direction must be ASC or DESC, got {:?}",
                s
            ))),
        }
    }
}

/// One entry of an ORDER BY list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSortRule {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl TableSortRule {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

impl FromStr for TableSortRule {
    type Err = BrowseError;

    /// Parse `column` or `column:asc|desc`.
    fn from_str(s: &str) -> Result<Self> {
        match s.rsplit_once(':') {
            Some((column, direction)) => Ok(TableSortRule::new(column, direction.parse()?)),
            None => Ok(TableSortRule::new(s, SortDirection::Asc)),
        }
    }
}
