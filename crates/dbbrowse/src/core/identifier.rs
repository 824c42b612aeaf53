//! Identifier validation and quoting.
//!
//! SQL identifiers (schema, table and column names) cannot be bound as
//! parameters, so every name that ends up in generated SQL text passes through
//! one of the quoting functions here. Callers never supply their own quote
//! characters: a name is always treated as a single bare identifier, and any
//! quote character inside it is escaped by doubling.

use crate::error::{BrowseError, Result};

/// Upper bound on identifier length in bytes. Servers truncate or reject
/// well below this (PostgreSQL 63, MySQL 64); the bound only stops
/// runaway input from reaching SQL text.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Check that a name can be quoted as one identifier.
///
/// # Errors
///
/// `BrowseError::InvalidIdentifier` when the name is empty, holds a NUL
/// byte, or is longer than the length bound.
pub fn validate_identifier(name: &str) -> Result<()> {
    let problem = if name.is_empty() {
        "Identifier cannot be empty".to_string()
    } else if name.contains('\0') {
        format!("Identifier contains null byte: {:?}", name)
    } else if name.len() > MAX_IDENTIFIER_LENGTH {
        format!(
            "{:?} is {} bytes, over the maximum length of {}",
            name,
            name.len(),
            MAX_IDENTIFIER_LENGTH
        )
    } else {
        return Ok(());
    };

    Err(BrowseError::InvalidIdentifier(problem))
}

fn quote_with(name: &str, quote: char) -> Result<String> {
    validate_identifier(name)?;
    let doubled: String = [quote, quote].iter().collect();
    Ok(format!(
        "{quote}{}{quote}",
        name.replace(quote, &doubled),
        quote = quote
    ))
}

/// Quote an identifier with standard SQL double quotes.
///
/// # Examples
///
/// ```
/// use dbbrowse::core::identifier::quote_identifier;
///
/// assert_eq!(quote_identifier("users").unwrap(), "\"users\"");
/// assert_eq!(quote_identifier("a\"b").unwrap(), "\"a\"\"b\"");
/// assert!(quote_identifier("").is_err());
/// ```
pub fn quote_identifier(name: &str) -> Result<String> {
    quote_pg(name)
}

/// PostgreSQL quoting: `"name"`.
pub fn quote_pg(name: &str) -> Result<String> {
    quote_with(name, '"')
}

/// MySQL quoting: `` `name` ``.
pub fn quote_mysql(name: &str) -> Result<String> {
    quote_with(name, '`')
}
