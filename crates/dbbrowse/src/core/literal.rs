//! Parsing of literal text returned by catalog queries.

/// Parse a database array literal such as `{a,b,c}` into its elements.
///
/// Returns an empty list for `None`, an empty string, or `{}`.
///
/// Elements are split on every comma and trimmed. Quoted elements and
/// escaped commas are not unescaped, so a PostgreSQL text array whose
/// elements contain commas will be split incorrectly. Catalog readers decode
/// `text[]` columns natively and do not go through this function.
pub fn parse_array_literal(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(trimmed);

    if inner.trim().is_empty() {
        return Vec::new();
    }

    inner.split(',').map(|s| s.trim().to_string()).collect()
}

/// Parse the labels out of a MySQL `COLUMN_TYPE` such as `enum('a','b')`.
///
/// Doubled single quotes inside a label are collapsed. Returns an empty list
/// for any non-enum column type.
pub fn parse_mysql_enum_values(column_type: &str) -> Vec<String> {
    let trimmed = column_type.trim();
    let lower = trimmed.to_ascii_lowercase();
    if !lower.starts_with("enum(") || !trimmed.ends_with(')') {
        return Vec::new();
    }

    let body = &trimmed["enum(".len()..trimmed.len() - 1];
    let mut labels = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('\'', false) => in_quotes = true,
            ('\'', true) => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    current.push('\'');
                } else {
                    in_quotes = false;
                    labels.push(std::mem::take(&mut current));
                }
            }
            (_, true) => current.push(c),
            // separators and whitespace between labels
            (_, false) => {}
        }
    }

    labels
}
