//! SQL literal formatting
//!
//! Converts typed values into SQL literal text. Text values are enclosed in
//! single quotes and every embedded single quote is doubled (`'` becomes `''`),
//! which is SQLite's string-constant rule. Every caller-controlled text that
//! ends up inside statement text goes through [`make_string_constant`].

use crate::error::{MemoError, MemoResult};

const SINGLE_QUOTE: char = '\'';

/// Escape character used in `LIKE ... ESCAPE` clauses built by this crate
pub const LIKE_ESCAPE: char = '\\';

/// A raw value bound to a column before it is rendered into statement text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
    Null,
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Integer(v as i64)
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        SqlValue::Integer(v as i64)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Integer(v as i64)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

/// Format class of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFormat {
    /// Rendered as a decimal number
    Integer,
    /// Rendered as a quoted, escaped string constant
    Text,
}

/// Make a string constant from `input` by the rules of SQLite
///
/// Returns `None` when the input is absent: the caller must then omit the
/// column entirely rather than emit an empty literal.
///
/// # Examples
///
/// ```
/// use memodb::database::core::make_string_constant;
///
/// assert_eq!(make_string_constant(Some("O'Brien")).as_deref(), Some("'O''Brien'"));
/// assert_eq!(make_string_constant(None), None);
/// ```
pub fn make_string_constant(input: Option<&str>) -> Option<String> {
    let input = input?;
    let quotes = input.matches(SINGLE_QUOTE).count();
    let mut out = String::with_capacity(input.len() + quotes + 2);

    out.push(SINGLE_QUOTE);
    for c in input.chars() {
        out.push(c);
        if c == SINGLE_QUOTE {
            out.push(SINGLE_QUOTE);
        }
    }
    out.push(SINGLE_QUOTE);
    Some(out)
}

/// Render `value` as a literal of the given format class
///
/// `Ok(None)` means the value is absent and the pair must be skipped.
pub fn format_literal(format: ColumnFormat, value: &SqlValue) -> MemoResult<Option<String>> {
    match (format, value) {
        (_, SqlValue::Null) => Ok(None),
        (ColumnFormat::Integer, SqlValue::Integer(v)) => Ok(Some(v.to_string())),
        (ColumnFormat::Text, SqlValue::Text(s)) => Ok(make_string_constant(Some(s.as_str()))),
        (ColumnFormat::Integer, SqlValue::Text(s)) => Err(MemoError::Statement(format!(
            "text value '{}' given for an integer column",
            s
        ))),
        (ColumnFormat::Text, SqlValue::Integer(v)) => Err(MemoError::Statement(format!(
            "integer value {} given for a text column",
            v
        ))),
    }
}

/// Escape `LIKE` wildcards (`%`, `_`) and the escape character itself so the
/// term matches literally when used with `ESCAPE '\'`
pub fn escape_like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if c == LIKE_ESCAPE || c == '%' || c == '_' {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Build the quoted `%term%` substring pattern for a `LIKE` predicate
pub fn substring_pattern(term: &str) -> String {
    let pattern = format!("%{}%", escape_like_pattern(term));
    // Some(..) in, Some(..) out
    make_string_constant(Some(pattern.as_str())).unwrap_or_default()
}
