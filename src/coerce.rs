//! Literal coercion: turning operator-typed text into typed [Value]s.

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;

/// Removes one pair of matching surrounding quotes (`'..'` or `".."`), if present.
pub fn strip_quotes(literal: &str) -> &str {
    let literal = literal.trim();
    let bytes = literal.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &literal[1..literal.len() - 1];
        }
    }
    literal
}

/// Coerces an insert literal into a value of the column's declared type.
///
/// Surrounding quotes are stripped first, so `"28"` is a valid `int`.
///
/// # Errors
/// Returns [Error::TypeCoercion] if the text is not a valid literal of `data_type`.
///
/// # Example
/// ```
/// # use flatdb::coerce::coerce;
/// # use flatdb::{DataType, Value};
/// assert_eq!(coerce("age", "'28'", DataType::Int).unwrap(), Value::Int(28));
/// assert_eq!(coerce("ok", "TRUE", DataType::Bool).unwrap(), Value::Bool(true));
/// assert!(coerce("age", "twenty", DataType::Int).is_err());
/// ```
pub fn coerce(column: &str, literal: &str, data_type: DataType) -> Result<Value> {
    let text = strip_quotes(literal);
    let mismatch = || Error::TypeCoercion {
        column: column.to_string(),
        expected: data_type.to_string(),
        literal: literal.to_string(),
    };

    match data_type {
        DataType::Int => text.parse::<i64>().map(Value::Int).map_err(|_| mismatch()),
        DataType::Bool => parse_bool(text).map(Value::Bool).ok_or_else(mismatch),
        DataType::Text => Ok(Value::Text(text.to_string())),
    }
}

/// Infers the type of a condition literal from its syntax alone.
///
/// Quoted text is a string, `true`/`false` (any case) a boolean, a base-10
/// integer an int. Anything else is rejected: bare words are not strings.
pub fn infer(literal: &str) -> Result<Value> {
    let raw = literal.trim();
    let unquoted = strip_quotes(raw);
    if unquoted.len() != raw.len() {
        return Ok(Value::Text(unquoted.to_string()));
    }
    if let Some(b) = parse_bool(raw) {
        return Ok(Value::Bool(b));
    }
    raw.parse::<i64>()
        .map(Value::Int)
        .map_err(|_| Error::MalformedCondition(raw.to_string()))
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
