use std::fmt;

use allocative::Allocative;
use serde::{Deserialize, Serialize};

use crate::data_type::DataType;

/// Represents a single typed scalar stored in a row.
///
/// Values serialize untagged, so a persisted row reads as a plain JSON object
/// (`{"ID": 1, "name": "Alice", "active": true}`).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Allocative,
)]
#[serde(untagged)]
pub enum Value {
    /// A 64-bit signed integer value.
    Int(i64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string value.
    Text(String),
}

impl Value {
    /// Returns the inner integer value if this is a [Value::Int].
    /// Otherwise, returns `None`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns a reference to the inner string slice if this is a [Value::Text].
    /// Otherwise, returns `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner boolean value if this is a [Value::Bool].
    /// Otherwise, returns `None`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the logical [DataType] corresponding to this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::Text(_) => DataType::Text,
            Self::Bool(_) => DataType::Bool,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────
    // Test 1 : accessors
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Text("42".into()).as_int(), None);
        assert_eq!(Value::Text("hello".into()).as_str(), Some("hello"));
        assert_eq!(Value::Bool(true).as_str(), None);
        assert_eq!(Value::Bool(false).as_bool(), Some(false));
        assert_eq!(Value::Int(1).as_bool(), None);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 2 : data_type
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_data_type() {
        assert_eq!(Value::Int(1).data_type(), DataType::Int);
        assert_eq!(Value::Text("x".into()).data_type(), DataType::Text);
        assert_eq!(Value::Bool(true).data_type(), DataType::Bool);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 3 : no cross-type equality
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_no_cross_type_equality() {
        assert_ne!(Value::Int(28), Value::Text("28".into()));
        assert_ne!(Value::Bool(true), Value::Text("true".into()));
        assert_ne!(Value::Int(1), Value::Bool(true));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 4 : JSON shape
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_json_shape() {
        assert_eq!(serde_json::to_string(&Value::Int(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&Value::Bool(true)).unwrap(), "true");
        assert_eq!(
            serde_json::to_string(&Value::Text("Alice".into())).unwrap(),
            "\"Alice\""
        );

        let parsed: Vec<Value> = serde_json::from_str(r#"[3, false, "x"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Value::Int(3), Value::Bool(false), Value::Text("x".into())]
        );
    }
}
