use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Represents the supported column types in a table schema.
/// The set is closed: every literal is coerced through one of these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A 64-bit signed integer (`int`).
    Int,
    /// A UTF-8 character string (`str`).
    Text,
    /// A boolean value (`bool`).
    Bool,
}

impl DataType {
    /// Canonical spelling used in the persisted schema (`ID:int`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Text => "str",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = Error;

    /// Accepts `int`/`integer`, `str`/`text` and `bool`/`boolean`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int" | "integer" => Ok(Self::Int),
            "str" | "text" => Ok(Self::Text),
            "bool" | "boolean" => Ok(Self::Bool),
            other => Err(Error::InvalidColumnSpec(format!("unknown type {other:?}"))),
        }
    }
}
