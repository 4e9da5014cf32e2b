use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data_type::DataType;
use crate::error::{Error, Result};

/// Name of the surrogate identifier column injected into every table.
pub const ID_COLUMN: &str = "ID";

/// Column definition in the schema.
///
/// Persisted as a single `name:type` string, e.g. `"age:int"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Parses a `name:type` spec. Name and type are trimmed, the type is
    /// matched case-insensitively.
    ///
    /// # Errors
    /// Returns [Error::InvalidColumnSpec] when the separator is missing, the
    /// name is empty or the type is not one of `int`, `str`, `bool`.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = || Error::InvalidColumnSpec(spec.to_string());

        let (name, data_type) = spec.split_once(':').ok_or_else(invalid)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid());
        }
        let data_type = data_type.parse::<DataType>().map_err(|_| invalid())?;

        Ok(Self::new(name, data_type))
    }

    /// Whether this is the identifier column (`ID`, any case).
    pub fn is_identifier(&self) -> bool {
        self.name.eq_ignore_ascii_case(ID_COLUMN)
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.data_type)
    }
}

impl TryFrom<String> for ColumnDef {
    type Error = Error;

    fn try_from(spec: String) -> Result<Self> {
        Self::parse(&spec)
    }
}

impl From<ColumnDef> for String {
    fn from(column: ColumnDef) -> Self {
        column.to_string()
    }
}

/// Ordered column declarations of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    /// Builds a schema from already-validated columns, injecting a leading
    /// `ID:int` column when none is named `ID` (any case).
    pub fn with_identifier(mut columns: Vec<ColumnDef>) -> Self {
        if !columns.iter().any(ColumnDef::is_identifier) {
            columns.insert(0, ColumnDef::new(ID_COLUMN, DataType::Int));
        }
        Self { columns }
    }

    /// The identifier column as declared, falling back to `ID`.
    pub fn identifier(&self) -> &str {
        self.columns
            .iter()
            .find(|c| c.is_identifier())
            .map_or(ID_COLUMN, |c| c.name.as_str())
    }

    /// Columns that receive insert values, in declaration order.
    pub fn value_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| !c.is_identifier())
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn get_col(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|col| col.name == name)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let specs: Vec<String> = self.columns.iter().map(ToString::to_string).collect();
        f.write_str(&specs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_column_spec() {
        let col = ColumnDef::parse(" age : INT ").unwrap();
        assert_eq!(col, ColumnDef::new("age", DataType::Int));
        assert_eq!(col.to_string(), "age:int");

        let col = ColumnDef::parse("note:text").unwrap();
        assert_eq!(col.to_string(), "note:str");
    }

    #[test]
    fn test_parse_invalid_specs() {
        for spec in ["age", ":int", "  :int", "age:float", "age:", ""] {
            assert!(
                matches!(ColumnDef::parse(spec), Err(Error::InvalidColumnSpec(_))),
                "{spec:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_identifier_injection() {
        let schema = Schema::with_identifier(vec![
            ColumnDef::new("name", DataType::Text),
            ColumnDef::new("age", DataType::Int),
        ]);
        assert_eq!(schema.columns[0], ColumnDef::new("ID", DataType::Int));
        assert_eq!(schema.columns.len(), 3);
        assert_eq!(schema.identifier(), "ID");
    }

    #[test]
    fn test_caller_identifier_is_kept() {
        let schema = Schema::with_identifier(vec![
            ColumnDef::new("name", DataType::Text),
            ColumnDef::new("id", DataType::Text),
        ]);
        assert_eq!(schema.columns.len(), 2);
        assert_eq!(schema.columns[1], ColumnDef::new("id", DataType::Text));
        assert_eq!(schema.identifier(), "id");
    }

    #[test]
    fn test_value_columns() {
        let schema = Schema::with_identifier(vec![
            ColumnDef::new("name", DataType::Text),
            ColumnDef::new("active", DataType::Bool),
        ]);
        let names: Vec<&str> = schema.value_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["name", "active"]);
        assert!(schema.get_col("active").is_some());
        assert!(schema.get_col("missing").is_none());
    }

    #[test]
    fn test_schema_json_shape() {
        let schema = Schema::with_identifier(vec![ColumnDef::new("name", DataType::Text)]);
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(json, r#"["ID:int","name:str"]"#);

        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);
        assert!(serde_json::from_str::<Schema>(r#"["name"]"#).is_err());
    }
}
