use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::table::{ColumnDef, Schema};

/// The schema store: every known table and its column layout.
///
/// Persisted as a JSON object mapping table names to `name:type` lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: BTreeMap<String, Schema>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new table from `name:type` column specs.
    ///
    /// Every spec is validated before anything is stored; the first invalid
    /// spec rejects the whole operation and leaves the catalog untouched.
    ///
    /// # Errors
    /// - [Error::TableAlreadyExists] if `name` is already defined.
    /// - [Error::InvalidTableName] if `name` is not usable as a table name.
    /// - [Error::InvalidColumnSpec] for the first malformed spec, a repeated
    ///   column name or a second `ID` column (any case).
    ///
    /// # Example
    /// ```
    /// # use flatdb::Catalog;
    /// let mut catalog = Catalog::new();
    /// let schema = catalog.create_table("users", &["name:str", "age:int"]).unwrap();
    /// assert_eq!(schema.to_string(), "ID:int, name:str, age:int");
    /// ```
    pub fn create_table<S: AsRef<str>>(&mut self, name: &str, specs: &[S]) -> Result<&Schema> {
        if self.tables.contains_key(name) {
            return Err(Error::TableAlreadyExists(name.to_string()));
        }
        validate_table_name(name)?;

        let columns = specs
            .iter()
            .map(|spec| ColumnDef::parse(spec.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        check_unique_columns(&columns)?;

        let schema = Schema::with_identifier(columns);
        info!(table = name, columns = %schema, "table created");
        Ok(self.tables.entry(name.to_string()).or_insert(schema))
    }

    /// Removes a table from the catalog.
    ///
    /// # Errors
    /// Returns [Error::UnknownTable] if the table does not exist.
    pub fn drop_table(&mut self, name: &str) -> Result<Schema> {
        let schema = self
            .tables
            .remove(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))?;
        info!(table = name, "table dropped");
        Ok(schema)
    }

    /// Table names in lexicographic order.
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.tables.get(name)
    }

    /// Like [Catalog::get], but a missing table is an error.
    pub fn schema(&self, name: &str) -> Result<&Schema> {
        self.get(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Table names double as file names, so keep them to a portable alphabet.
fn validate_table_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidTableName(name.to_string()))
    }
}

/// Column names are unique as written, and at most one of them is `ID` in any case.
fn check_unique_columns(columns: &[ColumnDef]) -> Result<()> {
    let mut seen = HashSet::new();
    let mut identifier = None;
    for column in columns {
        if !seen.insert(column.name.as_str()) {
            return Err(Error::InvalidColumnSpec(format!(
                "duplicate column {:?}",
                column.name
            )));
        }
        if column.is_identifier() {
            if let Some(first) = identifier.replace(column.name.as_str()) {
                return Err(Error::InvalidColumnSpec(format!(
                    "{:?} and {:?} both name the ID column",
                    first, column.name
                )));
            }
        }
    }
    Ok(())
}
