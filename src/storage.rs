//! Whole-structure persistence of the catalog and of each table's rows.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::row::Row;

/// Reads and writes whole structures; there are no partial or append writes.
pub trait Storage {
    /// Loads the catalog, or an empty one if nothing was saved yet.
    fn load_schema(&self) -> Result<Catalog>;
    fn save_schema(&mut self, catalog: &Catalog) -> Result<()>;
    /// Loads a table's rows, or an empty collection if none were saved yet.
    fn load_rows(&self, table: &str) -> Result<Vec<Row>>;
    fn save_rows(&mut self, table: &str, rows: &[Row]) -> Result<()>;
    /// Forgets a table's rows. Missing data is not an error.
    fn remove_rows(&mut self, table: &str) -> Result<()>;
}

/// JSON files on disk: one file for the catalog, one per table under `data_dir`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    meta_file: PathBuf,
    data_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(meta_file: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            meta_file: meta_file.into(),
            data_dir: data_dir.into(),
        }
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{table}.json"))
    }

    pub fn meta_file(&self) -> &Path {
        &self.meta_file
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

impl Storage for JsonStorage {
    fn load_schema(&self) -> Result<Catalog> {
        match read_optional(&self.meta_file)? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Catalog::new()),
        }
    }

    fn save_schema(&mut self, catalog: &Catalog) -> Result<()> {
        write_file(&self.meta_file, &serde_json::to_string_pretty(catalog)?)?;
        debug!(path = %self.meta_file.display(), "catalog saved");
        Ok(())
    }

    fn load_rows(&self, table: &str) -> Result<Vec<Row>> {
        match read_optional(&self.table_path(table))? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_rows(&mut self, table: &str, rows: &[Row]) -> Result<()> {
        let path = self.table_path(table);
        write_file(&path, &serde_json::to_string_pretty(rows)?)?;
        debug!(path = %path.display(), rows = rows.len(), "rows saved");
        Ok(())
    }

    fn remove_rows(&mut self, table: &str) -> Result<()> {
        match fs::remove_file(self.table_path(table)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Keeps the serialized documents in memory. Same format as [JsonStorage].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    meta: Option<String>,
    tables: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw persisted catalog document, if any.
    pub fn meta_document(&self) -> Option<&str> {
        self.meta.as_deref()
    }

    /// Raw persisted rows document of `table`, if any.
    pub fn table_document(&self, table: &str) -> Option<&str> {
        self.tables.get(table).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn load_schema(&self) -> Result<Catalog> {
        match &self.meta {
            Some(content) => Ok(serde_json::from_str(content)?),
            None => Ok(Catalog::new()),
        }
    }

    fn save_schema(&mut self, catalog: &Catalog) -> Result<()> {
        self.meta = Some(serde_json::to_string_pretty(catalog)?);
        Ok(())
    }

    fn load_rows(&self, table: &str) -> Result<Vec<Row>> {
        match self.tables.get(table) {
            Some(content) => Ok(serde_json::from_str(content)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_rows(&mut self, table: &str, rows: &[Row]) -> Result<()> {
        self.tables
            .insert(table.to_string(), serde_json::to_string_pretty(rows)?);
        Ok(())
    }

    fn remove_rows(&mut self, table: &str) -> Result<()> {
        self.tables.remove(table);
        Ok(())
    }
}
