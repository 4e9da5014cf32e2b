//! Configuration file support.
//!
//! Settings come from an optional TOML file; command-line flags override them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "flatdb.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the catalog (table name -> columns) is stored.
    pub meta_file: PathBuf,

    /// Directory holding one `<table>.json` file per table.
    pub data_dir: PathBuf,

    /// Print how long each command took.
    pub timing: bool,

    /// Skip the confirmation prompt of destructive commands.
    pub assume_yes: bool,

    /// REPL history file.
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta_file: PathBuf::from("db_meta.json"),
            data_dir: PathBuf::from("data"),
            timing: false,
            assume_yes: false,
            history_file: None,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads `path` if given, else [DEFAULT_CONFIG_FILE] if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
