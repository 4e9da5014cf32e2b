//! Error types for the engine and its command interpreter.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Schema errors
    #[error("Table \"{0}\" does not exist.")]
    UnknownTable(String),

    #[error("Table \"{0}\" already exists.")]
    TableAlreadyExists(String),

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("Invalid column spec: {0}")]
    InvalidColumnSpec(String),

    // Row errors
    #[error("Expected {expected} values, got {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Value {literal:?} is not a valid {expected} for column {column:?}")]
    TypeCoercion {
        column: String,
        expected: String,
        literal: String,
    },

    #[error("Table \"{0}\" has no identifier left to assign.")]
    IdExhausted(String),

    #[error("Malformed condition: {0:?}. Expected format: column = value (text in quotes)")]
    MalformedCondition(String),

    // Interpreter errors
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Unknown command {0:?}. Type 'help' for the command list.")]
    UnknownCommand(String),

    #[error("Operation cancelled.")]
    OperationCancelled,

    // Unexpected errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is an operator mistake rather than a failure of the system.
    pub fn is_expected(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Serialization(_))
    }
}
