pub mod ast;
pub mod cache;
pub mod catalog;
pub mod coerce;
pub mod config;
pub mod confirm;
pub mod data_type;
pub mod database;
pub mod engine;
pub mod error;
pub mod format;
pub mod parser;
pub mod repl;
pub mod row;
pub mod storage;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use cache::QueryCache;
pub use catalog::Catalog;
pub use data_type::DataType;
pub use database::{Database, Outcome, Reply};
pub use error::{Error, Result};
pub use row::{Conditions, Row};
pub use table::{ColumnDef, Schema};
pub use value::Value;
