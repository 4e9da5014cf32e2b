use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::{
    ast::{Command, Delete, Insert, Select, Update},
    cache::{CacheStats, QueryCache},
    confirm::{self, Confirm},
    engine::{self, Assignments},
    error::{Error, Result},
    parser,
    row::{Conditions, Row},
    storage::Storage,
    table::Schema,
    value::Value,
};

/// The entry point for running commands against persisted tables.
///
/// Every command reloads the catalog (and the table's rows when it needs
/// them) from storage, applies the change in memory and writes whole
/// structures back, so a failed command never leaves a partial write.
pub struct Database<S: Storage, C: Confirm> {
    storage: S,
    confirm: C,
    /// Lives as long as the database; shared by every select.
    cache: QueryCache,
}

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Help,
    Exit,
    Tables(Vec<String>),
    Created { table: String, schema: Schema },
    Dropped { table: String },
    Inserted { table: String, id: i64 },
    /// Matching rows, with the table's columns in declaration order.
    Rows { columns: Vec<String>, rows: Vec<Row> },
    Updated(usize),
    Deleted(usize),
    Info {
        table: String,
        schema: Schema,
        rows: usize,
        cache: CacheStats,
    },
}

/// Result of one command line, as handed to presentation.
#[derive(Debug)]
pub struct Reply {
    pub command: &'static str,
    pub result: Result<Outcome>,
    pub elapsed: Duration,
}

impl Reply {
    pub fn is_exit(&self) -> bool {
        matches!(self.result, Ok(Outcome::Exit))
    }
}

impl<S: Storage, C: Confirm> Database<S, C> {
    pub fn new(storage: S, confirm: C) -> Self {
        Self {
            storage,
            confirm,
            cache: QueryCache::new(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn confirmer(&self) -> &C {
        &self.confirm
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Parses and executes one command line, never failing past this point.
    ///
    /// Operator mistakes are logged as warnings, anything else as an error;
    /// both come back inside the [Reply] for display.
    ///
    /// # Example
    /// ```
    /// use flatdb::{Database, Outcome};
    /// use flatdb::confirm::AssumeYes;
    /// use flatdb::storage::MemoryStorage;
    ///
    /// let mut db = Database::new(MemoryStorage::new(), AssumeYes);
    /// db.run_line("create_table users name:str age:int");
    /// let reply = db.run_line("insert into users values ('Alice', 28)");
    /// assert!(matches!(reply.result, Ok(Outcome::Inserted { id: 1, .. })));
    ///
    /// let reply = db.run_line("insert into users values ('Bob')");
    /// assert!(reply.result.is_err());
    /// ```
    pub fn run_line(&mut self, line: &str) -> Reply {
        let started = Instant::now();
        let parsed = parser::parse(line);
        let command = parsed.as_ref().map_or("unknown", Command::name);
        let result = parsed.and_then(|command| self.execute(command));
        let elapsed = started.elapsed();

        match &result {
            Ok(_) => debug!(command, elapsed_secs = elapsed.as_secs_f64(), "command completed"),
            Err(Error::OperationCancelled) => info!(command, "command cancelled"),
            Err(e) if e.is_expected() => warn!(command, error = %e, "command rejected"),
            Err(e) => error!(command, error = %e, "command failed"),
        }

        Reply {
            command,
            result,
            elapsed,
        }
    }

    /// Executes an already parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Help => Ok(Outcome::Help),
            Command::Exit => Ok(Outcome::Exit),
            Command::ListTables => Ok(Outcome::Tables(self.list_tables()?)),
            Command::CreateTable(create) => {
                let schema = self.create_table(&create.name, &create.columns)?;
                Ok(Outcome::Created {
                    table: create.name,
                    schema,
                })
            }
            Command::DropTable { table } => {
                self.drop_table(&table)?;
                Ok(Outcome::Dropped { table })
            }
            Command::Info { table } => self.info(&table),
            Command::Insert(Insert { table, values }) => {
                let id = self.insert(&table, &values)?;
                Ok(Outcome::Inserted { table, id })
            }
            Command::Select(Select {
                table,
                where_clause,
            }) => {
                let columns = self.storage.load_schema()?.schema(&table)?.column_names();
                let rows = self.select(&table, where_clause.as_ref())?;
                Ok(Outcome::Rows { columns, rows })
            }
            Command::Update(Update {
                table,
                assignments,
                where_clause,
            }) => Ok(Outcome::Updated(
                self.update(&table, &assignments, &where_clause)?,
            )),
            Command::Delete(Delete {
                table,
                where_clause,
            }) => Ok(Outcome::Deleted(self.delete(&table, &where_clause)?)),
        }
    }

    /// Creates a table from `name:type` specs and persists the catalog.
    ///
    /// # Errors
    /// Returns an error if the table already exists or a spec is invalid;
    /// nothing is written in that case.
    pub fn create_table<T: AsRef<str>>(&mut self, name: &str, specs: &[T]) -> Result<Schema> {
        let mut catalog = self.storage.load_schema()?;
        let schema = catalog.create_table(name, specs)?.clone();
        self.storage.save_schema(&catalog)?;
        Ok(schema)
    }

    /// Drops a table and its rows, after confirmation.
    ///
    /// # Errors
    /// Returns [Error::UnknownTable] if the table does not exist and
    /// [Error::OperationCancelled] if the operator declines.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        let mut catalog = self.storage.load_schema()?;
        catalog.schema(name)?;
        confirm::require(&mut self.confirm, "drop_table")?;

        // rows go first: a failed removal leaves the table listed
        self.storage.remove_rows(name)?;
        catalog.drop_table(name)?;
        self.storage.save_schema(&catalog)?;
        Ok(())
    }

    /// Returns a list of all table names, sorted.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let catalog = self.storage.load_schema()?;
        Ok(catalog.list_tables().into_iter().map(String::from).collect())
    }

    /// Inserts a row from positional literals and returns its ID.
    ///
    /// The next ID is computed from the rows currently persisted, not from
    /// anything held in memory.
    pub fn insert<T: AsRef<str>>(&mut self, table: &str, literals: &[T]) -> Result<i64> {
        let catalog = self.storage.load_schema()?;
        let identifier = catalog.schema(table)?.identifier();
        let rows = self.storage.load_rows(table)?;

        let rows = engine::insert(&catalog, table, &rows, literals)?;
        let id = rows
            .last()
            .and_then(|row| row.get(identifier))
            .and_then(Value::as_int)
            .unwrap_or_default();
        self.storage.save_rows(table, &rows)?;

        info!(table, id, "row inserted");
        Ok(id)
    }

    /// Returns the rows of `table` matching `conditions` (all rows if `None`).
    pub fn select(&mut self, table: &str, conditions: Option<&Conditions>) -> Result<Vec<Row>> {
        self.storage.load_schema()?.schema(table)?;
        let rows = self.storage.load_rows(table)?;
        Ok(engine::select(&mut self.cache, &rows, conditions))
    }

    /// Applies `assignments` to matching rows and returns how many matched.
    pub fn update(
        &mut self,
        table: &str,
        assignments: &Assignments,
        conditions: &Conditions,
    ) -> Result<usize> {
        self.storage.load_schema()?.schema(table)?;
        let rows = self.storage.load_rows(table)?;

        let (rows, matched) = engine::update(rows, assignments, conditions);
        self.storage.save_rows(table, &rows)?;

        info!(table, matched, "rows updated");
        Ok(matched)
    }

    /// Deletes matching rows after confirmation and returns how many were removed.
    pub fn delete(&mut self, table: &str, conditions: &Conditions) -> Result<usize> {
        self.storage.load_schema()?.schema(table)?;
        let rows = self.storage.load_rows(table)?;
        confirm::require(&mut self.confirm, "delete")?;

        let before = rows.len();
        let rows = engine::delete(rows, conditions);
        let removed = before - rows.len();
        self.storage.save_rows(table, &rows)?;

        info!(table, removed, "rows deleted");
        Ok(removed)
    }

    fn info(&self, table: &str) -> Result<Outcome> {
        let catalog = self.storage.load_schema()?;
        let schema = catalog.schema(table)?.clone();
        let rows = self.storage.load_rows(table)?.len();

        Ok(Outcome::Info {
            table: table.to_string(),
            schema,
            rows,
            cache: self.cache.stats(),
        })
    }
}
