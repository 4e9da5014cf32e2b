//! Operator-facing text for command results.

use comfy_table::{Cell, ContentArrangement, Table};

use crate::database::{Outcome, Reply};
use crate::error::Error;
use crate::row::Row;

pub const HELP: &str = "\
Tables:
  create_table <table> <column:type> ...   create a table (types: int, str, bool)
  list_tables                               list all tables
  drop_table <table>                        drop a table and its rows
  info <table>                              show a table's columns and row count

Rows:
  insert into <table> values (<v1>, <v2>, ...)
  select from <table> [where <column> = <value>]
  update <table> set <column> = <value> where <column> = <value>
  delete from <table> where <column> = <value>

Text values go in quotes: where name = 'Alice'

General:
  help                                      show this help
  exit                                      leave the program";

/// Renders rows as a table whose header follows `columns`.
///
/// Fields a row lacks render empty. With no columns at all (no schema), the
/// result is `(no rows)`.
pub fn render_rows(columns: &[String], rows: &[Row]) -> String {
    if columns.is_empty() {
        return "(no rows)".to_string();
    }

    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    table.set_header(columns.iter().map(Cell::new));
    for row in rows {
        let cells = columns.iter().map(|column| match row.get(column) {
            Some(value) => Cell::new(value),
            None => Cell::new(""),
        });
        table.add_row(cells);
    }

    table.to_string()
}

pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Help => HELP.to_string(),
        Outcome::Exit => "Bye!".to_string(),
        Outcome::Tables(tables) if tables.is_empty() => "(no tables)".to_string(),
        Outcome::Tables(tables) => tables
            .iter()
            .map(|t| format!("- {t}"))
            .collect::<Vec<_>>()
            .join("\n"),
        Outcome::Created { table, schema } => {
            format!("Table \"{table}\" created with columns: {schema}")
        }
        Outcome::Dropped { table } => format!("Table \"{table}\" dropped."),
        Outcome::Inserted { table, id } => {
            format!("Row with ID={id} added to table \"{table}\".")
        }
        Outcome::Rows { columns, rows } => render_rows(columns, rows),
        Outcome::Updated(0) => "No rows found to update.".to_string(),
        Outcome::Updated(n) => format!("Rows updated: {n}."),
        Outcome::Deleted(0) => "No rows found to delete.".to_string(),
        Outcome::Deleted(n) => format!("Rows deleted: {n}."),
        Outcome::Info {
            table,
            schema,
            rows,
            cache,
        } => format!(
            "Table: {table}\nColumns: {schema}\nRows: {rows}\nQuery cache: {} entries, {} hits, {} misses, {} bytes",
            cache.entries, cache.hits, cache.misses, cache.allocated_bytes
        ),
    }
}

pub fn render_error(error: &Error) -> String {
    match error {
        Error::OperationCancelled => error.to_string(),
        e if e.is_expected() => format!("Error: {e}"),
        e => format!("Unexpected error, the operation did not complete: {e}"),
    }
}

/// Full text for a reply; with `timing`, successful commands report their duration.
pub fn render_reply(reply: &Reply, timing: bool) -> String {
    match &reply.result {
        Ok(outcome) if timing => format!(
            "{}\n{} completed in {:.3} s",
            render_outcome(outcome),
            reply.command,
            reply.elapsed.as_secs_f64()
        ),
        Ok(outcome) => render_outcome(outcome),
        Err(e) => render_error(e),
    }
}
