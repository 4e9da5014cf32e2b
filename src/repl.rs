//! Interactive command loop.

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::confirm::Confirm;
use crate::database::Database;
use crate::format;
use crate::storage::Storage;

/// The prompt shown when waiting for input.
const PROMPT: &str = "flatdb> ";

pub const BANNER: &str = "*** flatdb ***\nType 'help' for the command list, 'exit' to quit.";

pub struct Repl<S: Storage, C: Confirm> {
    db: Database<S, C>,
    timing: bool,
}

impl<S: Storage, C: Confirm> Repl<S, C> {
    pub fn new(db: Database<S, C>, timing: bool) -> Self {
        Self { db, timing }
    }

    /// Runs one line and returns the text to print, or `None` to stop.
    pub fn handle(&mut self, line: &str) -> Option<String> {
        let reply = self.db.run_line(line);
        if reply.is_exit() {
            return None;
        }
        Some(format::render_reply(&reply, self.timing))
    }

    /// Reads lines until `exit`, end of input or interrupt.
    pub fn run(&mut self, history: Option<&std::path::Path>) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = history {
            match editor.load_history(path) {
                Ok(()) => {}
                Err(e) if is_missing_file(&e) => {}
                Err(e) => debug!(error = %e, "could not load history"),
            }
        }

        println!("{BANNER}");
        loop {
            let line = match editor.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            editor.add_history_entry(line)?;

            match self.handle(line) {
                Some(output) => println!("{output}"),
                None => break,
            }
        }

        if let Some(path) = history {
            if let Err(e) = editor.save_history(path) {
                debug!(error = %e, "could not save history");
            }
        }
        Ok(())
    }
}

/// No history file yet, as on a first run.
fn is_missing_file(error: &ReadlineError) -> bool {
    matches!(error, ReadlineError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
}
