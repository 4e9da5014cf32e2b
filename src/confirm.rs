//! Operator confirmation for destructive commands.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use tracing::info;

use crate::error::{Error, Result};

/// Asks the operator whether a destructive action may go ahead.
pub trait Confirm {
    fn confirm(&mut self, action: &str) -> bool;
}

/// Runs the prompt for `action`; a declined prompt becomes [Error::OperationCancelled].
pub fn require<C: Confirm + ?Sized>(confirm: &mut C, action: &str) -> Result<()> {
    if confirm.confirm(action) {
        Ok(())
    } else {
        info!(action, "operation cancelled by operator");
        Err(Error::OperationCancelled)
    }
}

/// Prompts on stdout and reads the answer from stdin. Only `y` accepts.
#[derive(Debug, Default)]
pub struct Prompt;

impl Confirm for Prompt {
    fn confirm(&mut self, action: &str) -> bool {
        print!("Proceed with \"{action}\"? [y/n]: ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => answer.trim().eq_ignore_ascii_case("y"),
            Err(_) => false,
        }
    }
}

/// Accepts everything without asking (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _action: &str) -> bool {
        true
    }
}

/// Replays fixed answers, declining once they run out. Records what was asked.
#[derive(Debug, Default)]
pub struct Scripted {
    answers: VecDeque<bool>,
    pub asked: Vec<String>,
}

impl Scripted {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }
}

impl Confirm for Scripted {
    fn confirm(&mut self, action: &str) -> bool {
        self.asked.push(action.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}

impl<C: Confirm + ?Sized> Confirm for Box<C> {
    fn confirm(&mut self, action: &str) -> bool {
        (**self).confirm(action)
    }
}
