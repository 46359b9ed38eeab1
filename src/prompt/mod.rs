pub mod scripted;

pub use scripted::ScriptedPrompter;

use std::io::{BufRead, Write};

use crate::error::prompt_error::{EmptyInputSnafu, InvalidApprovalSnafu, ReadInputSnafu};
use crate::error::PromptError;
use snafu::ResultExt;

pub const APPROVE_PROMPT: &str = "Proceed? [y/n]: ";

/// Interactive questions asked while resolving what to log.
pub trait Prompter {
    /// Print `info`, then ask `prompt` and return the non-empty answer.
    fn ask_string(&mut self, info: &str, prompt: &str) -> Result<String, PromptError>;

    /// Ask a yes/no question about `message`.
    fn ask_yes_no(&mut self, message: &str) -> Result<bool, PromptError>;
}

/// Prompter reading answers line by line from stdin.
pub struct StdinPrompter<R = std::io::StdinLock<'static>> {
    input: R,
}

impl StdinPrompter {
    pub fn new() -> Self {
        Self {
            input: std::io::stdin().lock(),
        }
    }
}

impl Default for StdinPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead> StdinPrompter<R> {
    pub fn with_input(input: R) -> Self {
        Self { input }
    }

    fn read_answer(&mut self) -> Result<String, PromptError> {
        let _ = std::io::stderr().flush();
        let mut line = String::new();
        self.input.read_line(&mut line).context(ReadInputSnafu)?;
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead> Prompter for StdinPrompter<R> {
    fn ask_string(&mut self, info: &str, prompt: &str) -> Result<String, PromptError> {
        if !info.is_empty() {
            eprintln!("{info}");
        }
        eprint!("{prompt} ");
        let answer = self.read_answer()?;
        if answer.is_empty() {
            return EmptyInputSnafu.fail();
        }
        Ok(answer)
    }

    fn ask_yes_no(&mut self, message: &str) -> Result<bool, PromptError> {
        eprintln!("{message}");
        eprint!("{APPROVE_PROMPT}");
        let answer = self.read_answer()?;
        parse_approval(&answer)
    }
}

fn parse_approval(answer: &str) -> Result<bool, PromptError> {
    match answer {
        "y" | "Y" => Ok(true),
        "n" | "N" => Ok(false),
        "" => EmptyInputSnafu.fail(),
        other => InvalidApprovalSnafu { input: other }.fail(),
    }
}
