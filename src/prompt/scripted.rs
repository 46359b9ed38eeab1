use std::collections::VecDeque;

use crate::error::prompt_error::EmptyInputSnafu;
use crate::error::PromptError;
use crate::prompt::Prompter;

/// Prompter answering from queued responses.
///
/// When a queue runs dry the prompter behaves like an empty stdin line.
/// Public so the integration tests under `tests/` can drive `log_work`
/// without a terminal.
#[derive(Default)]
pub struct ScriptedPrompter {
    strings: VecDeque<Result<String, PromptError>>,
    approvals: VecDeque<Result<bool, PromptError>>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strings<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strings
            .extend(answers.into_iter().map(|a| Ok(a.into())));
        self
    }

    pub fn with_approvals(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.approvals.extend(answers.into_iter().map(Ok));
        self
    }

    pub fn push_string_error(&mut self, err: PromptError) {
        self.strings.push_back(Err(err));
    }

    pub fn push_approval_error(&mut self, err: PromptError) {
        self.approvals.push_back(Err(err));
    }

    /// Number of questions asked so far.
    pub fn prompt_count(&self) -> usize {
        self.asked.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask_string(&mut self, info: &str, _prompt: &str) -> Result<String, PromptError> {
        self.asked.push(info.to_string());
        self.strings
            .pop_front()
            .unwrap_or_else(|| EmptyInputSnafu.fail())
    }

    fn ask_yes_no(&mut self, message: &str) -> Result<bool, PromptError> {
        self.asked.push(message.to_string());
        self.approvals
            .pop_front()
            .unwrap_or_else(|| EmptyInputSnafu.fail())
    }
}
