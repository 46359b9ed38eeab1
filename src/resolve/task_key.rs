use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::resolve_error::NoJiraTaskSnafu;
use crate::error::ResolveError;

static TASK_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]+-[0-9]+").expect("task key pattern is valid"));

/// Issue key such as `PROJ-123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskKey(String);

impl TaskKey {
    /// Wrap a stored value (an alias target) without re-validating it.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// First task key found in `text`: a raw key, an issue URL, a branch name.
pub fn extract_task_key(text: &str) -> Result<TaskKey, ResolveError> {
    match TASK_KEY_RE.find(text) {
        Some(m) => Ok(TaskKey(m.as_str().to_string())),
        None => NoJiraTaskSnafu { input: text }.fail(),
    }
}
