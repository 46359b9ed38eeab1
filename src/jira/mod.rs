pub mod http;
pub mod worklogs;

pub use http::{HttpJiraClient, JiraSettings};
pub use worklogs::{format_time_spent, Day, LoggedTime, TaskLog, WorklogRange};

use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::error::JiraError;
use crate::resolve::TaskKey;

/// An issue assigned to the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub status: String,
}

/// Issue tracker operations used by the commands.
pub trait WorklogClient {
    /// Submit a worklog entry.
    fn log_time(
        &self,
        task: &TaskKey,
        duration: TimeDelta,
        started: DateTime<FixedOffset>,
        comment: &str,
    ) -> Result<(), JiraError>;

    /// Open issues assigned to the current user.
    fn assigned_issues(&self) -> Result<Vec<Issue>, JiraError>;

    /// Time the current user logged since `since`, grouped by day.
    fn logged_time(&self, since: DateTime<FixedOffset>) -> Result<LoggedTime, JiraError>;
}
