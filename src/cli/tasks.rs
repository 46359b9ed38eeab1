use snafu::ResultExt;

use crate::cli::util::{format_table, jira_client, open_config, truncate};
use crate::error::logit_error::JiraSnafu;
use crate::error::Result;
use crate::jira::{Issue, WorklogClient};

const SUMMARY_WIDTH: usize = 37;

pub fn run() -> Result<()> {
    let config = open_config()?;
    let client = jira_client(&config);
    print!("{}", render_assigned(&client)?);
    Ok(())
}

pub fn render_assigned(client: &dyn WorklogClient) -> Result<String> {
    let issues = client.assigned_issues().context(JiraSnafu)?;
    tracing::debug!(count = issues.len(), "assigned issues fetched");
    if issues.is_empty() {
        return Ok("No tasks assigned to you.\n".to_string());
    }
    Ok(issue_table(&issues))
}

fn issue_table(issues: &[Issue]) -> String {
    let mut rows = vec![vec![
        "KEY".to_string(),
        "SUMMARY".to_string(),
        "STATUS".to_string(),
    ]];
    rows.extend(issues.iter().map(|issue| {
        vec![
            issue.key.clone(),
            truncate(&issue.summary, SUMMARY_WIDTH),
            issue.status.clone(),
        ]
    }));
    format_table(&rows)
}
