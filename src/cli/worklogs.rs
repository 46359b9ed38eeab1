use colored::Colorize;
use snafu::ResultExt;

use crate::cli::util::{format_table, jira_client, open_config, system_clock, truncate};
use crate::clock::Clock;
use crate::error::logit_error::{JiraSnafu, ResolveSnafu};
use crate::error::Result;
use crate::jira::{format_time_spent, LoggedTime, WorklogClient, WorklogRange};

const SUMMARY_WIDTH: usize = 37;

pub fn run(today: bool, yesterday: bool, week: bool, days: Option<u32>) -> Result<()> {
    let range = WorklogRange::from_flags(today, yesterday, week, days).context(ResolveSnafu)?;
    let config = open_config()?;
    let client = jira_client(&config);
    let logged = fetch(range, &client, &system_clock())?;
    print!("{}", render(&logged));
    Ok(())
}

pub fn fetch(
    range: WorklogRange,
    client: &dyn WorklogClient,
    clock: &dyn Clock,
) -> Result<LoggedTime> {
    let since = range.since(clock);
    tracing::debug!(?range, %since, "fetching worklogs");
    client.logged_time(since).context(JiraSnafu)
}

/// One green header per day followed by its tasks.
pub fn render(logged: &LoggedTime) -> String {
    if logged.is_empty() {
        return "no time logged in specified time range\n".to_string();
    }

    let mut out = String::new();
    for day in &logged.days {
        let header = format!(
            "{} ({}) - {}",
            day.date.format("%Y-%m-%d"),
            day.date.format("%A"),
            format_time_spent(day.time_logged)
        );
        out.push_str(&format!("{}\n", header.green()));

        let rows: Vec<Vec<String>> = day
            .worklogs
            .iter()
            .map(|log| {
                vec![
                    log.task_key.clone(),
                    truncate(&log.summary, SUMMARY_WIDTH),
                    format_time_spent(log.logged_time),
                ]
            })
            .collect();
        out.push_str(&format_table(&rows));
        out.push('\n');
    }
    out
}
