use crate::clock::SystemClock;
use crate::config::FileConfig;
use crate::error::logit_error::ConfigSnafu;
use crate::error::Result;
use crate::jira::{HttpJiraClient, JiraSettings};
use snafu::ResultExt;

/// Open the config file the commands work against.
pub(crate) fn open_config() -> Result<FileConfig> {
    FileConfig::open_default().context(ConfigSnafu)
}

pub(crate) fn jira_client(config: &FileConfig) -> HttpJiraClient {
    HttpJiraClient::new(JiraSettings::from_config(config))
}

pub(crate) fn system_clock() -> SystemClock {
    SystemClock
}

/// Cut `s` to `max` characters, marking the cut with "...".
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Left-aligned columns separated by `" | "`, one line per row.
pub fn format_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{cell:<width$}", width = widths[i]))
            .collect();
        out.push_str(cells.join(" | ").trim_end());
        out.push('\n');
    }
    out
}
