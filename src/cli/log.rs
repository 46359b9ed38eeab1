use colored::Colorize;

use crate::cli::util::{jira_client, open_config, system_clock};
use crate::cli::LogArgs;
use crate::error::Result;
use crate::git::CliOps;
use crate::jira::format_time_spent;
use crate::logwork::{log_work, LogOutcome, Services, SnapshotUpdate};
use crate::prompt::StdinPrompter;

pub fn run(args: LogArgs) -> Result<()> {
    let mut config = open_config()?;
    let client = jira_client(&config);
    let mut prompter = StdinPrompter::new();
    let branch = CliOps::from_current_dir();
    let clock = system_clock();

    let mut services = Services {
        config: &mut config,
        prompter: &mut prompter,
        branch: &branch,
        clock: &clock,
        client: &client,
    };
    let outcome = log_work(&args.resolution_context(), &args.comment, &mut services)?;

    match outcome {
        LogOutcome::NothingToLog => {
            println!("No target indicated for time logging.");
        }
        LogOutcome::Logged {
            submission,
            snapshot,
        } => {
            println!(
                "{}",
                format!(
                    "Successfully logged {} for task {}",
                    format_time_spent(submission.duration),
                    submission.task
                )
                .green()
            );
            match snapshot {
                SnapshotUpdate::Unchanged => {}
                SnapshotUpdate::Reset(_) => println!("Time measurement restarted."),
                SnapshotUpdate::Failed(e) => {
                    eprintln!("{} failed to restart time measurement: {e}", "warning:".yellow());
                }
            }
        }
    }
    Ok(())
}
