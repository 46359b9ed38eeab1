//! The `log` pipeline: validate, resolve, submit, restart the snapshot.

use chrono::{DateTime, FixedOffset, TimeDelta};
use snafu::ResultExt;

use crate::clock::Clock;
use crate::config::ConfigStore;
use crate::error::logit_error::{JiraSnafu, ResolveSnafu};
use crate::error::{ConfigError, Result};
use crate::git::BranchLookup;
use crate::jira::WorklogClient;
use crate::prompt::Prompter;
use crate::resolve::{
    determine_duration, determine_started, determine_task, validate_flags, ResolutionContext,
    TaskKey,
};

/// Everything the pipeline talks to.
pub struct Services<'a> {
    pub config: &'a mut dyn ConfigStore,
    pub prompter: &'a mut dyn Prompter,
    pub branch: &'a dyn BranchLookup,
    pub clock: &'a dyn Clock,
    pub client: &'a dyn WorklogClient,
}

/// A resolved worklog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub task: TaskKey,
    pub duration: TimeDelta,
    pub started: DateTime<FixedOffset>,
    pub comment: String,
}

#[derive(Debug)]
pub enum SnapshotUpdate {
    Unchanged,
    Reset(DateTime<FixedOffset>),
    /// The worklog went through but the new snapshot could not be saved.
    Failed(ConfigError),
}

#[derive(Debug)]
pub enum LogOutcome {
    Logged {
        submission: Submission,
        snapshot: SnapshotUpdate,
    },
    /// Task resolution produced an empty key.
    NothingToLog,
}

/// Run one `log` invocation.
pub fn log_work(
    ctx: &ResolutionContext,
    comment: &str,
    services: &mut Services<'_>,
) -> Result<LogOutcome> {
    validate_flags(ctx, services.clock).context(ResolveSnafu)?;

    let task = determine_task(
        ctx,
        &*services.config,
        &mut *services.prompter,
        services.branch,
    )
    .context(ResolveSnafu)?;
    if task.is_empty() {
        return Ok(LogOutcome::NothingToLog);
    }

    let resolved = determine_duration(
        ctx,
        &*services.config,
        &mut *services.prompter,
        services.clock,
    )
    .context(ResolveSnafu)?;
    let started = determine_started(ctx, services.clock).context(ResolveSnafu)?;

    let submission = Submission {
        task,
        duration: resolved.duration,
        started,
        comment: comment.to_string(),
    };
    services
        .client
        .log_time(
            &submission.task,
            submission.duration,
            submission.started,
            &submission.comment,
        )
        .context(JiraSnafu)?;

    let snapshot = if resolved.from_snapshot || ctx.reset {
        let now = services.clock.now();
        match services.config.set_snapshot(now) {
            Ok(()) => SnapshotUpdate::Reset(now),
            Err(e) => SnapshotUpdate::Failed(e),
        }
    } else {
        SnapshotUpdate::Unchanged
    };

    Ok(LogOutcome::Logged {
        submission,
        snapshot,
    })
}
