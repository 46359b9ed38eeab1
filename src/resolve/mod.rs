//! Decides what to log: which task, how long, and on which day.
//!
//! The pipeline for one `log` invocation is
//! [`validate_flags`] → [`determine_task`] → [`determine_duration`] →
//! [`determine_started`]. Every step is synchronous; the only suspension
//! points are prompts.

pub mod date;
pub mod duration;
pub mod flags;
pub mod task;
pub mod task_key;

pub use date::{determine_started, parse_day_month, subtract_day};
pub use duration::{determine_duration, ResolvedDuration};
pub use flags::validate_flags;
pub use task::determine_task;
pub use task_key::{extract_task_key, TaskKey};

/// Command-line flags relevant to resolving one `log` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    /// Task key or URL containing one.
    pub task: String,
    pub alias: String,
    pub hours: i64,
    pub minutes: i64,
    /// `DD.MM` or `DD-MM` in the current year.
    pub date: String,
    pub yesterday: bool,
    /// Skip confirmation of a branch-derived task key.
    pub force: bool,
    /// Restart the snapshot after a successful log.
    pub reset: bool,
}

impl ResolutionContext {
    /// True when neither hours nor minutes were given, so the duration comes
    /// from the snapshot.
    pub fn wants_snapshot(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }
}
