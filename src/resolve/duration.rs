use chrono::TimeDelta;

use crate::clock::Clock;
use crate::config::ConfigStore;
use crate::error::resolve_error::{
    InvalidDurationSnafu, NoSnapshotSnafu, OperationAbortedSnafu, PromptSnafu,
};
use crate::error::ResolveError;
use crate::prompt::Prompter;
use crate::resolve::ResolutionContext;
use snafu::ResultExt;

/// Durations above this many whole hours need confirmation.
pub const CONFIRM_ABOVE_HOURS: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDuration {
    pub duration: TimeDelta,
    /// Measured from the snapshot, which should restart once logged.
    pub from_snapshot: bool,
}

/// Duration to log: the explicit hours/minutes, otherwise time elapsed
/// since the snapshot.
pub fn determine_duration(
    ctx: &ResolutionContext,
    config: &dyn ConfigStore,
    prompter: &mut dyn Prompter,
    clock: &dyn Clock,
) -> Result<ResolvedDuration, ResolveError> {
    let resolved = if ctx.wants_snapshot() {
        let Some(snapshot) = config.snapshot() else {
            return NoSnapshotSnafu.fail();
        };
        let duration = clock.now() - snapshot;
        tracing::debug!(%snapshot, minutes = duration.num_minutes(), "duration from snapshot");
        ResolvedDuration {
            duration,
            from_snapshot: true,
        }
    } else {
        // Flag values too large for a TimeDelta cannot be logged.
        let duration = ctx
            .hours
            .checked_mul(60)
            .and_then(|m| m.checked_add(ctx.minutes))
            .and_then(TimeDelta::try_minutes)
            .ok_or_else(|| InvalidDurationSnafu.build())?;
        ResolvedDuration {
            duration,
            from_snapshot: false,
        }
    };

    if resolved.duration < TimeDelta::zero() {
        return InvalidDurationSnafu.fail();
    }

    let hours = resolved.duration.num_hours();
    if hours > CONFIRM_ABOVE_HOURS {
        let minutes = resolved.duration.num_minutes() % 60;
        let proceed = prompter
            .ask_yes_no(&format!(
                "Are you sure you want to log {hours} hours and {minutes} minutes?"
            ))
            .context(PromptSnafu)?;
        if !proceed {
            return OperationAbortedSnafu.fail();
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::{MemoryConfig, UserConfig};
    use crate::prompt::ScriptedPrompter;
    use chrono::DateTime;

    fn clock() -> FixedClock {
        FixedClock::parse("2025-01-04T14:00:00Z").unwrap()
    }

    fn with_snapshot(rfc3339: &str) -> MemoryConfig {
        MemoryConfig::new(UserConfig {
            snapshot: Some(DateTime::parse_from_rfc3339(rfc3339).unwrap()),
            ..UserConfig::default()
        })
    }

    fn flags(hours: i64, minutes: i64) -> ResolutionContext {
        ResolutionContext {
            hours,
            minutes,
            ..ResolutionContext::default()
        }
    }

    #[test]
    fn hours_and_minutes_flags() {
        let config = MemoryConfig::default();
        let mut prompter = ScriptedPrompter::new();
        for (h, m, expected) in [(1, 0, 60), (0, 45, 45), (2, 45, 165), (0, 120, 120)] {
            let resolved =
                determine_duration(&flags(h, m), &config, &mut prompter, &clock()).unwrap();
            assert_eq!(resolved.duration, TimeDelta::minutes(expected));
            assert!(!resolved.from_snapshot);
        }
        assert_eq!(prompter.prompt_count(), 0);
    }

    #[test]
    fn oversized_flags_are_invalid() {
        let mut prompter = ScriptedPrompter::new();
        for (h, m) in [(200_000_000_000_000, 0), (i64::MAX, 0), (0, i64::MAX), (1, i64::MAX)] {
            let err = determine_duration(&flags(h, m), &MemoryConfig::default(), &mut prompter, &clock())
                .unwrap_err();
            assert!(matches!(err, ResolveError::InvalidDuration { .. }));
        }
        assert_eq!(prompter.prompt_count(), 0);
    }

    #[test]
    fn no_flags_and_no_snapshot() {
        let err = determine_duration(
            &flags(0, 0),
            &MemoryConfig::default(),
            &mut ScriptedPrompter::new(),
            &clock(),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::NoSnapshot { .. }));
    }

    #[test]
    fn elapsed_since_snapshot() {
        let resolved = determine_duration(
            &flags(0, 0),
            &with_snapshot("2025-01-04T13:00:00Z"),
            &mut ScriptedPrompter::new(),
            &clock(),
        )
        .unwrap();
        assert_eq!(resolved.duration, TimeDelta::hours(1));
        assert!(resolved.from_snapshot);
    }

    #[test]
    fn snapshot_equal_to_now_is_zero_without_prompt() {
        let mut prompter = ScriptedPrompter::new();
        let resolved = determine_duration(
            &flags(0, 0),
            &with_snapshot("2025-01-04T14:00:00Z"),
            &mut prompter,
            &clock(),
        )
        .unwrap();
        assert_eq!(resolved.duration, TimeDelta::zero());
        assert_eq!(prompter.prompt_count(), 0);
    }

    #[test]
    fn nine_hour_snapshot_approved() {
        let mut prompter = ScriptedPrompter::new().with_approvals([true]);
        let resolved = determine_duration(
            &flags(0, 0),
            &with_snapshot("2025-01-04T05:00:00Z"),
            &mut prompter,
            &clock(),
        )
        .unwrap();
        assert_eq!(resolved.duration, TimeDelta::hours(9));
        assert!(resolved.from_snapshot);
        assert_eq!(
            prompter.asked,
            vec!["Are you sure you want to log 9 hours and 0 minutes?".to_string()]
        );
    }

    #[test]
    fn nine_hour_snapshot_declined() {
        let mut prompter = ScriptedPrompter::new().with_approvals([false]);
        let err = determine_duration(
            &flags(0, 0),
            &with_snapshot("2025-01-04T05:00:00Z"),
            &mut prompter,
            &clock(),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::OperationAborted { .. }));
    }

    #[test]
    fn nine_hour_flag_declined() {
        let mut prompter = ScriptedPrompter::new().with_approvals([false]);
        let err = determine_duration(&flags(9, 0), &MemoryConfig::default(), &mut prompter, &clock())
            .unwrap_err();
        assert!(matches!(err, ResolveError::OperationAborted { .. }));
    }

    #[test]
    fn eight_hours_fifty_nine_is_not_guarded() {
        let mut prompter = ScriptedPrompter::new();
        let resolved =
            determine_duration(&flags(8, 59), &MemoryConfig::default(), &mut prompter, &clock())
                .unwrap();
        assert_eq!(resolved.duration, TimeDelta::minutes(539));
        assert_eq!(prompter.prompt_count(), 0);
    }

    #[test]
    fn prompt_error_propagates() {
        // No queued approval: the scripted prompter reports empty input.
        let err = determine_duration(
            &flags(10, 0),
            &MemoryConfig::default(),
            &mut ScriptedPrompter::new(),
            &clock(),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::Prompt { .. }));
    }

    #[test]
    fn snapshot_in_the_future_is_invalid() {
        let err = determine_duration(
            &flags(0, 0),
            &with_snapshot("2025-01-04T15:00:00Z"),
            &mut ScriptedPrompter::new(),
            &clock(),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidDuration { .. }));
    }
}
