use crate::clock::Clock;
use crate::error::resolve_error::{
    InvalidDurationSnafu, MutuallyExclusiveFlagsSnafu, SnapshotDateMismatchSnafu,
};
use crate::error::ResolveError;
use crate::resolve::date::parse_day_month;
use crate::resolve::ResolutionContext;

/// Reject contradictory flag combinations before anything is resolved.
///
/// Rules are checked in order and the first violation is returned.
pub fn validate_flags(ctx: &ResolutionContext, clock: &dyn Clock) -> Result<(), ResolveError> {
    if !ctx.task.is_empty() && !ctx.alias.is_empty() {
        return MutuallyExclusiveFlagsSnafu {
            first: "task",
            second: "alias",
        }
        .fail();
    }
    if ctx.yesterday && !ctx.date.is_empty() {
        return MutuallyExclusiveFlagsSnafu {
            first: "yesterday",
            second: "date",
        }
        .fail();
    }
    // A snapshot duration always ends now.
    if ctx.wants_snapshot() && (ctx.yesterday || !ctx.date.is_empty()) {
        return SnapshotDateMismatchSnafu.fail();
    }
    if ctx.hours < 0 || ctx.minutes < 0 {
        return InvalidDurationSnafu.fail();
    }
    if !ctx.date.is_empty() {
        parse_day_month(&ctx.date, clock)?;
    }
    Ok(())
}
