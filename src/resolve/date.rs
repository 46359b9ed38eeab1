use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Days, FixedOffset, Months, NaiveDate};
use regex::Regex;

use crate::clock::Clock;
use crate::error::resolve_error::{InvalidDateFormatSnafu, InvalidDaySnafu, InvalidMonthSnafu};
use crate::error::ResolveError;
use crate::resolve::ResolutionContext;

static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2})[.-]([0-9]{2})$").expect("day-month pattern is valid")
});

/// Start instant of the worklog: explicit date, yesterday, or now.
///
/// Explicit dates and yesterday keep the current time of day.
pub fn determine_started(
    ctx: &ResolutionContext,
    clock: &dyn Clock,
) -> Result<DateTime<FixedOffset>, ResolveError> {
    let now = clock.now();
    if !ctx.date.is_empty() {
        let (day, month) = parse_day_month(&ctx.date, clock)?;
        let date = NaiveDate::from_ymd_opt(now.year(), month, day)
            .ok_or_else(|| InvalidDaySnafu { day, month }.build())?;
        return Ok(clock.localize(date.and_time(now.time())));
    }
    if ctx.yesterday {
        return Ok(subtract_day(now, clock));
    }
    Ok(now)
}

/// Parse `DD.MM` / `DD-MM` and check it against the calendar of the
/// clock's current year. Returns `(day, month)`.
pub fn parse_day_month(value: &str, clock: &dyn Clock) -> Result<(u32, u32), ResolveError> {
    let Some(caps) = DAY_MONTH_RE.captures(value) else {
        return InvalidDateFormatSnafu { value }.fail();
    };
    let (Ok(day), Ok(month)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
        return InvalidDateFormatSnafu { value }.fail();
    };

    if !(1..=12).contains(&month) {
        return InvalidMonthSnafu { month }.fail();
    }

    let last_day = last_day_of_month(clock.now().year(), month)
        .ok_or_else(|| InvalidMonthSnafu { month }.build())?;
    if day < 1 || day > last_day {
        return InvalidDaySnafu { day, month }.fail();
    }
    Ok((day, month))
}

/// Same wall-clock time one calendar day earlier.
pub fn subtract_day(at: DateTime<FixedOffset>, clock: &dyn Clock) -> DateTime<FixedOffset> {
    let naive = at.naive_local();
    match naive.checked_sub_days(Days::new(1)) {
        Some(yesterday) => clock.localize(yesterday),
        // Only the first representable day has no predecessor.
        None => at,
    }
}

/// First day of the month, plus one month, minus one day.
fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.checked_sub_days(Days::new(1))?;
    Some(last.day())
}
