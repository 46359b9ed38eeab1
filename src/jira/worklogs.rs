use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeDelta};

use crate::clock::Clock;
use crate::error::resolve_error::{ConflictingWorklogsFlagsSnafu, TooBigDayRangeSnafu};
use crate::error::ResolveError;

pub const MAX_WORKLOG_DAYS: u32 = 14;

/// Render a duration as `<H>h <M>m`.
pub fn format_time_spent(duration: TimeDelta) -> String {
    format!("{}h {}m", duration.num_hours(), duration.num_minutes() % 60)
}

/// Time logged on one task within one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLog {
    pub task_key: String,
    pub summary: String,
    pub logged_time: TimeDelta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub date: NaiveDate,
    /// Sorted by task key.
    pub worklogs: Vec<TaskLog>,
    pub time_logged: TimeDelta,
}

/// Worklogs grouped by day, oldest day first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggedTime {
    pub days: Vec<Day>,
}

impl LoggedTime {
    /// Add an entry to the day it started on, merging with the same task.
    pub fn add(&mut self, log: TaskLog, started: DateTime<FixedOffset>) {
        let date = started.date_naive();
        let idx = match self.days.binary_search_by(|d| d.date.cmp(&date)) {
            Ok(idx) => idx,
            Err(idx) => {
                self.days.insert(
                    idx,
                    Day {
                        date,
                        worklogs: Vec::new(),
                        time_logged: TimeDelta::zero(),
                    },
                );
                idx
            }
        };

        let day = &mut self.days[idx];
        day.time_logged = day.time_logged + log.logged_time;
        match day
            .worklogs
            .binary_search_by(|w| w.task_key.as_str().cmp(&log.task_key))
        {
            Ok(pos) => {
                let entry = &mut day.worklogs[pos];
                entry.logged_time = entry.logged_time + log.logged_time;
            }
            Err(pos) => day.worklogs.insert(pos, log),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// How far back `worklogs` looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorklogRange {
    Today,
    /// Yesterday and today.
    Yesterday,
    Week,
    Days(u32),
}

impl WorklogRange {
    /// At most one range flag may be given; no flag means today.
    pub fn from_flags(
        today: bool,
        yesterday: bool,
        week: bool,
        days: Option<u32>,
    ) -> Result<Self, ResolveError> {
        let given = [today, yesterday, week, days.is_some()]
            .iter()
            .filter(|set| **set)
            .count();
        if given > 1 {
            return ConflictingWorklogsFlagsSnafu.fail();
        }
        if let Some(days) = days {
            if days > MAX_WORKLOG_DAYS {
                return TooBigDayRangeSnafu {
                    days,
                    max: MAX_WORKLOG_DAYS,
                }
                .fail();
            }
        }
        Ok(match (yesterday, week, days) {
            (true, _, _) => Self::Yesterday,
            (_, true, _) => Self::Week,
            (_, _, Some(days)) => Self::Days(days.max(1)),
            _ => Self::Today,
        })
    }

    /// Number of calendar days covered, today included.
    pub fn day_count(self) -> u32 {
        match self {
            Self::Today => 1,
            Self::Yesterday => 2,
            Self::Week => 7,
            Self::Days(n) => n,
        }
    }

    /// Local midnight of the first day in range.
    pub fn since(self, clock: &dyn Clock) -> DateTime<FixedOffset> {
        let today = clock.now().date_naive();
        let first = today
            .checked_sub_days(Days::new(u64::from(self.day_count().saturating_sub(1))))
            .unwrap_or(today);
        clock.localize(first.and_time(NaiveTime::MIN))
    }
}
