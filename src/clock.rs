use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};

/// Source of "now" for everything that does date arithmetic.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Attach this clock's time zone to a wall-clock date-time.
    ///
    /// The default keeps the offset `now()` currently reports. Zones with
    /// daylight saving override it so the offset matches the target date.
    fn localize(&self, naive: NaiveDateTime) -> DateTime<FixedOffset> {
        let offset = *self.now().offset();
        attach_offset(naive, offset)
    }
}

/// Wall clock in the machine's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn localize(&self, naive: NaiveDateTime) -> DateTime<FixedOffset> {
        match Local.from_local_datetime(&naive).earliest() {
            Some(dt) => dt.fixed_offset(),
            // Skipped by a DST jump: keep today's offset.
            None => attach_offset(naive, *self.now().offset()),
        }
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// Parse an RFC 3339 timestamp such as `2025-01-04T14:00:00Z`.
    pub fn parse(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(rfc3339).map(Self::new)
    }

    pub fn set(&mut self, now: DateTime<FixedOffset>) {
        self.now = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }
}

fn attach_offset(naive: NaiveDateTime, offset: FixedOffset) -> DateTime<FixedOffset> {
    // A fixed offset maps every wall-clock time to exactly one instant.
    DateTime::from_naive_utc_and_offset(naive - offset, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_returns_parsed_instant() {
        let clock = FixedClock::parse("2025-01-04T14:00:00Z").unwrap();
        assert_eq!(clock.now().to_rfc3339(), "2025-01-04T14:00:00+00:00");
    }

    #[test]
    fn localize_keeps_wall_clock_fields() {
        let clock = FixedClock::parse("2025-01-04T14:00:00+02:00").unwrap();
        let naive = NaiveDate::from_ymd_opt(2025, 5, 12)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let local = clock.localize(naive);
        assert_eq!(local.naive_local(), naive);
        assert_eq!(local.offset().local_minus_utc(), 2 * 3600);
    }
}
