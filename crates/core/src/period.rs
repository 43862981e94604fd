//! Scoring period arithmetic.
//!
//! A period is one week running Sunday 00:00:00.000000 through Saturday
//! 23:59:59.999999, all in UTC. Check-ins are aggregated per period, so the
//! mapping from a timestamp to its enclosing period must be deterministic
//! and boundary-inclusive on both ends.

use chrono::{Datelike, Duration, NaiveTime};

use crate::types::Timestamp;

/// One Sunday-to-Saturday scoring window.
///
/// `end` is the last representable microsecond of the week (PostgreSQL
/// timestamp resolution), so `start <= ts <= end` holds for every timestamp
/// inside the week, including both boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Period {
    /// The period enclosing `ts`: the most recent Sunday 00:00:00 UTC at or
    /// before `ts`, through the following Saturday 23:59:59.999999.
    pub fn containing(ts: Timestamp) -> Self {
        let days_back = ts.weekday().num_days_from_sunday() as i64;
        let sunday = ts.date_naive() - Duration::days(days_back);
        let start = sunday.and_time(NaiveTime::MIN).and_utc();
        Self::starting_at(start)
    }

    /// Build a period from its Sunday-midnight start instant.
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            start,
            end: start + Duration::days(7) - Duration::microseconds(1),
        }
    }

    /// The period immediately before this one.
    pub fn prev(&self) -> Self {
        Self::starting_at(self.start - Duration::days(7))
    }

    /// The period immediately after this one.
    pub fn next(&self) -> Self {
        Self::starting_at(self.start + Duration::days(7))
    }

    /// The period `weeks` whole weeks away (negative = into the past).
    pub fn offset(&self, weeks: i64) -> Self {
        Self::starting_at(self.start + Duration::days(7 * weeks))
    }

    /// Whether `ts` falls inside this period, boundaries included.
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts <= self.end
    }
}
