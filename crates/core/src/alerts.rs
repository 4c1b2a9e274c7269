//! Whether slot-fetch failures are worth an error-level log entry.
//!
//! Only logging is affected; the doctor's error flag is persisted either way.

use chrono::{DateTime, Datelike, Utc, Weekday};
use chrono_tz::Tz;

pub trait AlertPolicy: Send + Sync {
    fn should_report_errors(&self, now: DateTime<Utc>) -> bool;
}

/// Stays quiet on one day of the week, evaluated in `timezone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietDayPolicy {
    pub quiet_day: Weekday,
    pub timezone: Tz,
}

impl Default for QuietDayPolicy {
    fn default() -> Self {
        Self {
            quiet_day: Weekday::Sun,
            timezone: Tz::UTC,
        }
    }
}

impl QuietDayPolicy {
    pub fn new(quiet_day: Weekday, timezone: Tz) -> Self {
        Self {
            quiet_day,
            timezone,
        }
    }
}

impl AlertPolicy for QuietDayPolicy {
    fn should_report_errors(&self, now: DateTime<Utc>) -> bool {
        now.with_timezone(&self.timezone).weekday() != self.quiet_day
    }
}

/// Never suppresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReport;

impl AlertPolicy for AlwaysReport {
    fn should_report_errors(&self, _now: DateTime<Utc>) -> bool {
        true
    }
}
