//! Wall-clock and calendar-date helpers shared by the expander and the layout engine.
//!
//! Times are `HH:mm` strings on a naive local day; dates are `YYYY-MM-DD`.
//! Time parsing is lenient: a malformed time degrades to minute `0`.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{Result, ScheduleError};

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Duration assumed when a task has no usable end time.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Convert an `HH:mm` string into minutes since midnight.
///
/// Empty or malformed input (missing colon, non-numeric parts) yields `0`.
pub fn time_to_minutes(time: &str) -> u32 {
    let Some((hours, minutes)) = time.split_once(':') else {
        return 0;
    };
    match (hours.trim().parse::<u32>(), minutes.trim().parse::<u32>()) {
        (Ok(h), Ok(m)) => h.saturating_mul(60).saturating_add(m),
        _ => 0,
    }
}

/// Format minutes since midnight as a zero-padded `HH:mm` label.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse a `YYYY-MM-DD` date, returning `None` for anything else.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Parse a `YYYY-MM-DD` date supplied by a caller that must be valid
/// (query bounds, CLI flags).
///
/// # Errors
/// Returns `ScheduleError::InvalidDate` if the string is not a calendar date.
pub fn parse_date_strict(s: &str) -> Result<NaiveDate> {
    parse_date(s).ok_or_else(|| ScheduleError::InvalidDate(s.to_string()))
}

/// Format a date in the `YYYY-MM-DD` wire format.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// A half-open `[start, end)` span of minutes within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    /// Build the effective interval of a task from its `time` and `endTime`.
    ///
    /// An end that parses to `0` (absent, empty, malformed or `00:00`) falls back
    /// to `start + 60`.
    pub fn of(time: &str, end_time: Option<&str>) -> Self {
        let start = time_to_minutes(time);
        let end = match end_time.map(time_to_minutes) {
            Some(end) if end != 0 => end,
            _ => start.saturating_add(DEFAULT_DURATION_MINUTES),
        };
        Self { start, end }
    }

    /// Half-open overlap test. Back-to-back intervals do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Overlap test against a raw `[start, end)` pair, used for grid blocks.
    pub fn overlaps_span(&self, start: u32, end: u32) -> bool {
        self.start < end && self.end > start
    }
}
