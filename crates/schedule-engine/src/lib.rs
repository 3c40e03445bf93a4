//! # schedule-engine
//!
//! Recurrence expansion and time-grid layout for a family schedule.
//!
//! Stored tasks carry an anchor date, a wall-clock `time`/`endTime` and a simple
//! recurrence rule (none, daily, weekly, biweekly, monthly, optionally limited
//! to weekdays). The engine turns them into dated occurrences for a query range
//! and lays one day's occurrences out into non-overlapping columns on a
//! collapsed time grid. Everything here is pure: no I/O, no shared state.
//!
//! ## Modules
//!
//! - [`model`] — task templates, recurrence rules, occurrences and their ids
//! - [`expander`] — templates + date range → occurrences
//! - [`layout`] — column packing of overlapping occurrences
//! - [`grid`] — collapsed time-grid geometry (top/height per occurrence)
//! - [`calendar`] — day/child filtering, week and month helpers
//! - [`time`] — `HH:mm` and `YYYY-MM-DD` parsing, intervals
//! - [`error`] — Error types

pub mod calendar;
pub mod error;
pub mod expander;
pub mod grid;
pub mod layout;
pub mod model;
pub mod time;

pub use calendar::{ChildFilter, DayFilter, ViewMode};
pub use error::ScheduleError;
pub use expander::{expand, expand_with, BiweeklyCadence, ExpandOptions};
pub use grid::{layout_day, layout_days, GridConfig, TimeGrid};
pub use layout::{assign_columns, ColumnAssignment, PackingPolicy};
pub use model::{base_id, Occurrence, OccurrenceId, RecurrenceKind, RecurrenceRule, TaskTemplate};

/// Parse a JSON array of task templates.
///
/// # Errors
/// Returns `ScheduleError::InvalidInput` if the JSON is malformed or a record
/// lacks `id` or `date`.
pub fn parse_tasks_json(json: &str) -> error::Result<Vec<TaskTemplate>> {
    serde_json::from_str(json).map_err(|e| ScheduleError::InvalidInput(format!("tasks JSON: {}", e)))
}

/// Parse a JSON array of occurrences.
///
/// # Errors
/// Returns `ScheduleError::InvalidInput` if the JSON is malformed.
pub fn parse_occurrences_json(json: &str) -> error::Result<Vec<Occurrence>> {
    serde_json::from_str(json)
        .map_err(|e| ScheduleError::InvalidInput(format!("occurrences JSON: {}", e)))
}
