//! Collapsed time-grid geometry for the day and week views.
//!
//! The visible window `[start_hour, end_hour)` is cut into fixed blocks. A block
//! that any occurrence touches is drawn at full slot height; an empty block is
//! collapsed to a thin strip. An occurrence's `top` and `height` are found by
//! interpolating its clamped start and end minutes inside the blocks they fall
//! in, on top of the blocks' cumulative offsets.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::layout::{assign_interval_columns, ColumnAssignment, PackingPolicy};
use crate::model::Occurrence;
use crate::time::{format_minutes, Interval};

/// Dimensions of the visible time grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub start_hour: u32,
    pub end_hour: u32,
    pub block_minutes: u32,
    /// Height of a block that contains at least one occurrence.
    pub slot_height: f64,
    /// Height of an empty block.
    pub collapsed_height: f64,
    /// Floor on a rendered occurrence's height.
    pub min_height: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::daily()
    }
}

impl GridConfig {
    /// Single-day grid.
    pub fn daily() -> Self {
        Self {
            start_hour: 9,
            end_hour: 22,
            block_minutes: 30,
            slot_height: 56.0,
            collapsed_height: 8.0,
            min_height: 24.0,
        }
    }

    /// Seven-column week grid; shorter slots.
    pub fn weekly() -> Self {
        Self {
            slot_height: 48.0,
            min_height: 20.0,
            ..Self::daily()
        }
    }

    /// Check that the configuration describes a usable grid.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidGrid` when the hour window is empty or
    /// past midnight, when `block_minutes` does not evenly divide an hour, or
    /// when a height is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if self.end_hour <= self.start_hour || self.end_hour > 24 {
            return Err(ScheduleError::InvalidGrid(format!(
                "hour window {}..{} is empty or past midnight",
                self.start_hour, self.end_hour
            )));
        }
        if self.block_minutes == 0 || 60 % self.block_minutes != 0 {
            return Err(ScheduleError::InvalidGrid(format!(
                "block_minutes {} must divide 60",
                self.block_minutes
            )));
        }
        for (name, value) in [
            ("slot_height", self.slot_height),
            ("collapsed_height", self.collapsed_height),
            ("min_height", self.min_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScheduleError::InvalidGrid(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn window_start(&self) -> u32 {
        self.start_hour * 60
    }

    pub fn window_end(&self) -> u32 {
        self.end_hour * 60
    }
}

/// One fixed block of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub start: u32,
    pub end: u32,
    pub label: String,
    pub expanded: bool,
    pub offset: f64,
    pub height: f64,
}

/// Vertical placement of one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometry {
    pub top: f64,
    pub height: f64,
}

/// An occurrence with its geometry and column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOccurrence {
    pub occurrence: Occurrence,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(flatten)]
    pub column: ColumnAssignment,
}

/// The grid rows for a set of occurrences, with precomputed offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeGrid {
    pub config: GridConfig,
    pub rows: Vec<GridRow>,
    pub total_height: f64,
}

impl TimeGrid {
    /// Build the grid, expanding every block that one of `occurrences` touches.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidGrid` if `config` fails [`GridConfig::validate`].
    pub fn new(config: GridConfig, occurrences: &[Occurrence]) -> Result<Self> {
        Self::from_intervals(config, occurrences.iter().map(Occurrence::interval))
    }

    /// Build the grid from raw intervals.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidGrid` if `config` fails [`GridConfig::validate`].
    pub fn from_intervals<I>(config: GridConfig, intervals: I) -> Result<Self>
    where
        I: IntoIterator<Item = Interval>,
    {
        config.validate()?;
        let intervals: Vec<Interval> = intervals.into_iter().collect();

        let mut rows = Vec::new();
        let mut offset = 0.0;
        let mut start = config.window_start();
        while start < config.window_end() {
            let end = start + config.block_minutes;
            let expanded = intervals.iter().any(|i| i.overlaps_span(start, end));
            let height = if expanded {
                config.slot_height
            } else {
                config.collapsed_height
            };
            rows.push(GridRow {
                start,
                end,
                label: format_minutes(start),
                expanded,
                offset,
                height,
            });
            offset += height;
            start = end;
        }

        Ok(Self {
            config,
            rows,
            total_height: offset,
        })
    }

    /// Geometry of `occurrence`, or `None` if it lies entirely outside the
    /// visible window.
    pub fn place(&self, occurrence: &Occurrence) -> Option<Geometry> {
        self.place_interval(occurrence.interval())
    }

    pub fn place_interval(&self, interval: Interval) -> Option<Geometry> {
        let clamped_start = interval.start.max(self.config.window_start());
        let clamped_end = interval.end.min(self.config.window_end());
        if clamped_start >= clamped_end {
            return None;
        }

        let block = f64::from(self.config.block_minutes);
        let mut top = 0.0;
        let mut bottom = 0.0;
        for row in &self.rows {
            if clamped_start >= row.start && clamped_start < row.end {
                let ratio = f64::from(clamped_start - row.start) / block;
                top = row.offset + ratio * row.height;
            }
            if clamped_end > row.start && clamped_end <= row.end {
                let ratio = f64::from(clamped_end - row.start) / block;
                bottom = row.offset + ratio * row.height;
            } else if clamped_end > row.end {
                bottom = row.offset + row.height;
            }
        }

        Some(Geometry {
            top,
            height: (bottom - top).max(self.config.min_height),
        })
    }
}

/// Lay out one day: build its grid, pack its columns and place every visible
/// occurrence. Output follows input order; occurrences outside the window are
/// dropped.
///
/// # Errors
/// Returns `ScheduleError::InvalidGrid` if `config` fails [`GridConfig::validate`].
pub fn layout_day(
    config: GridConfig,
    occurrences: &[Occurrence],
    policy: PackingPolicy,
) -> Result<(TimeGrid, Vec<PlacedOccurrence>)> {
    let grid = TimeGrid::new(config, occurrences)?;
    let placed = place_all(&grid, occurrences, policy);
    Ok((grid, placed))
}

/// Lay out several days on one shared grid so their rows line up (week view).
/// Columns are packed per day.
///
/// # Errors
/// Returns `ScheduleError::InvalidGrid` if `config` fails [`GridConfig::validate`].
pub fn layout_days(
    config: GridConfig,
    days: &[Vec<Occurrence>],
    policy: PackingPolicy,
) -> Result<(TimeGrid, Vec<Vec<PlacedOccurrence>>)> {
    let grid = TimeGrid::from_intervals(
        config,
        days.iter().flatten().map(Occurrence::interval),
    )?;
    let placed = days
        .iter()
        .map(|day| place_all(&grid, day, policy))
        .collect();
    Ok((grid, placed))
}

fn place_all(
    grid: &TimeGrid,
    occurrences: &[Occurrence],
    policy: PackingPolicy,
) -> Vec<PlacedOccurrence> {
    let intervals: Vec<Interval> = occurrences.iter().map(Occurrence::interval).collect();
    let columns = assign_interval_columns(&intervals, policy);

    occurrences
        .iter()
        .zip(intervals)
        .zip(columns)
        .filter_map(|((occurrence, interval), column)| {
            grid.place_interval(interval).map(|geometry| PlacedOccurrence {
                occurrence: occurrence.clone(),
                geometry,
                column,
            })
        })
        .collect()
}
