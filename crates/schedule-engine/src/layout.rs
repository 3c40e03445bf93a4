//! Column packing for one day's occurrences.
//!
//! Occurrences whose `[time, endTime)` intervals overlap are placed in
//! side-by-side columns. Packing is greedy first-fit over occurrences sorted by
//! start time; the [`PackingPolicy`] decides whether the column count is shared
//! by the whole day or scoped to each cluster of overlapping occurrences.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calendar::ViewMode;
use crate::model::{Occurrence, OccurrenceId};
use crate::time::Interval;

/// How `total_columns` is scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingPolicy {
    /// One packing across the whole day; every occurrence reports the day's
    /// column count.
    #[default]
    Global,
    /// Each cluster of chained overlaps is packed on its own and reports its
    /// own column count.
    Clustered,
}

impl PackingPolicy {
    /// The policy each view uses: single-day grids pack globally, the week
    /// grid packs per cluster.
    pub fn for_view(view: ViewMode) -> Self {
        match view {
            ViewMode::Weekly => PackingPolicy::Clustered,
            ViewMode::Daily | ViewMode::Monthly => PackingPolicy::Global,
        }
    }
}

/// Lane of one occurrence within its packing scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnAssignment {
    pub column: usize,
    pub total_columns: usize,
}

impl Default for ColumnAssignment {
    fn default() -> Self {
        Self {
            column: 0,
            total_columns: 1,
        }
    }
}

impl ColumnAssignment {
    pub fn width_percent(&self) -> f64 {
        100.0 / self.total_columns.max(1) as f64
    }

    pub fn left_percent(&self) -> f64 {
        self.column as f64 * self.width_percent()
    }
}

/// Assign a column to every occurrence, keyed by occurrence id.
///
/// When two occurrences share an id, the one packed later wins.
pub fn assign_columns(
    occurrences: &[Occurrence],
    policy: PackingPolicy,
) -> HashMap<OccurrenceId, ColumnAssignment> {
    let intervals: Vec<Interval> = occurrences.iter().map(Occurrence::interval).collect();
    let mut result = HashMap::with_capacity(occurrences.len());
    for (index, assignment) in pack_intervals(&intervals, policy) {
        result.insert(occurrences[index].id.clone(), assignment);
    }
    result
}

/// Assign columns to raw intervals. The result is indexed like the input.
pub fn assign_interval_columns(intervals: &[Interval], policy: PackingPolicy) -> Vec<ColumnAssignment> {
    let mut result = vec![ColumnAssignment::default(); intervals.len()];
    for (index, assignment) in pack_intervals(intervals, policy) {
        result[index] = assignment;
    }
    result
}

/// Pack intervals and return `(input index, assignment)` pairs in packing order.
fn pack_intervals(intervals: &[Interval], policy: PackingPolicy) -> Vec<(usize, ColumnAssignment)> {
    // Stable: ties keep input order.
    let mut sorted: Vec<usize> = (0..intervals.len()).collect();
    sorted.sort_by_key(|&i| intervals[i].start);

    let clusters = match policy {
        PackingPolicy::Global => vec![sorted],
        PackingPolicy::Clustered => split_clusters(&sorted, intervals),
    };

    let mut assignments = Vec::with_capacity(intervals.len());
    for cluster in clusters.iter().filter(|c| !c.is_empty()) {
        let columns = pack_first_fit(cluster, intervals);
        let total_columns = columns.len();
        trace!(size = cluster.len(), total_columns, "packed cluster");
        for (column, members) in columns.iter().enumerate() {
            for &index in members {
                assignments.push((
                    index,
                    ColumnAssignment {
                        column,
                        total_columns,
                    },
                ));
            }
        }
    }
    assignments
}

/// Split start-sorted indices into maximal runs where each start falls before
/// the running maximum end of the run.
fn split_clusters(sorted: &[usize], intervals: &[Interval]) -> Vec<Vec<usize>> {
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut cluster_end = 0;

    for &index in sorted {
        let interval = intervals[index];
        match clusters.last_mut() {
            Some(cluster) if interval.start < cluster_end => {
                cluster.push(index);
                cluster_end = cluster_end.max(interval.end);
            }
            _ => {
                clusters.push(vec![index]);
                cluster_end = interval.end;
            }
        }
    }
    clusters
}

/// Greedy first-fit: each interval goes into the first column none of whose
/// members it overlaps, else into a new column.
fn pack_first_fit(members: &[usize], intervals: &[Interval]) -> Vec<Vec<usize>> {
    let mut columns: Vec<Vec<usize>> = Vec::new();
    for &index in members {
        let interval = intervals[index];
        let slot = columns
            .iter()
            .position(|column| column.iter().all(|&other| !intervals[other].overlaps(&interval)));
        match slot {
            Some(column) => columns[column].push(index),
            None => columns.push(vec![index]),
        }
    }
    columns
}
