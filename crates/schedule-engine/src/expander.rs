//! Recurrence expansion -- turns stored task templates into dated occurrences.
//!
//! The query range is inclusive of whole calendar days. Each recurring task is
//! walked forward from its anchor date, either one day at a time (when a
//! weekday filter decides inclusion) or in rule-sized jumps, and every cursor
//! position inside the range that the rule fires on becomes an [`Occurrence`].

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Occurrence, RecurrenceKind, RecurrenceRule, TaskTemplate};
use crate::time::week_start;

/// Hard cap on cursor steps per task. A daily series queried more than about a
/// year past its anchor date is silently truncated.
pub const MAX_ITERATIONS: usize = 365;

/// How a biweekly rule with explicit weekdays advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiweeklyCadence {
    /// Every listed weekday of every week, the same as a weekly rule.
    #[default]
    Weekly,
    /// Listed weekdays only in weeks an even number of weeks from the
    /// anchor's week (weeks start on Monday).
    TwoWeek,
}

/// Tunables for [`expand_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandOptions {
    pub max_iterations: usize,
    pub biweekly_cadence: BiweeklyCadence,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            biweekly_cadence: BiweeklyCadence::default(),
        }
    }
}

/// Expand `tasks` into every occurrence between `range_start` and `range_end`
/// (both inclusive) using the default [`ExpandOptions`].
///
/// Occurrences are ordered by task, then chronologically within a task. Callers
/// that need a cross-task order must sort.
pub fn expand(
    tasks: &[TaskTemplate],
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<Occurrence> {
    expand_with(tasks, range_start, range_end, &ExpandOptions::default())
}

/// Expand `tasks` with explicit options. See [`expand`].
pub fn expand_with(
    tasks: &[TaskTemplate],
    range_start: NaiveDate,
    range_end: NaiveDate,
    options: &ExpandOptions,
) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();
    for task in tasks {
        expand_task_into(task, range_start, range_end, options, &mut occurrences);
    }
    occurrences
}

/// Expand a single task. Tasks with an unparseable anchor date yield nothing.
pub fn expand_task(
    task: &TaskTemplate,
    range_start: NaiveDate,
    range_end: NaiveDate,
    options: &ExpandOptions,
) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();
    expand_task_into(task, range_start, range_end, options, &mut occurrences);
    occurrences
}

fn expand_task_into(
    task: &TaskTemplate,
    range_start: NaiveDate,
    range_end: NaiveDate,
    options: &ExpandOptions,
    out: &mut Vec<Occurrence>,
) {
    let Some(anchor) = task.anchor_date() else {
        debug!(task_id = %task.id, date = %task.date, "skipping task with unparseable date");
        return;
    };
    let rule = &task.recurrence;

    if rule.kind == RecurrenceKind::None {
        if range_start <= anchor && anchor <= range_end {
            out.push(Occurrence::from_template(task, anchor, anchor));
        }
        return;
    }

    let mut cursor = anchor;
    let mut iterations = 0;
    while cursor <= range_end && iterations < options.max_iterations {
        iterations += 1;

        if cursor >= range_start && fires_on(rule, anchor, cursor, options) {
            out.push(Occurrence::from_template(task, cursor, anchor));
        }

        match next_cursor(rule, cursor) {
            Some(next) => cursor = next,
            None => return,
        }
    }

    if cursor <= range_end {
        debug!(
            task_id = %task.id,
            iterations,
            stopped_at = %cursor,
            "recurrence expansion hit the iteration cap"
        );
    }
}

/// Whether a rule includes the cursor date. Without an explicit weekday set
/// every cursor position is a jump point and therefore included.
fn fires_on(
    rule: &RecurrenceRule,
    anchor: NaiveDate,
    cursor: NaiveDate,
    options: &ExpandOptions,
) -> bool {
    if !rule.has_days() {
        return true;
    }
    if !rule.includes_weekday(cursor.weekday()) {
        return false;
    }
    match (rule.kind, options.biweekly_cadence) {
        (RecurrenceKind::Biweekly, BiweeklyCadence::TwoWeek) => {
            let weeks = (week_start(cursor) - week_start(anchor)).num_days() / 7;
            weeks % 2 == 0
        }
        _ => true,
    }
}

/// Advance the cursor by the rule's step. `None` once chrono's date range is exhausted.
fn next_cursor(rule: &RecurrenceRule, cursor: NaiveDate) -> Option<NaiveDate> {
    match rule.kind {
        RecurrenceKind::Weekly if !rule.has_days() => cursor.checked_add_days(Days::new(7)),
        RecurrenceKind::Biweekly if !rule.has_days() => cursor.checked_add_days(Days::new(14)),
        // Month arithmetic clamps to the month end; the clamped day carries forward.
        RecurrenceKind::Monthly => cursor.checked_add_months(Months::new(1)),
        _ => cursor.checked_add_days(Days::new(1)),
    }
}
