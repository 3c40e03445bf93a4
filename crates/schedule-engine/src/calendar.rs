//! Day, week and month helpers around expanded occurrences: filtering by day
//! and child, month-cell counts and the date ranges each view queries.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::Occurrence;
use crate::time::week_start;

/// Which children's occurrences a view shows.
///
/// On the wire this is `"all"` or a child id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChildFilter {
    #[default]
    All,
    Child(String),
}

impl ChildFilter {
    pub fn matches(&self, occurrence: &Occurrence) -> bool {
        match self {
            ChildFilter::All => true,
            ChildFilter::Child(id) => occurrence.child_id == *id,
        }
    }
}

impl From<String> for ChildFilter {
    fn from(value: String) -> Self {
        if value == "all" {
            ChildFilter::All
        } else {
            ChildFilter::Child(value)
        }
    }
}

impl From<ChildFilter> for String {
    fn from(filter: ChildFilter) -> Self {
        match filter {
            ChildFilter::All => "all".to_string(),
            ChildFilter::Child(id) => id,
        }
    }
}

/// Day tab of the daily view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayFilter {
    #[default]
    Today,
    Tomorrow,
}

impl DayFilter {
    pub fn resolve(self, today: NaiveDate) -> NaiveDate {
        match self {
            DayFilter::Today => today,
            DayFilter::Tomorrow => today.succ_opt().unwrap_or(today),
        }
    }
}

/// The three dashboard layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl ViewMode {
    /// Inclusive date range a view expands for the given anchor day.
    pub fn range(self, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            ViewMode::Daily => (anchor, anchor),
            ViewMode::Weekly => {
                let start = week_start(anchor);
                (start, add_days(start, 6))
            }
            ViewMode::Monthly => {
                let weeks = month_grid(anchor);
                match (weeks.first(), weeks.last()) {
                    (Some(first), Some(last)) => (first[0], last[6]),
                    _ => (anchor, anchor),
                }
            }
        }
    }
}

/// Occurrences on `date` that pass `filter`, in input order.
pub fn occurrences_on(
    occurrences: &[Occurrence],
    date: NaiveDate,
    filter: &ChildFilter,
) -> Vec<Occurrence> {
    occurrences
        .iter()
        .filter(|o| o.date == date && filter.matches(o))
        .cloned()
        .collect()
}

/// Occurrences on `date` that pass `filter`, ordered by start time.
///
/// The order compares the `HH:mm` strings lexically, which is chronological for
/// zero-padded times. The sort is stable.
pub fn agenda_for(
    occurrences: &[Occurrence],
    date: NaiveDate,
    filter: &ChildFilter,
) -> Vec<Occurrence> {
    let mut day = occurrences_on(occurrences, date, filter);
    day.sort_by(|a, b| a.time.cmp(&b.time));
    day
}

/// Number of occurrences per date that pass `filter`.
pub fn count_by_day(occurrences: &[Occurrence], filter: &ChildFilter) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for occurrence in occurrences.iter().filter(|o| filter.matches(o)) {
        *counts.entry(occurrence.date).or_insert(0) += 1;
    }
    counts
}

/// The seven days starting at `start`.
pub fn week_days(start: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| add_days(start, i as u64))
}

/// Monday-start weeks covering the whole month containing `day`.
pub fn month_grid(day: NaiveDate) -> Vec<[NaiveDate; 7]> {
    let Some(first) = day.with_day(1) else {
        return Vec::new();
    };
    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);

    let mut weeks = Vec::new();
    let mut cursor = week_start(first);
    while cursor <= last {
        weeks.push(week_days(cursor));
        match cursor.checked_add_days(Days::new(7)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    weeks
}

/// One cell of the month view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub count: usize,
}

/// Month grid annotated with per-day counts for `filter`.
pub fn month_cells(
    day: NaiveDate,
    occurrences: &[Occurrence],
    filter: &ChildFilter,
) -> Vec<[MonthCell; 7]> {
    let counts = count_by_day(occurrences, filter);
    month_grid(day)
        .into_iter()
        .map(|week| {
            week.map(|date| MonthCell {
                date,
                in_month: date.month() == day.month() && date.year() == day.year(),
                count: counts.get(&date).copied().unwrap_or(0),
            })
        })
        .collect()
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}
