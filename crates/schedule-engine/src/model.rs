//! Task templates, recurrence rules and the occurrences derived from them.
//!
//! The wire format is the camelCase JSON the app's backend stores
//! (`childId`, `endTime`, `recurrence.type`, `recurrence.days`).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScheduleError;
use crate::time::{format_date, parse_date, Interval};

/// Weekday tag as stored in `recurrence.days`.
///
/// Unrecognized tags deserialize to [`DayTag::Unknown`], which matches no weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayTag {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
    #[serde(other)]
    Unknown,
}

impl DayTag {
    pub fn weekday(self) -> Option<Weekday> {
        match self {
            DayTag::Mon => Some(Weekday::Mon),
            DayTag::Tue => Some(Weekday::Tue),
            DayTag::Wed => Some(Weekday::Wed),
            DayTag::Thu => Some(Weekday::Thu),
            DayTag::Fri => Some(Weekday::Fri),
            DayTag::Sat => Some(Weekday::Sat),
            DayTag::Sun => Some(Weekday::Sun),
            DayTag::Unknown => None,
        }
    }

    pub fn matches(self, weekday: Weekday) -> bool {
        self.weekday() == Some(weekday)
    }
}

impl From<Weekday> for DayTag {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayTag::Mon,
            Weekday::Tue => DayTag::Tue,
            Weekday::Wed => DayTag::Wed,
            Weekday::Thu => DayTag::Thu,
            Weekday::Fri => DayTag::Fri,
            Weekday::Sat => DayTag::Sat,
            Weekday::Sun => DayTag::Sun,
        }
    }
}

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    #[default]
    None,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

/// A task's recurrence rule.
///
/// `days` only matters for weekly and biweekly rules; it is ignored otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecurrenceRule {
    #[serde(rename = "type", default)]
    pub kind: RecurrenceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<DayTag>>,
}

impl RecurrenceRule {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(kind: RecurrenceKind) -> Self {
        Self { kind, days: None }
    }

    pub fn on_days(kind: RecurrenceKind, days: &[DayTag]) -> Self {
        Self {
            kind,
            days: Some(days.to_vec()),
        }
    }

    /// True when the rule carries an explicit, non-empty weekday set that
    /// applies to its kind.
    pub fn has_days(&self) -> bool {
        matches!(self.kind, RecurrenceKind::Weekly | RecurrenceKind::Biweekly)
            && self.days.as_ref().is_some_and(|d| !d.is_empty())
    }

    /// Whether `weekday` is one of the rule's explicit days.
    pub fn includes_weekday(&self, weekday: Weekday) -> bool {
        self.days
            .as_ref()
            .is_some_and(|days| days.iter().any(|d| d.matches(weekday)))
    }
}

/// The stored, canonical task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub child_id: String,
    /// Anchor date as stored (`YYYY-MM-DD`). Kept raw; see [`TaskTemplate::anchor_date`].
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default)]
    pub recurrence: RecurrenceRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl TaskTemplate {
    /// The parsed anchor date, or `None` when the stored date is malformed.
    pub fn anchor_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn interval(&self) -> Interval {
        Interval::of(&self.time, self.end_time.as_deref())
    }
}

/// Identity of an occurrence.
///
/// The first instance of a series keeps the template's id; every other instance
/// is identified by the template id plus its date. On the wire this is the
/// string `{template_id}` or `{template_id}_{YYYY-MM-DD}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OccurrenceId {
    Original { template_id: String },
    Generated { template_id: String, date: NaiveDate },
}

impl OccurrenceId {
    pub fn template_id(&self) -> &str {
        match self {
            OccurrenceId::Original { template_id } | OccurrenceId::Generated { template_id, .. } => {
                template_id
            }
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, OccurrenceId::Generated { .. })
    }
}

impl fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccurrenceId::Original { template_id } => f.write_str(template_id),
            OccurrenceId::Generated { template_id, date } => {
                write!(f, "{}_{}", template_id, format_date(*date))
            }
        }
    }
}

impl FromStr for OccurrenceId {
    type Err = ScheduleError;

    /// Parse the wire string. A suffix after the first `_` must be a date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('_') {
            None => Ok(OccurrenceId::Original {
                template_id: s.to_string(),
            }),
            Some((base, suffix)) => {
                let date = parse_date(suffix).ok_or_else(|| {
                    ScheduleError::InvalidInput(format!("occurrence id with non-date suffix: {}", s))
                })?;
                Ok(OccurrenceId::Generated {
                    template_id: base.to_string(),
                    date,
                })
            }
        }
    }
}

impl Serialize for OccurrenceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OccurrenceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Recover the base template id from an occurrence id string.
///
/// Everything before the first `_`; the whole string when there is none.
pub fn base_id(occurrence_id: &str) -> &str {
    occurrence_id
        .split_once('_')
        .map_or(occurrence_id, |(base, _)| base)
}

/// One concrete, dated instance of a task. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: OccurrenceId,
    pub title: String,
    pub child_id: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default)]
    pub recurrence: RecurrenceRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Occurrence {
    /// Instantiate `task` on `date`. The anchor date keeps the template id.
    pub fn from_template(task: &TaskTemplate, date: NaiveDate, anchor: NaiveDate) -> Self {
        let id = if date == anchor {
            OccurrenceId::Original {
                template_id: task.id.clone(),
            }
        } else {
            OccurrenceId::Generated {
                template_id: task.id.clone(),
                date,
            }
        };
        Self {
            id,
            title: task.title.clone(),
            child_id: task.child_id.clone(),
            date,
            time: task.time.clone(),
            end_time: task.end_time.clone(),
            recurrence: task.recurrence.clone(),
            created_at: task.created_at.clone(),
            updated_at: task.updated_at.clone(),
        }
    }

    pub fn template_id(&self) -> &str {
        self.id.template_id()
    }

    pub fn interval(&self) -> Interval {
        Interval::of(&self.time, self.end_time.as_deref())
    }
}
