//! Property-based tests for recurrence expansion using proptest.
//!
//! These tests verify invariants that should hold for *any* task template and
//! query range, not just the specific examples in `expander_tests.rs`.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;
use schedule_engine::model::DayTag;
use schedule_engine::{
    expand, expand_with, BiweeklyCadence, ExpandOptions, OccurrenceId, RecurrenceKind,
    RecurrenceRule, TaskTemplate,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_kind() -> impl Strategy<Value = RecurrenceKind> {
    prop_oneof![
        Just(RecurrenceKind::None),
        Just(RecurrenceKind::Daily),
        Just(RecurrenceKind::Weekly),
        Just(RecurrenceKind::Biweekly),
        Just(RecurrenceKind::Monthly),
    ]
}

fn arb_day() -> impl Strategy<Value = DayTag> {
    prop_oneof![
        Just(DayTag::Mon),
        Just(DayTag::Tue),
        Just(DayTag::Wed),
        Just(DayTag::Thu),
        Just(DayTag::Fri),
        Just(DayTag::Sat),
        Just(DayTag::Sun),
    ]
}

fn arb_rule() -> impl Strategy<Value = RecurrenceRule> {
    (arb_kind(), prop::option::of(prop::collection::vec(arb_day(), 0..4)))
        .prop_map(|(kind, days)| RecurrenceRule { kind, days })
}

/// Anchor dates in 2025-2027. Day is capped at 28 to avoid invalid month/day combos.
fn arb_anchor() -> impl Strategy<Value = NaiveDate> {
    (2025i32..=2027, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn template(id: &str, anchor: NaiveDate, recurrence: RecurrenceRule) -> TaskTemplate {
    TaskTemplate {
        id: id.to_string(),
        title: id.to_string(),
        child_id: "c".to_string(),
        date: anchor.format("%Y-%m-%d").to_string(),
        time: "10:00".to_string(),
        end_time: Some("11:00".to_string()),
        recurrence,
        created_at: None,
        updated_at: None,
    }
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: every occurrence lies in the range and on or after the anchor
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn occurrences_stay_inside_range(
        rule in arb_rule(),
        anchor in arb_anchor(),
        start_offset in -60i64..400,
        length in 0i64..120,
    ) {
        let start = anchor + Duration::days(start_offset);
        let end = start + Duration::days(length);
        let result = expand(&[template("t", anchor, rule)], start, end);

        for o in &result {
            prop_assert!(start <= o.date && o.date <= end, "{} outside {}..{}", o.date, start, end);
            prop_assert!(o.date >= anchor, "{} before anchor {}", o.date, anchor);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: ids are unique and encode the occurrence date
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn ids_are_unique_and_consistent(
        rule in arb_rule(),
        anchor in arb_anchor(),
        start_offset in -30i64..200,
        length in 0i64..90,
    ) {
        let start = anchor + Duration::days(start_offset);
        let end = start + Duration::days(length);
        let result = expand(&[template("t", anchor, rule)], start, end);

        let mut seen = HashSet::new();
        for o in &result {
            let wire = o.id.to_string();
            prop_assert!(seen.insert(wire.clone()), "duplicate id {}", wire);
            prop_assert_eq!(wire.parse::<OccurrenceId>().unwrap(), o.id.clone());
            match &o.id {
                OccurrenceId::Original { template_id } => {
                    prop_assert_eq!(template_id.as_str(), "t");
                    prop_assert_eq!(o.date, anchor);
                }
                OccurrenceId::Generated { template_id, date } => {
                    prop_assert_eq!(template_id.as_str(), "t");
                    prop_assert_eq!(*date, o.date);
                    prop_assert_ne!(o.date, anchor);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: daily yields one occurrence per day within the cap
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn daily_count_matches_range_length(
        anchor in arb_anchor(),
        start_offset in 0i64..200,
        length in 0i64..100,
    ) {
        let start = anchor + Duration::days(start_offset);
        let end = start + Duration::days(length);
        let rule = RecurrenceRule::new(RecurrenceKind::Daily);
        let result = expand(&[template("t", anchor, rule)], start, end);

        prop_assert_eq!(result.len() as i64, length + 1);
        for pair in result.windows(2) {
            prop_assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: weekday-filtered rules only land on listed weekdays
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn weekday_filter_is_respected(
        days in prop::collection::vec(arb_day(), 1..4),
        biweekly in any::<bool>(),
        anchor in arb_anchor(),
        length in 0i64..90,
    ) {
        let kind = if biweekly { RecurrenceKind::Biweekly } else { RecurrenceKind::Weekly };
        let rule = RecurrenceRule::on_days(kind, &days);
        let result = expand(&[template("t", anchor, rule)], anchor, anchor + Duration::days(length));

        for o in &result {
            let tag = DayTag::from(o.date.weekday());
            prop_assert!(days.contains(&tag), "{} not in {:?}", o.date, days);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: the two-week cadence is a subset of the weekly-equivalent one
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn two_week_cadence_is_subset(
        days in prop::collection::vec(arb_day(), 1..4),
        anchor in arb_anchor(),
        length in 0i64..120,
    ) {
        let rule = RecurrenceRule::on_days(RecurrenceKind::Biweekly, &days);
        let tasks = [template("t", anchor, rule)];
        let end = anchor + Duration::days(length);

        let weekly = expand(&tasks, anchor, end);
        let options = ExpandOptions { biweekly_cadence: BiweeklyCadence::TwoWeek, ..ExpandOptions::default() };
        let two_week = expand_with(&tasks, anchor, end, &options);

        prop_assert!(two_week.len() <= weekly.len());
        for o in &two_week {
            prop_assert!(weekly.contains(o));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: expansion is deterministic
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn expansion_is_deterministic(
        rules in prop::collection::vec(arb_rule(), 1..5),
        anchor in arb_anchor(),
        length in 0i64..60,
    ) {
        let tasks: Vec<TaskTemplate> = rules
            .into_iter()
            .enumerate()
            .map(|(i, rule)| template(&format!("t{}", i), anchor, rule))
            .collect();
        let end = anchor + Duration::days(length);
        prop_assert_eq!(expand(&tasks, anchor, end), expand(&tasks, anchor, end));
    }
}
