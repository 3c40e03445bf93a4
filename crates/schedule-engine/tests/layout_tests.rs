//! Tests for column packing of overlapping occurrences.

use chrono::NaiveDate;
use schedule_engine::calendar::ViewMode;
use schedule_engine::layout::assign_interval_columns;
use schedule_engine::time::Interval;
use schedule_engine::{
    assign_columns, ColumnAssignment, Occurrence, OccurrenceId, PackingPolicy, RecurrenceRule,
};

/// Helper to create an occurrence on a fixed day with the given wall-clock span.
fn occ(id: &str, time: &str, end_time: Option<&str>) -> Occurrence {
    Occurrence {
        id: OccurrenceId::Original {
            template_id: id.to_string(),
        },
        title: id.to_string(),
        child_id: "child-1".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        time: time.to_string(),
        end_time: end_time.map(str::to_string),
        recurrence: RecurrenceRule::none(),
        created_at: None,
        updated_at: None,
    }
}

fn column_of(
    map: &std::collections::HashMap<OccurrenceId, ColumnAssignment>,
    id: &str,
) -> (usize, usize) {
    let key: OccurrenceId = id.parse().unwrap();
    let a = map[&key];
    (a.column, a.total_columns)
}

#[test]
fn overlapping_pair_gets_two_columns() {
    let day = vec![
        occ("a", "09:00", Some("10:00")),
        occ("b", "09:30", Some("10:30")),
    ];
    for policy in [PackingPolicy::Global, PackingPolicy::Clustered] {
        let map = assign_columns(&day, policy);
        assert_eq!(column_of(&map, "a"), (0, 2));
        assert_eq!(column_of(&map, "b"), (1, 2));
    }
}

#[test]
fn separate_occurrence_width_depends_on_policy() {
    let day = vec![
        occ("a", "09:00", Some("10:00")),
        occ("b", "09:30", Some("10:30")),
        occ("c", "11:00", Some("12:00")),
    ];

    let global = assign_columns(&day, PackingPolicy::Global);
    assert_eq!(column_of(&global, "c"), (0, 2));

    let clustered = assign_columns(&day, PackingPolicy::Clustered);
    assert_eq!(column_of(&clustered, "a"), (0, 2));
    assert_eq!(column_of(&clustered, "b"), (1, 2));
    assert_eq!(column_of(&clustered, "c"), (0, 1));
}

#[test]
fn back_to_back_occurrences_share_column_zero() {
    let day = vec![
        occ("a", "09:00", Some("10:00")),
        occ("b", "10:00", Some("11:00")),
    ];
    for policy in [PackingPolicy::Global, PackingPolicy::Clustered] {
        let map = assign_columns(&day, policy);
        assert_eq!(column_of(&map, "a"), (0, 1));
        assert_eq!(column_of(&map, "b"), (0, 1));
    }
}

#[test]
fn missing_end_time_counts_as_one_hour() {
    let day = vec![occ("a", "09:00", None), occ("b", "09:45", Some("10:15"))];
    let map = assign_columns(&day, PackingPolicy::Global);
    assert_eq!(column_of(&map, "a"), (0, 2));
    assert_eq!(column_of(&map, "b"), (1, 2));
}

#[test]
fn first_fit_reuses_freed_columns() {
    // a spans the morning; b and c are back-to-back beside it.
    let day = vec![
        occ("a", "09:00", Some("12:00")),
        occ("b", "09:00", Some("10:00")),
        occ("c", "10:00", Some("11:00")),
    ];
    let map = assign_columns(&day, PackingPolicy::Global);
    assert_eq!(column_of(&map, "a"), (0, 2));
    assert_eq!(column_of(&map, "b"), (1, 2));
    assert_eq!(column_of(&map, "c"), (1, 2));
}

#[test]
fn chained_overlaps_form_one_cluster() {
    // c does not touch a, but b bridges them.
    let day = vec![
        occ("a", "09:00", Some("11:00")),
        occ("b", "10:00", Some("12:00")),
        occ("c", "11:30", Some("12:30")),
        occ("d", "13:00", Some("14:00")),
    ];
    let map = assign_columns(&day, PackingPolicy::Clustered);
    assert_eq!(column_of(&map, "a"), (0, 2));
    assert_eq!(column_of(&map, "b"), (1, 2));
    assert_eq!(column_of(&map, "c"), (0, 2));
    assert_eq!(column_of(&map, "d"), (0, 1));
}

#[test]
fn global_total_is_the_days_maximum() {
    let day = vec![
        occ("a", "09:00", Some("10:00")),
        occ("b", "09:30", Some("10:30")),
        occ("c", "09:45", Some("10:15")),
        occ("d", "14:00", Some("15:00")),
    ];
    let global = assign_columns(&day, PackingPolicy::Global);
    assert_eq!(column_of(&global, "c"), (2, 3));
    assert_eq!(column_of(&global, "d"), (0, 3));

    let clustered = assign_columns(&day, PackingPolicy::Clustered);
    assert_eq!(column_of(&clustered, "d"), (0, 1));
}

#[test]
fn input_order_does_not_matter_except_for_ties() {
    let day = vec![
        occ("late", "09:30", Some("10:30")),
        occ("early", "09:00", Some("10:00")),
    ];
    let map = assign_columns(&day, PackingPolicy::Global);
    assert_eq!(column_of(&map, "early"), (0, 2));
    assert_eq!(column_of(&map, "late"), (1, 2));

    let tied = vec![
        occ("first", "09:00", Some("10:00")),
        occ("second", "09:00", Some("10:00")),
    ];
    let map = assign_columns(&tied, PackingPolicy::Global);
    assert_eq!(column_of(&map, "first"), (0, 2));
    assert_eq!(column_of(&map, "second"), (1, 2));
}

#[test]
fn empty_day_has_no_assignments() {
    assert!(assign_columns(&[], PackingPolicy::Global).is_empty());
    assert!(assign_interval_columns(&[], PackingPolicy::Clustered).is_empty());
}

#[test]
fn interval_columns_are_indexed_like_input() {
    let intervals = [
        Interval { start: 600, end: 660 },
        Interval { start: 540, end: 630 },
    ];
    let columns = assign_interval_columns(&intervals, PackingPolicy::Global);
    assert_eq!(columns[0], ColumnAssignment { column: 1, total_columns: 2 });
    assert_eq!(columns[1], ColumnAssignment { column: 0, total_columns: 2 });
}

#[test]
fn each_view_has_its_policy() {
    assert_eq!(PackingPolicy::for_view(ViewMode::Daily), PackingPolicy::Global);
    assert_eq!(PackingPolicy::for_view(ViewMode::Weekly), PackingPolicy::Clustered);
    assert_eq!(PackingPolicy::for_view(ViewMode::Monthly), PackingPolicy::Global);
}

#[test]
fn column_percentages() {
    let a = ColumnAssignment { column: 1, total_columns: 4 };
    assert_eq!(a.width_percent(), 25.0);
    assert_eq!(a.left_percent(), 25.0);
    assert_eq!(ColumnAssignment::default().width_percent(), 100.0);
}
