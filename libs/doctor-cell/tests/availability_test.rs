use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};

use doctor_cell::models::AvailabilityPatternRow;
use doctor_cell::services::availability::{day_grid, AVAILABILITY_HORIZON_DAYS};

fn rule(day_of_week: i16, time_slot_id: i32, start: (u32, u32), end: (u32, u32)) -> AvailabilityPatternRow {
    AvailabilityPatternRow {
        day_of_week,
        time_slot_id,
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn window_is_fifteen_days_inclusive_and_date_ordered() {
    // 2024-01-01 was a Monday
    let from = date(2024, 1, 1);
    let pattern = vec![rule(2, 1, (9, 0), (9, 30))];
    let booked = HashSet::new();

    let days: Vec<_> = day_grid(from, AVAILABILITY_HORIZON_DAYS, &pattern, &booked).collect();

    assert_eq!(days.len(), 15);
    assert_eq!(days.first().unwrap().full_date, "2024-01-01");
    assert_eq!(days.last().unwrap().full_date, "2024-01-15");

    let dates: Vec<&str> = days.iter().map(|d| d.full_date.as_str()).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[test]
fn weekday_without_rules_yields_empty_slot_list_not_error() {
    let from = date(2024, 1, 1);
    // Rules only for Tuesday (day 2)
    let pattern = vec![rule(2, 1, (9, 0), (9, 30))];
    let booked = HashSet::new();

    let days: Vec<_> = day_grid(from, AVAILABILITY_HORIZON_DAYS, &pattern, &booked).collect();

    // Monday the 1st has no rules
    assert!(days[0].time_slots.is_empty());
    // Tuesday the 2nd has exactly the one slot
    assert_eq!(days[1].full_date, "2024-01-02");
    assert_eq!(days[1].time_slots.len(), 1);
    assert_eq!(days[1].time_slots[0].id, 1);
    assert!(days[1].time_slots[0].is_available);
}

#[test]
fn booked_slot_stays_listed_but_flagged_unavailable() {
    let from = date(2024, 1, 1);
    let pattern = vec![rule(2, 1, (9, 0), (9, 30)), rule(2, 2, (9, 30), (10, 0))];

    let mut booked = HashSet::new();
    booked.insert((date(2024, 1, 2), 1));

    let days: Vec<_> = day_grid(from, AVAILABILITY_HORIZON_DAYS, &pattern, &booked).collect();

    let tuesday = &days[1];
    assert_eq!(tuesday.time_slots.len(), 2);
    assert!(!tuesday.time_slots[0].is_available, "booked slot must be flagged");
    assert!(tuesday.time_slots[1].is_available);

    // The following Tuesday is unaffected by the booking on the 2nd
    let next_tuesday = days.iter().find(|d| d.full_date == "2024-01-09").unwrap();
    assert!(next_tuesday.time_slots[0].is_available);
}

#[test]
fn sunday_rules_use_day_seven() {
    // 2024-01-07 was a Sunday
    let from = date(2024, 1, 1);
    let pattern = vec![rule(7, 3, (10, 0), (10, 30))];
    let booked = HashSet::new();

    let days: Vec<_> = day_grid(from, AVAILABILITY_HORIZON_DAYS, &pattern, &booked).collect();

    let sunday = days.iter().find(|d| d.full_date == "2024-01-07").unwrap();
    assert_eq!(sunday.time_slots.len(), 1);
    assert_eq!(sunday.time_slots[0].id, 3);

    // No other weekday picks up the Sunday rule
    let monday = &days[0];
    assert!(monday.time_slots.is_empty());
}

#[test]
fn slots_within_a_day_are_ordered_by_start_time() {
    let from = date(2024, 1, 1);
    // Pattern rows arrive pre-sorted by the query's ORDER BY; the grid must
    // preserve that order.
    let pattern = vec![
        rule(1, 5, (9, 0), (9, 30)),
        rule(1, 9, (11, 0), (11, 30)),
        rule(1, 2, (14, 0), (14, 30)),
    ];
    let booked = HashSet::new();

    let days: Vec<_> = day_grid(from, AVAILABILITY_HORIZON_DAYS, &pattern, &booked).collect();

    let monday = &days[0];
    let starts: Vec<_> = monday
        .time_slots
        .iter()
        .map(|s| s.start_time.clone().unwrap())
        .collect();
    assert_eq!(starts, vec!["9:00 AM", "11:00 AM", "2:00 PM"]);
}

#[test]
fn display_fields_match_calendar_date() {
    let from = date(2024, 1, 1);
    let pattern = vec![];
    let booked = HashSet::new();

    let days: Vec<_> = day_grid(from, AVAILABILITY_HORIZON_DAYS, &pattern, &booked).collect();

    assert_eq!(days[0].date, "01");
    assert_eq!(days[0].day, "Mon");
    assert_eq!(days[0].month, "Jan");
}

#[test]
fn grid_is_restartable() {
    let from = date(2024, 1, 1);
    let pattern = vec![rule(2, 1, (9, 0), (9, 30))];
    let booked = HashSet::new();

    let first: Vec<_> = day_grid(from, AVAILABILITY_HORIZON_DAYS, &pattern, &booked)
        .map(|d| d.full_date)
        .collect();
    let second: Vec<_> = day_grid(from, AVAILABILITY_HORIZON_DAYS, &pattern, &booked)
        .map(|d| d.full_date)
        .collect();

    assert_eq!(first, second);
}
