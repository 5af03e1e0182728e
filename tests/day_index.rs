// Tests for day enumeration, schedule rows and scroll anchoring.
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use hackertracker::day_index::{
    ScheduleRow, build_rows, date_position, days_between, first_unfinished, scroll_target,
};
use hackertracker::model::{Conference, Event, EventType, Location};
use hackertracker::tabs::{InfoPage, day_tabs, time_label};

fn at(month: u32, day: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, h, 0, 0).unwrap()
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

fn event(id: i64, start: DateTime<Utc>) -> Event {
    Event::new(
        id,
        &format!("Event {}", id),
        start,
        start + chrono::Duration::hours(1),
        EventType::new(1, 1, "Talk"),
        Location::new(1, 1, "Track 1"),
    )
}

fn conference(start: DateTime<Utc>, end: DateTime<Utc>) -> Conference {
    Conference {
        id: 1,
        code: "CON".to_string(),
        name: "Con".to_string(),
        start,
        end,
        selected: true,
    }
}

#[test]
fn test_days_between_crosses_month() {
    let days = days_between(at(1, 30, 0), at(2, 2, 0));
    assert_eq!(days, vec![at(1, 30, 0), at(1, 31, 0), at(2, 1, 0)]);
}

#[test]
fn test_days_between_crosses_year() {
    let start = Utc.with_ymd_and_hms(2024, 12, 31, 9, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap();
    let days = days_between(start, end);
    assert_eq!(days.len(), 2);
    assert_eq!(days[1], Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap());
}

#[test]
fn test_days_between_empty_when_not_before_end() {
    assert!(days_between(at(3, 1, 0), at(3, 1, 0)).is_empty());
    assert!(days_between(at(3, 2, 0), at(3, 1, 0)).is_empty());
}

#[test]
fn test_day_tabs_include_end() {
    let tabs = day_tabs(&conference(at(1, 30, 0), at(2, 2, 0)));
    let labels: Vec<&str> = tabs.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["Jan 30", "Jan 31", "Feb 1", "Feb 2"]);
    assert_eq!(tabs[3].day, at(2, 2, 0));
}

#[test]
fn test_single_day_conference_has_one_tab() {
    let tabs = day_tabs(&conference(at(5, 4, 0), at(5, 4, 0)));
    assert_eq!(tabs.len(), 1);
}

#[test]
fn test_build_rows_groups_by_day_and_time() {
    let events = vec![
        event(3, at(8, 9, 10)),
        event(1, at(8, 8, 10)),
        event(2, at(8, 8, 10)),
        event(4, at(8, 8, 14)),
    ];
    let rows = build_rows(&events);

    let shape: Vec<String> = rows
        .iter()
        .map(|r| match r {
            ScheduleRow::Day(d) => format!("D{}", d.format("%d")),
            ScheduleRow::Time(t) => format!("T{}", t.format("%H")),
            ScheduleRow::Event(e) => format!("E{}", e.id),
        })
        .collect();
    assert_eq!(
        shape,
        vec!["D08", "T10", "E1", "E2", "T14", "E4", "D09", "T10", "E3"]
    );
}

#[test]
fn test_scroll_target_anchors_on_day_header() {
    let rows = build_rows(&[event(1, at(8, 8, 10)), event(2, at(8, 8, 12))]);
    // rows: Day, Time10, E1, Time12, E2
    assert_eq!(scroll_target(&rows, at(8, 8, 9)), Some(0));
}

#[test]
fn test_scroll_target_anchors_on_time_header() {
    let rows = build_rows(&[event(1, at(8, 8, 10)), event(2, at(8, 8, 12))]);
    // E1 finished at 11:00, so E2 is next; its Time header is at index 3.
    assert_eq!(first_unfinished(&rows, at(8, 8, 11)), Some(4));
    assert_eq!(scroll_target(&rows, at(8, 8, 11)), Some(3));
}

#[test]
fn test_scroll_target_same_time_group() {
    let rows = build_rows(&[
        event(1, at(8, 8, 10)),
        event(2, at(8, 8, 12)),
        event(3, at(8, 8, 12)),
    ]);
    // The second event in a time group still anchors on the group's header.
    let mut shifted = rows.clone();
    if let ScheduleRow::Event(e) = &mut shifted[4] {
        e.end = at(8, 8, 11);
    }
    assert_eq!(scroll_target(&shifted, at(8, 8, 11)), Some(3));
}

#[test]
fn test_scroll_target_next_day() {
    let rows = build_rows(&[event(1, at(8, 8, 10)), event(2, at(8, 9, 10))]);
    // rows: Day8, T, E1, Day9, T, E2
    assert_eq!(scroll_target(&rows, at(8, 8, 20)), Some(3));
}

#[test]
fn test_scroll_target_without_time_header_uses_event() {
    let rows = vec![ScheduleRow::Event(event(1, at(8, 8, 10)))];
    assert_eq!(scroll_target(&rows, at(8, 8, 9)), Some(0));

    let rows = vec![
        ScheduleRow::Day(date(8, 8)),
        ScheduleRow::Event(event(1, at(8, 8, 10))),
    ];
    assert_eq!(scroll_target(&rows, at(8, 8, 9)), Some(1));
}

#[test]
fn test_scroll_target_none_when_all_finished() {
    let rows = build_rows(&[event(1, at(8, 8, 10)), event(2, at(8, 8, 12))]);
    let target = scroll_target(&rows, at(8, 9, 0));
    assert_eq!(target, None);
    assert_ne!(target, Some(0));
}

#[test]
fn test_scroll_target_none_for_empty_list() {
    assert_eq!(scroll_target(&[], at(8, 8, 0)), None);
}

#[test]
fn test_date_position() {
    let rows = build_rows(&[event(1, at(8, 8, 10)), event(2, at(8, 10, 10))]);
    assert_eq!(date_position(&rows, date(8, 8)), Some(0));
    assert_eq!(date_position(&rows, date(8, 10)), Some(3));
}

#[test]
fn test_date_position_not_found() {
    let rows = build_rows(&[event(1, at(8, 8, 10))]);
    assert_eq!(date_position(&rows, date(8, 9)), None);
    assert_eq!(date_position(&[], date(8, 9)), None);
}

#[test]
fn test_info_pages_in_tab_order() {
    let pages = InfoPage::all();
    assert_eq!(pages, vec![InfoPage::Faq, InfoPage::Speakers, InfoPage::Vendors]);
    for (i, page) in pages.into_iter().enumerate() {
        assert_eq!(InfoPage::at(i), page);
    }
    assert_eq!(InfoPage::Faq.to_string(), "FAQ");
}

#[test]
#[should_panic(expected = "Position out of bounds: 3")]
fn test_info_page_out_of_range_is_fatal() {
    InfoPage::at(3);
}

#[test]
fn test_time_label_follows_clock_setting() {
    let afternoon = Utc.with_ymd_and_hms(2025, 8, 8, 14, 5, 0).unwrap();
    assert_eq!(time_label(afternoon, true), "14:05");
    assert_eq!(time_label(afternoon, false), "2:05 PM");

    let morning = Utc.with_ymd_and_hms(2025, 8, 8, 9, 30, 0).unwrap();
    assert_eq!(time_label(morning, true), "09:30");
    assert_eq!(time_label(morning, false), "9:30 AM");

    let midnight = at(8, 9, 0);
    assert_eq!(time_label(midnight, false), "12:00 AM");
}
