use chrono::{DateTime, TimeZone, Utc};
use hackertracker::model::{Event, EventType, Location, Speaker};
use hackertracker::search::{SearchGroup, SearchItem, compute_search};

fn at(h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 10, h, 0, 0).unwrap()
}

fn event_at(id: i64, title: &str, location: &Location, h: u32) -> Event {
    Event::new(
        id,
        title,
        at(h),
        at(h + 1),
        EventType::new(1, 1, "Talk"),
        location.clone(),
    )
}

fn labels(items: &[SearchItem]) -> Vec<String> {
    items
        .iter()
        .map(|i| match i {
            SearchItem::Label(g) => format!("#{}", g),
            SearchItem::Speaker(s) => format!("s:{}", s.name),
            SearchItem::Location(l) => format!("l:{}", l.name),
            SearchItem::Event(e) => format!("e:{}", e.id),
        })
        .collect()
}

#[test]
fn test_blank_query_is_empty() {
    let hall = Location::new(1, 1, "Hall A");
    let events = vec![event_at(1, "Anything", &hall, 10)];
    let speakers = vec![Speaker::new(1, 1, "Alice", "")];

    assert!(compute_search("", &events, &[hall.clone()], &speakers).is_empty());
    assert!(compute_search("   \t", &events, &[hall], &speakers).is_empty());
}

#[test]
fn test_single_speaker_match() {
    let alice = Speaker::new(1, 1, "Alice", "");
    let results = compute_search("alice", &[], &[], &[alice.clone()]);
    assert_eq!(
        results,
        vec![
            SearchItem::Label(SearchGroup::Speakers),
            SearchItem::Speaker(alice)
        ]
    );
}

#[test]
fn test_speaker_matches_on_description() {
    let speakers = vec![
        Speaker::new(1, 1, "Bob", "Hardware hacker"),
        Speaker::new(2, 1, "Carol", "Lockpicking"),
        Speaker::new(3, 1, "Dave", "HARDWARE and radio"),
    ];
    let results = compute_search("hardware", &[], &[], &speakers);
    assert_eq!(labels(&results), vec!["#Speakers", "s:Bob", "s:Dave"]);
}

#[test]
fn test_location_lists_its_events_by_start_time() {
    let hall = Location::new(1, 1, "Hall A");
    let events = vec![event_at(1, "Late", &hall, 14), event_at(2, "Early", &hall, 9)];

    let results = compute_search("hall a", &events, &[hall.clone()], &[]);
    assert_eq!(
        results,
        vec![
            SearchItem::Location(hall),
            SearchItem::Event(events[1].clone()),
            SearchItem::Event(events[0].clone()),
        ]
    );
}

#[test]
fn test_location_includes_events_that_do_not_match_query() {
    let hall = Location::new(1, 1, "Hall A");
    let other = Location::new(2, 1, "Room 101");
    let events = vec![
        event_at(1, "Opening ceremony", &hall, 9),
        event_at(2, "Badge hacking", &other, 10),
    ];

    let results = compute_search("hall", &events, &[hall, other], &[]);
    assert_eq!(labels(&results), vec!["l:Hall A", "e:1"]);
}

#[test]
fn test_location_events_matched_by_name_not_id() {
    let hall = Location::new(1, 1, "Hall A");
    let same_name = Location::new(7, 1, "Hall A");
    let events = vec![event_at(1, "Keynote", &same_name, 9)];

    let results = compute_search("hall", &events, &[hall], &[]);
    assert_eq!(labels(&results), vec!["l:Hall A", "e:1"]);
}

#[test]
fn test_equal_start_times_keep_input_order_under_location() {
    let hall = Location::new(1, 1, "Hall A");
    let events = vec![
        event_at(3, "B", &hall, 11),
        event_at(1, "A", &hall, 10),
        event_at(2, "C", &hall, 10),
    ];
    let results = compute_search("hall", &events, &[hall], &[]);
    assert_eq!(labels(&results), vec!["l:Hall A", "e:1", "e:2", "e:3"]);
}

#[test]
fn test_group_order_is_fixed() {
    let stage = Location::new(1, 1, "Main Stage");
    let track = Location::new(2, 1, "Track 2");
    let events = vec![
        event_at(10, "Stage diving for hackers", &track, 12),
        event_at(11, "Lunch", &stage, 11),
    ];
    let speakers = vec![Speaker::new(1, 1, "Stacy", "")];

    let results = compute_search("sta", &events, &[track, stage], &speakers);
    assert_eq!(
        labels(&results),
        vec![
            "#Speakers",
            "s:Stacy",
            "l:Main Stage",
            "e:11",
            "#Events",
            "e:10"
        ]
    );
}

#[test]
fn test_empty_groups_are_omitted() {
    let hall = Location::new(1, 1, "Hall A");
    let events = vec![event_at(1, "Firmware reversing", &hall, 9)];
    let speakers = vec![Speaker::new(1, 1, "Alice", "")];

    let results = compute_search("firmware", &events, &[hall], &speakers);
    assert_eq!(labels(&results), vec!["#Events", "e:1"]);

    let results = compute_search("nothing matches", &events, &[], &speakers);
    assert!(results.is_empty());
}

#[test]
fn test_event_matches_on_description_case_insensitively() {
    let hall = Location::new(1, 1, "Hall A");
    let mut e = event_at(1, "Workshop", &hall, 9);
    e.description = "Bring your own SDR".to_string();

    let results = compute_search("sdr", &[e], &[], &[]);
    assert_eq!(labels(&results), vec!["#Events", "e:1"]);
}

#[test]
fn test_event_can_appear_twice() {
    // Under its matching location, and again as a matching event.
    let hall = Location::new(1, 1, "Hall A");
    let events = vec![event_at(1, "Hall A tour", &hall, 9)];
    let results = compute_search("hall", &events, &[hall], &[]);
    assert_eq!(labels(&results), vec!["l:Hall A", "e:1", "#Events", "e:1"]);
}
