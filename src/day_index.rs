// Day boundaries and scroll positions for the chronological schedule list.
//
// The rendered schedule is a flat list: a Day header whenever the calendar
// date changes, a Time header whenever the start time changes, then the
// events themselves. Tabs jump to Day headers; on load and on every clock
// tick the list is anchored on the first event that has not finished yet.
//
// Day stepping uses chrono calendar-day arithmetic on UTC instants, so there
// is no daylight-saving adjustment.

use crate::model::Event;
use chrono::{DateTime, Days, NaiveDate, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleRow {
    Day(NaiveDate),
    Time(DateTime<Utc>),
    Event(Event),
}

impl ScheduleRow {
    pub fn as_event(&self) -> Option<&Event> {
        match self {
            ScheduleRow::Event(e) => Some(e),
            _ => None,
        }
    }
}

/// Instants from `start` (inclusive), one calendar day apart, strictly before `end`.
///
/// `end` itself is never included; callers that want an inclusive range
/// append it (see [`crate::tabs::day_tabs`]).
pub fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let mut days = Vec::new();
    let mut current = start;
    while current < end {
        days.push(current);
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

/// Lays events out as Day / Time / Event rows, ordered by start time.
/// Events with equal start times keep their relative order.
pub fn build_rows(events: &[Event]) -> Vec<ScheduleRow> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| e.start);

    let mut rows = Vec::with_capacity(sorted.len() * 2);
    let mut current_day: Option<NaiveDate> = None;
    let mut current_time: Option<DateTime<Utc>> = None;

    for event in sorted {
        let day = event.start.date_naive();
        if current_day != Some(day) {
            rows.push(ScheduleRow::Day(day));
            current_day = Some(day);
            current_time = None;
        }
        if current_time != Some(event.start) {
            rows.push(ScheduleRow::Time(event.start));
            current_time = Some(event.start);
        }
        rows.push(ScheduleRow::Event(event.clone()));
    }
    rows
}

/// Index of the first event in `rows` that has not finished at `now`.
pub fn first_unfinished(rows: &[ScheduleRow], now: DateTime<Utc>) -> Option<usize> {
    rows.iter()
        .position(|r| r.as_event().is_some_and(|e| !e.has_finished(now)))
}

/// Where to scroll so the next relevant event is visible with its headers.
///
/// Anchors on the Time header above the first unfinished event, or on the Day
/// header right above that Time header. Returns `None` when every event has
/// finished or the list is empty.
pub fn scroll_target(rows: &[ScheduleRow], now: DateTime<Utc>) -> Option<usize> {
    let event_idx = first_unfinished(rows, now)?;

    let time_idx = rows[..event_idx]
        .iter()
        .rposition(|r| matches!(r, ScheduleRow::Time(_)));

    let target = match time_idx {
        Some(t) if t > 0 && matches!(rows[t - 1], ScheduleRow::Day(_)) => t - 1,
        Some(t) => t,
        None => event_idx,
    };
    Some(target)
}

/// Index of the Day header for `date`, if the schedule has one.
pub fn date_position(rows: &[ScheduleRow], date: NaiveDate) -> Option<usize> {
    rows.iter()
        .position(|r| matches!(r, ScheduleRow::Day(d) if *d == date))
}
