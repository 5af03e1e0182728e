// File: src/search.rs
// Grouped free-text search over speakers, locations and events.
use crate::model::{Event, Location, Needle, Searchable, Speaker};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchGroup {
    Speakers,
    Events,
}

impl fmt::Display for SearchGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchGroup::Speakers => write!(f, "Speakers"),
            SearchGroup::Events => write!(f, "Events"),
        }
    }
}

/// One row of the search results list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchItem {
    Label(SearchGroup),
    Speaker(Speaker),
    Location(Location),
    Event(Event),
}

/// Builds the search results for `query`.
///
/// Layout: matching speakers under a "Speakers" label, then each matching
/// location followed by every event held there (earliest first), then
/// matching events under an "Events" label. Empty groups are left out and a
/// blank query yields nothing.
///
/// Events listed under a location are all events at that location, not only
/// the ones whose own text matches.
pub fn compute_search(
    query: &str,
    events: &[Event],
    locations: &[Location],
    speakers: &[Speaker],
) -> Vec<SearchItem> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = Needle::new(query);
    let mut results = Vec::new();

    let matched_speakers: Vec<&Speaker> = speakers
        .iter()
        .filter(|s| s.matches(&needle))
        .collect();
    if !matched_speakers.is_empty() {
        results.push(SearchItem::Label(SearchGroup::Speakers));
        results.extend(matched_speakers.into_iter().cloned().map(SearchItem::Speaker));
    }

    for location in locations.iter().filter(|l| l.matches(&needle)) {
        results.push(SearchItem::Location(location.clone()));

        let mut at_location: Vec<&Event> = events
            .iter()
            .filter(|e| e.location.name == location.name)
            .collect();
        // Stable: events sharing a start time keep their input order.
        at_location.sort_by_key(|e| e.start);
        results.extend(at_location.into_iter().cloned().map(SearchItem::Event));
    }

    let matched_events: Vec<&Event> = events
        .iter()
        .filter(|e| e.matches(&needle))
        .collect();
    if !matched_events.is_empty() {
        results.push(SearchItem::Label(SearchGroup::Events));
        results.extend(matched_events.into_iter().cloned().map(SearchItem::Event));
    }

    log::debug!("Search '{}' produced {} rows", query, results.len());
    results
}
