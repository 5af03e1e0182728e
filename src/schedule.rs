// File: src/schedule.rs
// Filtering of the conference schedule by type toggles and bookmarks.
use crate::model::{Event, EventType};
use std::collections::HashSet;

/// Ids of bookmarked events.
pub type BookmarkSet = HashSet<i64>;

/// Which type toggles are switched on in the filter UI.
///
/// Held apart from the `EventType` records so the composer only ever reads
/// plain data. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: HashSet<i64>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, type_id: i64) -> bool {
        self.selected.contains(&type_id)
    }

    pub fn set_selected(&mut self, type_id: i64, selected: bool) {
        if selected {
            self.selected.insert(type_id);
        } else {
            self.selected.remove(&type_id);
        }
    }

    /// Flips the toggle and returns the new state.
    pub fn toggle(&mut self, type_id: i64) -> bool {
        let now_selected = !self.selected.remove(&type_id);
        if now_selected {
            self.selected.insert(type_id);
        }
        now_selected
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl FromIterator<i64> for FilterSelection {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}

pub struct ScheduleFilter<'a> {
    pub types: &'a [EventType],
    pub selection: &'a FilterSelection,
    pub bookmarks: &'a BookmarkSet,
}

impl ScheduleFilter<'_> {
    /// True when the bookmark pseudo-type exists and is switched on.
    pub fn requires_bookmark(&self) -> bool {
        self.types
            .iter()
            .find(|t| t.is_bookmark)
            .is_some_and(|t| self.selection.is_selected(t.id))
    }

    /// Ids of the real (non-bookmark) types that are switched on.
    pub fn active_type_ids(&self) -> HashSet<i64> {
        self.types
            .iter()
            .filter(|t| !t.is_bookmark && self.selection.is_selected(t.id))
            .map(|t| t.id)
            .collect()
    }
}

/// Returns the events to show for the current filter, in input order.
///
/// Nothing switched on means nothing is filtered out. The bookmark toggle on
/// its own keeps bookmarked events. With real types switched on, an event must
/// belong to one of them, and additionally be bookmarked if the bookmark
/// toggle is on too.
pub fn compute_schedule(events: &[Event], filter: ScheduleFilter<'_>) -> Vec<Event> {
    if filter.types.is_empty() {
        return events.to_vec();
    }

    let require_bookmark = filter.requires_bookmark();
    let active = filter.active_type_ids();

    if !require_bookmark && active.is_empty() {
        return events.to_vec();
    }

    if active.is_empty() {
        return events
            .iter()
            .filter(|e| filter.bookmarks.contains(&e.id))
            .cloned()
            .collect();
    }

    events
        .iter()
        .filter(|e| {
            let bookmark_ok = !require_bookmark || filter.bookmarks.contains(&e.id);
            bookmark_ok && active.contains(&e.event_type.id)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_state() {
        let mut sel = FilterSelection::new();
        assert!(sel.toggle(3));
        assert!(sel.is_selected(3));
        assert!(!sel.toggle(3));
        assert!(sel.is_empty());
    }

    #[test]
    fn bookmark_type_is_not_an_active_category() {
        let types = vec![
            EventType::bookmark_pseudo_type(1),
            EventType::new(10, 1, "Talk"),
        ];
        let selection: FilterSelection = [crate::model::BOOKMARK_TYPE_ID].into_iter().collect();
        let bookmarks = BookmarkSet::new();
        let filter = ScheduleFilter {
            types: &types,
            selection: &selection,
            bookmarks: &bookmarks,
        };
        assert!(filter.requires_bookmark());
        assert!(filter.active_type_ids().is_empty());
    }
}
