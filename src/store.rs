// File: src/store.rs
// In-memory conference data with change-notifying, per-conference queries.
use crate::context::SharedContext;
use crate::model::{Article, Conference, Event, EventType, Location, Speaker};
use crate::reactive::Observable;
use crate::schedule::BookmarkSet;
use crate::storage::{Dataset, LocalStorage};
use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;

/// What the view model needs from the data layer.
///
/// Every query is scoped to one conference and keeps emitting as the
/// underlying data changes. A query fails when the conference is unknown.
pub trait ConferenceSource {
    /// The conference currently selected, `None` until one is resolved.
    fn conference(&self) -> Observable<Option<Conference>>;
    fn events(&self, conference_id: i64) -> Result<Observable<Vec<Event>>>;
    fn types(&self, conference_id: i64) -> Result<Observable<Vec<EventType>>>;
    fn locations(&self, conference_id: i64) -> Result<Observable<Vec<Location>>>;
    fn speakers(&self, conference_id: i64) -> Result<Observable<Vec<Speaker>>>;
    fn articles(&self, conference_id: i64) -> Result<Observable<Vec<Article>>>;
    fn bookmarks(&self) -> Observable<BookmarkSet>;
    /// Flips the bookmark on an event and returns whether it is now bookmarked.
    fn toggle_bookmark(&self, event_id: i64) -> Result<bool>;
}

#[derive(Clone)]
struct Queries {
    events: Observable<Vec<Event>>,
    types: Observable<Vec<EventType>>,
    locations: Observable<Vec<Location>>,
    speakers: Observable<Vec<Speaker>>,
    articles: Observable<Vec<Article>>,
}

pub struct ConferenceStore {
    data: RefCell<Dataset>,
    conference: Observable<Option<Conference>>,
    bookmarks: Observable<BookmarkSet>,
    queries: RefCell<HashMap<i64, Queries>>,
    ctx: Option<SharedContext>,
}

impl Default for ConferenceStore {
    fn default() -> Self {
        Self::new(Dataset::default(), BookmarkSet::new())
    }
}

impl ConferenceStore {
    /// A store that keeps bookmarks in memory only.
    pub fn new(dataset: Dataset, bookmarks: BookmarkSet) -> Self {
        let selected = Self::resolve_selected(&dataset);
        Self {
            data: RefCell::new(dataset),
            conference: Observable::new(selected),
            bookmarks: Observable::new(bookmarks),
            queries: RefCell::new(HashMap::new()),
            ctx: None,
        }
    }

    /// Loads the dataset and bookmarks through `ctx`; bookmark changes are written back.
    pub fn load(ctx: SharedContext) -> Result<Self> {
        let dataset = LocalStorage::load_dataset(ctx.as_ref())?;
        let bookmarks = LocalStorage::load_bookmarks(ctx.as_ref());
        let mut store = Self::new(dataset, bookmarks);
        store.ctx = Some(ctx);
        Ok(store)
    }

    fn resolve_selected(dataset: &Dataset) -> Option<Conference> {
        dataset
            .conferences
            .iter()
            .find(|c| c.selected)
            .or_else(|| dataset.conferences.first())
            .cloned()
    }

    pub fn conferences(&self) -> Vec<Conference> {
        self.data.borrow().conferences.clone()
    }

    /// Marks the conference with `code` as selected. Returns false if there is none.
    pub fn select_conference(&self, code: &str) -> bool {
        let selected = {
            let mut data = self.data.borrow_mut();
            if !data.conferences.iter().any(|c| c.code == code) {
                return false;
            }
            for c in data.conferences.iter_mut() {
                c.selected = c.code == code;
            }
            Self::resolve_selected(&data)
        };
        log::info!("Selected conference '{}'", code);
        self.conference.set(selected);
        true
    }

    /// Replaces everything, as after a sync, and refreshes every live query.
    pub fn replace_dataset(&self, dataset: Dataset) {
        let selected = Self::resolve_selected(&dataset);
        *self.data.borrow_mut() = dataset;
        self.refresh_queries();

        let changed = self.conference.with(|current| current != &selected);
        if changed {
            self.conference.set(selected);
        }
    }

    /// Updates an existing event or adds it if missing.
    pub fn update_or_add_event(&self, event: Event) {
        let conference_id = event.conference_id;
        {
            let mut data = self.data.borrow_mut();
            if let Some(idx) = data.events.iter().position(|e| e.id == event.id) {
                data.events[idx] = event;
            } else {
                data.events.push(event);
            }
        }
        let live = self
            .queries
            .borrow()
            .get(&conference_id)
            .map(|q| q.events.clone());
        if let Some(events) = live {
            events.set(self.events_for(conference_id));
        }
    }

    pub fn get_event(&self, event_id: i64) -> Option<Event> {
        self.data
            .borrow()
            .events
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
    }

    pub fn is_bookmarked(&self, event_id: i64) -> bool {
        self.bookmarks.with(|b| b.contains(&event_id))
    }

    fn has_conference(&self, conference_id: i64) -> bool {
        self.data
            .borrow()
            .conferences
            .iter()
            .any(|c| c.id == conference_id)
    }

    fn events_for(&self, conference_id: i64) -> Vec<Event> {
        self.data
            .borrow()
            .events
            .iter()
            .filter(|e| e.conference_id == conference_id)
            .cloned()
            .collect()
    }

    /// Real types of the conference, with the bookmark pseudo-type in front
    /// unless the dataset already carries one.
    fn types_for(&self, conference_id: i64) -> Vec<EventType> {
        let data = self.data.borrow();
        let mut types: Vec<EventType> = data
            .types
            .iter()
            .filter(|t| t.conference_id == conference_id)
            .cloned()
            .collect();
        if !types.is_empty() && !types.iter().any(|t| t.is_bookmark) {
            types.insert(0, EventType::bookmark_pseudo_type(conference_id));
        }
        types
    }

    fn locations_for(&self, conference_id: i64) -> Vec<Location> {
        self.data
            .borrow()
            .locations
            .iter()
            .filter(|l| l.conference_id == conference_id)
            .cloned()
            .collect()
    }

    fn speakers_for(&self, conference_id: i64) -> Vec<Speaker> {
        self.data
            .borrow()
            .speakers
            .iter()
            .filter(|s| s.conference_id == conference_id)
            .cloned()
            .collect()
    }

    fn articles_for(&self, conference_id: i64) -> Vec<Article> {
        self.data
            .borrow()
            .articles
            .iter()
            .filter(|a| a.conference_id == conference_id)
            .cloned()
            .collect()
    }

    /// Re-emits every open query. Queries of conferences no longer in the
    /// dataset are closed; their handles stop receiving updates.
    fn refresh_queries(&self) {
        let known: Vec<i64> = self.data.borrow().conferences.iter().map(|c| c.id).collect();
        self.queries.borrow_mut().retain(|id, _| {
            let keep = known.contains(id);
            if !keep {
                log::debug!("Closing queries for removed conference {}", id);
            }
            keep
        });

        // Clone the handles first so listeners can query the store again while we emit.
        let live: Vec<(i64, Queries)> = self
            .queries
            .borrow()
            .iter()
            .map(|(id, q)| (*id, q.clone()))
            .collect();

        for (id, q) in live {
            q.events.set(self.events_for(id));
            q.types.set(self.types_for(id));
            q.locations.set(self.locations_for(id));
            q.speakers.set(self.speakers_for(id));
            q.articles.set(self.articles_for(id));
        }
    }

    fn with_queries<T>(&self, conference_id: i64, pick: impl FnOnce(&Queries) -> T) -> Result<T> {
        if !self.has_conference(conference_id) {
            anyhow::bail!("Unknown conference id {}", conference_id);
        }
        if let Some(q) = self.queries.borrow().get(&conference_id) {
            return Ok(pick(q));
        }

        log::debug!("Opening queries for conference {}", conference_id);
        let q = Queries {
            events: Observable::new(self.events_for(conference_id)),
            types: Observable::new(self.types_for(conference_id)),
            locations: Observable::new(self.locations_for(conference_id)),
            speakers: Observable::new(self.speakers_for(conference_id)),
            articles: Observable::new(self.articles_for(conference_id)),
        };
        let picked = pick(&q);
        self.queries.borrow_mut().insert(conference_id, q);
        Ok(picked)
    }
}

impl ConferenceSource for ConferenceStore {
    fn conference(&self) -> Observable<Option<Conference>> {
        self.conference.clone()
    }

    fn events(&self, conference_id: i64) -> Result<Observable<Vec<Event>>> {
        self.with_queries(conference_id, |q| q.events.clone())
    }

    fn types(&self, conference_id: i64) -> Result<Observable<Vec<EventType>>> {
        self.with_queries(conference_id, |q| q.types.clone())
    }

    fn locations(&self, conference_id: i64) -> Result<Observable<Vec<Location>>> {
        self.with_queries(conference_id, |q| q.locations.clone())
    }

    fn speakers(&self, conference_id: i64) -> Result<Observable<Vec<Speaker>>> {
        self.with_queries(conference_id, |q| q.speakers.clone())
    }

    fn articles(&self, conference_id: i64) -> Result<Observable<Vec<Article>>> {
        self.with_queries(conference_id, |q| q.articles.clone())
    }

    fn bookmarks(&self) -> Observable<BookmarkSet> {
        self.bookmarks.clone()
    }

    fn toggle_bookmark(&self, event_id: i64) -> Result<bool> {
        if self.get_event(event_id).is_none() {
            anyhow::bail!("Unknown event id {}", event_id);
        }

        let mut next = self.bookmarks.get();
        let now_bookmarked = if next.remove(&event_id) {
            false
        } else {
            next.insert(event_id);
            true
        };

        if let Some(ctx) = &self.ctx {
            LocalStorage::save_bookmarks(ctx.as_ref(), &next)?;
        }
        log::debug!("Event {} bookmarked: {}", event_id, now_bookmarked);
        self.bookmarks.set(next);
        Ok(now_bookmarked)
    }
}
