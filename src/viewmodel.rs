// File: src/viewmodel.rs
//! Derived state for the conference screens.
//!
//! The view model follows the source's selected conference: whenever it
//! changes, the per-conference queries are re-opened and every derived value
//! starts over from `Loading` (or `NotInitialized` when there is no
//! conference). The schedule and search results are recomputed from the
//! latest value of all of their inputs whenever any one of them changes.
use crate::day_index::{ScheduleRow, build_rows, date_position, scroll_target};
use crate::model::{Article, Conference, Event, EventType, Location, Speaker};
use crate::reactive::{Observable, Subscription, derive};
use crate::resource::Resource;
use crate::schedule::{BookmarkSet, FilterSelection, ScheduleFilter, compute_schedule};
use crate::search::{SearchItem, compute_search};
use crate::store::ConferenceSource;
use crate::tabs::{DayTab, day_tabs};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use std::cell::RefCell;
use std::rc::Rc;

/// The per-conference values the view model mirrors from the source.
#[derive(Clone)]
struct Collections {
    conference: Observable<Resource<Conference>>,
    events: Observable<Resource<Vec<Event>>>,
    types: Observable<Resource<Vec<EventType>>>,
    locations: Observable<Resource<Vec<Location>>>,
    speakers: Observable<Resource<Vec<Speaker>>>,
    articles: Observable<Resource<Vec<Article>>>,
    selection: Observable<FilterSelection>,
}

impl Collections {
    /// Puts every per-conference collection back to its initial state.
    fn reset(&self, loading: bool) {
        fn fresh<T>(loading: bool) -> Resource<T> {
            if loading {
                Resource::Loading
            } else {
                Resource::NotInitialized
            }
        }
        self.events.set(fresh(loading));
        self.types.set(fresh(loading));
        self.locations.set(fresh(loading));
        self.speakers.set(fresh(loading));
        self.articles.set(fresh(loading));
    }
}

/// Mirrors one source query into `target`, or records the failure.
fn bind_query<T: Clone + 'static>(
    query: Result<Observable<Vec<T>>>,
    target: &Observable<Resource<Vec<T>>>,
) -> Option<Subscription> {
    match query {
        Ok(source) => {
            target.set(Resource::Success(source.get()));
            let target = target.clone();
            Some(source.subscribe(move |items| target.set(Resource::Success(items.clone()))))
        }
        Err(e) => {
            log::warn!("Query failed: {:#}", e);
            target.set(Resource::Error(e.to_string()));
            None
        }
    }
}

fn switch_conference(
    source: &Rc<dyn ConferenceSource>,
    targets: &Collections,
    bindings: &RefCell<Vec<Subscription>>,
    conference: Option<&Conference>,
) {
    // Drop the previous conference's queries before anything is re-emitted.
    let previous = std::mem::take(&mut *bindings.borrow_mut());
    drop(previous);

    let Some(conference) = conference else {
        log::debug!("No conference selected");
        targets.reset(false);
        targets.conference.set(Resource::NotInitialized);
        return;
    };

    let same = targets
        .conference
        .with(|c| c.data().is_some_and(|c| c.id == conference.id));
    if !same {
        targets.selection.set(FilterSelection::new());
    }

    log::info!("Binding conference {} ({})", conference.code, conference.id);
    targets.reset(true);
    targets.conference.set(Resource::Success(conference.clone()));

    let id = conference.id;
    let subs: Vec<Subscription> = [
        bind_query(source.events(id), &targets.events),
        bind_query(source.types(id), &targets.types),
        bind_query(source.locations(id), &targets.locations),
        bind_query(source.speakers(id), &targets.speakers),
        bind_query(source.articles(id), &targets.articles),
    ]
    .into_iter()
    .flatten()
    .collect();
    *bindings.borrow_mut() = subs;
}

pub struct ConferenceViewModel {
    source: Rc<dyn ConferenceSource>,

    pub conference: Observable<Resource<Conference>>,
    pub events: Observable<Resource<Vec<Event>>>,
    pub types: Observable<Resource<Vec<EventType>>>,
    pub locations: Observable<Resource<Vec<Location>>>,
    pub speakers: Observable<Resource<Vec<Speaker>>>,
    pub articles: Observable<Resource<Vec<Article>>>,

    pub schedule: Observable<Resource<Vec<Event>>>,
    pub search: Observable<Vec<SearchItem>>,

    pub query: Observable<String>,
    pub selection: Observable<FilterSelection>,
    bookmarks: Observable<BookmarkSet>,

    // Dropping these detaches every listener this view model registered.
    _wiring: Vec<Subscription>,
}

impl ConferenceViewModel {
    pub fn new(source: Rc<dyn ConferenceSource>) -> Self {
        let targets = Collections {
            conference: Observable::new(Resource::NotInitialized),
            events: Observable::new(Resource::NotInitialized),
            types: Observable::new(Resource::NotInitialized),
            locations: Observable::new(Resource::NotInitialized),
            speakers: Observable::new(Resource::NotInitialized),
            articles: Observable::new(Resource::NotInitialized),
            selection: Observable::new(FilterSelection::new()),
        };
        let schedule = Observable::new(Resource::NotInitialized);
        let search = Observable::new(Vec::new());
        let query = Observable::new(String::new());
        let bookmarks = source.bookmarks();

        let mut wiring = Vec::new();

        wiring.extend(Self::wire_schedule(&schedule, &targets, &bookmarks));
        wiring.extend(Self::wire_search(&search, &targets, &query));

        // Switch-map over the selected conference.
        let bindings: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));
        let conference_source = source.conference();
        switch_conference(
            &source,
            &targets,
            &bindings,
            conference_source.get().as_ref(),
        );
        {
            let source = Rc::clone(&source);
            let targets = targets.clone();
            let bindings = Rc::clone(&bindings);
            wiring.push(conference_source.subscribe(move |conference| {
                switch_conference(&source, &targets, &bindings, conference.as_ref())
            }));
        }

        Self {
            source,
            conference: targets.conference,
            events: targets.events,
            types: targets.types,
            locations: targets.locations,
            speakers: targets.speakers,
            articles: targets.articles,
            schedule,
            search,
            query,
            selection: targets.selection,
            bookmarks,
            _wiring: wiring,
        }
    }

    fn wire_schedule(
        schedule: &Observable<Resource<Vec<Event>>>,
        targets: &Collections,
        bookmarks: &Observable<BookmarkSet>,
    ) -> Vec<Subscription> {
        let conference = targets.conference.clone();
        let events = targets.events.clone();
        let types = targets.types.clone();
        let selection = targets.selection.clone();
        let bookmarks_in = bookmarks.clone();

        derive(
            schedule,
            &[
                &targets.conference,
                &targets.events,
                &targets.types,
                &targets.selection,
                bookmarks,
            ],
            move || {
                let resolved = conference.with(|c| c.map(|_| ()));
                match resolved {
                    Resource::NotInitialized => return Resource::NotInitialized,
                    Resource::Loading => return Resource::Loading,
                    Resource::Error(msg) => return Resource::Error(msg),
                    Resource::Success(()) => {}
                }

                events.with(|events| match events {
                    // Not loaded yet is not the same as loaded-empty.
                    Resource::NotInitialized | Resource::Loading => Resource::Loading,
                    Resource::Error(msg) => Resource::Error(msg.clone()),
                    Resource::Success(events) => types.with(|types| {
                        let types: &[EventType] = types.data().map(Vec::as_slice).unwrap_or_default();
                        selection.with(|selection| {
                            bookmarks_in.with(|bookmarks| {
                                Resource::Success(compute_schedule(
                                    events,
                                    ScheduleFilter {
                                        types,
                                        selection,
                                        bookmarks,
                                    },
                                ))
                            })
                        })
                    }),
                })
            },
        )
    }

    fn wire_search(
        search: &Observable<Vec<SearchItem>>,
        targets: &Collections,
        query: &Observable<String>,
    ) -> Vec<Subscription> {
        let query_in = query.clone();
        let events = targets.events.clone();
        let locations = targets.locations.clone();
        let speakers = targets.speakers.clone();

        derive(
            search,
            &[query, &targets.events, &targets.locations, &targets.speakers],
            move || {
                query_in.with(|query| {
                    events.with(|events| {
                        locations.with(|locations| {
                            speakers.with(|speakers| {
                                compute_search(
                                    query,
                                    events.data().map(Vec::as_slice).unwrap_or_default(),
                                    locations.data().map(Vec::as_slice).unwrap_or_default(),
                                    speakers.data().map(Vec::as_slice).unwrap_or_default(),
                                )
                            })
                        })
                    })
                })
            },
        )
    }

    // --- Commands from the UI ---

    pub fn on_query_text_change(&self, text: &str) {
        self.query.set(text.to_string());
    }

    /// Flips a type toggle (the bookmark pseudo-type included) and returns its new state.
    pub fn toggle_type(&self, type_id: i64) -> bool {
        let mut selection = self.selection.get();
        let now_selected = selection.toggle(type_id);
        self.selection.set(selection);
        now_selected
    }

    pub fn set_type_selected(&self, type_id: i64, selected: bool) {
        self.selection.update(|s| s.set_selected(type_id, selected));
    }

    pub fn clear_filters(&self) {
        self.selection.set(FilterSelection::new());
    }

    pub fn toggle_bookmark(&self, event_id: i64) -> Result<bool> {
        self.source.toggle_bookmark(event_id)
    }

    pub fn is_bookmarked(&self, event_id: i64) -> bool {
        self.bookmarks.with(|b| b.contains(&event_id))
    }

    // --- Queries for the schedule screen ---

    /// The filtered schedule laid out with Day and Time headers, once loaded.
    pub fn schedule_rows(&self) -> Option<Vec<ScheduleRow>> {
        self.schedule.with(|s| s.data().map(|events| build_rows(events)))
    }

    /// Row to scroll to so the next unfinished event is in view.
    pub fn scroll_target(&self, now: DateTime<Utc>) -> Option<usize> {
        let rows = self.schedule_rows()?;
        scroll_target(&rows, now)
    }

    /// Row of the Day header for `date`, if the filtered schedule has one.
    pub fn date_position(&self, date: NaiveDate) -> Option<usize> {
        let rows = self.schedule_rows()?;
        date_position(&rows, date)
    }

    pub fn day_tabs(&self) -> Vec<DayTab> {
        self.conference
            .with(|c| c.data().map(day_tabs).unwrap_or_default())
    }
}
