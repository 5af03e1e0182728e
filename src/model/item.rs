// File: ./src/model/item.rs
// Conference entities as stored in the dataset.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Id reserved for the synthetic "Bookmarked" type.
pub const BOOKMARK_TYPE_ID: i64 = -1;
pub const BOOKMARK_TYPE_NAME: &str = "Bookmarked";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conference {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub selected: bool,
}

impl Conference {
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }
}

/// A schedule category. One entry per conference may be the bookmark pseudo-type,
/// which is only ever used as a "bookmarked only" toggle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventType {
    pub id: i64,
    pub conference_id: i64,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub is_bookmark: bool,
}

impl EventType {
    pub fn new(id: i64, conference_id: i64, name: &str) -> Self {
        Self {
            id,
            conference_id,
            name: name.to_string(),
            color: String::new(),
            is_bookmark: false,
        }
    }

    pub fn bookmark_pseudo_type(conference_id: i64) -> Self {
        Self {
            id: BOOKMARK_TYPE_ID,
            conference_id,
            name: BOOKMARK_TYPE_NAME.to_string(),
            color: String::new(),
            is_bookmark: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub conference_id: i64,
    pub name: String,
}

impl Location {
    pub fn new(id: i64, conference_id: i64, name: &str) -> Self {
        Self {
            id,
            conference_id,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub id: i64,
    pub conference_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: Option<String>,
}

impl Speaker {
    pub fn new(id: i64, conference_id: i64, name: &str, description: &str) -> Self {
        Self {
            id,
            conference_id,
            name: name.to_string(),
            description: description.to_string(),
            link: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub conference_id: i64,
    pub name: String,
    #[serde(default)]
    pub text: String,
}

/// A scheduled talk, workshop, party...
///
/// The type and location are embedded by value so an event can be grouped and
/// filtered without another lookup. Bookmarks are tracked by the store, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub conference_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub event_type: EventType,
    pub location: Location,
    #[serde(default)]
    pub speakers: Vec<i64>,
    #[serde(default)]
    pub link: Option<String>,
}

impl Event {
    pub fn new(
        id: i64,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        event_type: EventType,
        location: Location,
    ) -> Self {
        Self {
            id,
            conference_id: event_type.conference_id,
            title: title.to_string(),
            description: String::new(),
            start,
            end,
            event_type,
            location,
            speakers: Vec::new(),
            link: None,
        }
    }

    pub fn has_finished(&self, now: DateTime<Utc>) -> bool {
        self.end <= now
    }
}
