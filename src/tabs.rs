// File: ./src/tabs.rs
// Tab sets: one tab per conference day, and the fixed information pages.
// Also the time labels shown beside schedule rows.
use crate::day_index::days_between;
use crate::model::Conference;
use chrono::{DateTime, Utc};
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTab {
    pub label: String,
    pub day: DateTime<Utc>,
}

/// One tab per day from the conference start through its end, both included.
pub fn day_tabs(conference: &Conference) -> Vec<DayTab> {
    let mut days = days_between(conference.start, conference.end);
    days.push(conference.end);

    days.into_iter()
        .map(|day| DayTab {
            label: day.format("%b %-d").to_string(),
            day,
        })
        .collect()
}

/// Start time as shown next to events: "14:05", or "2:05 PM" on a 12-hour clock.
pub fn time_label(at: DateTime<Utc>, use_24h_clock: bool) -> String {
    if use_24h_clock {
        at.format("%H:%M").to_string()
    } else {
        at.format("%-I:%M %p").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum InfoPage {
    Faq,
    Speakers,
    Vendors,
}

impl InfoPage {
    pub fn all() -> Vec<InfoPage> {
        InfoPage::iter().collect()
    }

    pub fn position(self) -> usize {
        match self {
            InfoPage::Faq => 0,
            InfoPage::Speakers => 1,
            InfoPage::Vendors => 2,
        }
    }

    /// Page shown for the tab at `position`.
    ///
    /// # Panics
    ///
    /// The tab strip is built from [`InfoPage::all`], so any other position is
    /// a bug in the caller.
    pub fn at(position: usize) -> InfoPage {
        InfoPage::iter()
            .find(|page| page.position() == position)
            .unwrap_or_else(|| panic!("Position out of bounds: {}", position))
    }
}

impl fmt::Display for InfoPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoPage::Faq => write!(f, "FAQ"),
            InfoPage::Speakers => write!(f, "Speakers"),
            InfoPage::Vendors => write!(f, "Vendors"),
        }
    }
}
