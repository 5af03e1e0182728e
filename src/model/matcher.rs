// Text matching for the search screen.
//
// Every searchable entity exposes the same primitive: case-insensitive
// substring containment of the raw query over a fixed set of fields.
// Speakers match on name and description, locations on name, events on
// title and description.
//
// Case folding is per character (uppercase, then lowercase) and never
// changes the char count, so "İ" matches the "i" in "istanbul".

use crate::model::item::{Event, Location, Speaker};

fn fold(c: char) -> char {
    let mut upper = c.to_uppercase();
    let up = match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    };
    up.to_lowercase().next().unwrap_or(up)
}

/// A query folded once and reused against every entity of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Needle(Vec<char>);

impl Needle {
    pub fn new(query: &str) -> Self {
        Needle(query.chars().map(fold).collect())
    }

    pub fn found_in(&self, haystack: &str) -> bool {
        if self.0.is_empty() {
            return true;
        }
        let folded: Vec<char> = haystack.chars().map(fold).collect();
        folded.windows(self.0.len()).any(|w| w == self.0.as_slice())
    }
}

/// Implemented by the entities the search composer looks at.
pub trait Searchable {
    fn matches(&self, needle: &Needle) -> bool;

    fn matches_query(&self, query: &str) -> bool {
        self.matches(&Needle::new(query))
    }
}

impl Searchable for Speaker {
    fn matches(&self, needle: &Needle) -> bool {
        needle.found_in(&self.name) || needle.found_in(&self.description)
    }
}

impl Searchable for Location {
    fn matches(&self, needle: &Needle) -> bool {
        needle.found_in(&self.name)
    }
}

impl Searchable for Event {
    fn matches(&self, needle: &Needle) -> bool {
        needle.found_in(&self.title) || needle.found_in(&self.description)
    }
}
