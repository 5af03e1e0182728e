// File: ./src/model/mod.rs
pub mod item;
pub mod matcher;

pub use item::{
    Article, BOOKMARK_TYPE_ID, BOOKMARK_TYPE_NAME, Conference, Event, EventType, Location, Speaker,
};
pub use matcher::{Needle, Searchable};
