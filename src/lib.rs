// Crate root library declaration and module exports.
pub mod config;
pub mod context;
pub mod day_index;
pub mod model;
pub mod reactive;
pub mod resource;
pub mod schedule;
pub mod search;
pub mod storage;
pub mod store;
pub mod tabs;
pub mod ticker;
pub mod viewmodel;
