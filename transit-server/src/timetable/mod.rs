//! Timetable access.
//!
//! The `operations` table stores each train hop with dateless clock times;
//! this module answers "earliest next leg per neighbor" queries over it and
//! provides the station lookups the web layer needs.

mod db;
mod provider;
mod select;

pub use db::{DbTimetable, connect};
pub use provider::{TimetableError, TimetableProvider};
pub use select::{TimetableEntry, earliest_per_neighbor};
