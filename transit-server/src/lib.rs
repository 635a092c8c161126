//! Transit route search server.
//!
//! A web service that answers: "leaving this station at this time,
//! how do I reach that station?" Routes are searched breadth-first over
//! a relational timetable, with correct handling of trains that cross
//! midnight and of multi-hop transfers.

pub mod config;
pub mod domain;
pub mod planner;
pub mod timetable;
pub mod web;
