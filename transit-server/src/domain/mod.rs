//! Domain types for the transit route search.
//!
//! This module contains the core model types for validated timetable data.
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod clock;
mod error;
mod itinerary;
mod leg;
mod station;

pub use clock::{Clock, ClockError};
pub use error::DomainError;
pub use itinerary::Itinerary;
pub use leg::Leg;
pub use station::{InvalidStationId, Station, StationId, TrainId};
