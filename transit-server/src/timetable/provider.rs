//! Timetable provider abstraction.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::domain::{Leg, StationId};

/// Errors from the timetable backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TimetableError {
    /// Backend I/O failed
    #[error("timetable backend error: {message}")]
    Backend { message: String },

    /// Stored timetable data violates an invariant
    #[error("timetable integrity error: {message}")]
    Integrity { message: String },
}

/// Source of next-departure legs for the search.
///
/// For a station and a "not earlier than" instant, an implementation
/// returns at most one leg per distinct next-hop station: the earliest
/// future departure toward that neighbor, with clock times already lifted
/// to absolute instants. An empty result is a normal outcome.
///
/// This abstraction lets the search run against mock timetables in tests.
pub trait TimetableProvider: Send + Sync {
    /// Earliest next leg per neighbor, departing `station` at or after
    /// `not_before`.
    fn next_departures(
        &self,
        station: StationId,
        not_before: DateTime<Tz>,
    ) -> impl std::future::Future<Output = Result<Vec<Leg>, TimetableError>> + Send;
}
