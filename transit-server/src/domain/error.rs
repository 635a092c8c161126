//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from backend/IO errors.

use super::StationId;

/// Domain-level errors for leg and itinerary validation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Leg endpoints are the same station
    #[error("leg departs and arrives at the same station {0}")]
    DegenerateLeg(StationId),

    /// Leg arrival is not after its departure
    #[error("leg arrival must be after departure")]
    NonPositiveLegDuration,

    /// A single leg spans more than a day
    #[error("leg duration exceeds 24 hours")]
    OverlongLeg,

    /// Extension leg does not start where the itinerary ends
    #[error("leg departs from {found}, itinerary ends at {expected}")]
    DiscontinuousLeg {
        expected: StationId,
        found: StationId,
    },

    /// Extension leg departs before the itinerary's last arrival
    #[error("leg departs before the itinerary's last arrival")]
    NonMonotonicLeg,

    /// Extension leg returns to a station the itinerary already touched
    #[error("leg revisits station {0}")]
    RevisitedStation(StationId),
}
