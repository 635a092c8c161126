//! Train leg type.
//!
//! A `Leg` is one train running between two consecutive stops, with its
//! clock times already lifted to absolute instants.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use super::{DomainError, StationId, TrainId};

/// One train between two consecutive stops.
///
/// `(train_id, order)` identifies the leg uniquely within the timetable.
/// Times are validated at construction.
///
/// # Invariants
///
/// - `depart_station != arrive_station`
/// - `depart_at < arrive_at`
/// - `arrive_at - depart_at <= 24h`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    train_id: TrainId,
    order: u32,
    depart_station: StationId,
    arrive_station: StationId,
    depart_at: DateTime<Tz>,
    arrive_at: DateTime<Tz>,
}

impl Leg {
    /// Construct a leg, validating the station and time invariants.
    pub fn new(
        train_id: TrainId,
        order: u32,
        depart_station: StationId,
        arrive_station: StationId,
        depart_at: DateTime<Tz>,
        arrive_at: DateTime<Tz>,
    ) -> Result<Self, DomainError> {
        if depart_station == arrive_station {
            return Err(DomainError::DegenerateLeg(depart_station));
        }
        if arrive_at <= depart_at {
            return Err(DomainError::NonPositiveLegDuration);
        }
        if arrive_at - depart_at > Duration::days(1) {
            return Err(DomainError::OverlongLeg);
        }

        Ok(Leg {
            train_id,
            order,
            depart_station,
            arrive_station,
            depart_at,
            arrive_at,
        })
    }

    /// Returns the train this leg belongs to.
    pub fn train_id(&self) -> TrainId {
        self.train_id
    }

    /// Returns the leg's position in the train's stop sequence.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Returns the departure station.
    pub fn depart_station(&self) -> StationId {
        self.depart_station
    }

    /// Returns the arrival station.
    pub fn arrive_station(&self) -> StationId {
        self.arrive_station
    }

    /// Returns the absolute departure instant.
    pub fn depart_at(&self) -> DateTime<Tz> {
        self.depart_at
    }

    /// Returns the absolute arrival instant.
    pub fn arrive_at(&self) -> DateTime<Tz> {
        self.arrive_at
    }

    /// Returns the riding time.
    pub fn duration(&self) -> Duration {
        self.arrive_at - self.depart_at
    }
}
