//! Earliest-next-leg selection.
//!
//! The backend stores dateless clock times, so "the next train" cannot be
//! answered by comparing raw clocks: at 23:55 a 23:50 departure is five
//! minutes gone but also the next one tomorrow night. Selection therefore
//! orders candidates by waiting time on a 24-hour dial, then lifts the
//! winners' clocks onto absolute instants.

use std::collections::HashMap;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use crate::domain::{Clock, Leg, StationId, TrainId};

use super::provider::TimetableError;

/// One row of the `operations` table, clocks still as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableEntry {
    /// Train identifier.
    pub train_id: u32,

    /// Position within the train's stop sequence.
    pub order: u32,

    /// Departure station id.
    pub depart_station: u32,

    /// Departure time-of-day, "HH:MM:SS".
    pub depart_clock: String,

    /// Arrival station id.
    pub arrive_station: u32,

    /// Arrival time-of-day, "HH:MM:SS".
    pub arrive_clock: String,
}

/// A parsed candidate departure with its computed wait.
struct Candidate {
    train_id: TrainId,
    order: u32,
    depart_station: StationId,
    arrive_station: StationId,
    depart_clock: Clock,
    arrive_clock: Clock,
    wait: Duration,
}

/// Pick, per distinct next-hop station, the single earliest departing leg
/// at or after `not_before`, and lift its clocks to absolute instants.
///
/// Ties on wait are broken by lowest train id, then lowest stop order.
/// The result is sorted by departure instant (then arrival station id)
/// so callers observe a deterministic order.
///
/// Entries not departing from `station` are ignored; rows with malformed
/// clocks, a zero station id, or equal departure and arrival clocks are
/// data-integrity errors.
pub fn earliest_per_neighbor(
    entries: &[TimetableEntry],
    station: StationId,
    not_before: DateTime<Tz>,
) -> Result<Vec<Leg>, TimetableError> {
    let reference_tod = not_before.time();

    // Minimum-wait candidate per next-hop station.
    let mut best: HashMap<StationId, Candidate> = HashMap::new();

    for entry in entries {
        let depart_station = StationId::new(entry.depart_station).map_err(integrity)?;
        if depart_station != station {
            continue;
        }
        let arrive_station = StationId::new(entry.arrive_station).map_err(integrity)?;

        let depart_clock = Clock::parse(&entry.depart_clock).map_err(integrity)?;
        let arrive_clock = Clock::parse(&entry.arrive_clock).map_err(integrity)?;
        if depart_clock == arrive_clock {
            return Err(TimetableError::Integrity {
                message: format!(
                    "train {} order {} departs and arrives at the same clock {}",
                    entry.train_id, entry.order, depart_clock
                ),
            });
        }

        let candidate = Candidate {
            train_id: TrainId(entry.train_id),
            order: entry.order,
            depart_station,
            arrive_station,
            depart_clock,
            arrive_clock,
            wait: depart_clock.wait_from(reference_tod),
        };

        let replace = match best.get(&arrive_station) {
            Some(incumbent) => beats(&candidate, incumbent),
            None => true,
        };
        if replace {
            best.insert(arrive_station, candidate);
        }
    }

    let mut legs = Vec::with_capacity(best.len());
    for candidate in best.into_values() {
        let depart_at = candidate
            .depart_clock
            .next_on_or_after(not_before)
            .map_err(integrity)?;
        let arrive_at = candidate
            .arrive_clock
            .next_on_or_after(depart_at)
            .map_err(integrity)?;

        let leg = Leg::new(
            candidate.train_id,
            candidate.order,
            candidate.depart_station,
            candidate.arrive_station,
            depart_at,
            arrive_at,
        )
        .map_err(integrity)?;

        legs.push(leg);
    }

    legs.sort_by_key(|leg| (leg.depart_at(), leg.arrive_station()));
    Ok(legs)
}

/// Ordering for candidates toward the same neighbor: shortest wait wins,
/// then lowest train id, then lowest stop order.
fn beats(challenger: &Candidate, incumbent: &Candidate) -> bool {
    (challenger.wait, challenger.train_id, challenger.order)
        < (incumbent.wait, incumbent.train_id, incumbent.order)
}

fn integrity(err: impl std::fmt::Display) -> TimetableError {
    TimetableError::Integrity {
        message: err.to_string(),
    }
}
