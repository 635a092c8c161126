//! Itinerary type.
//!
//! An `Itinerary` is an ordered, non-empty sequence of legs forming a
//! continuous journey. It carries a derived set of visited stations so the
//! search can reject revisits in O(1).

use std::collections::HashSet;

use chrono::DateTime;
use chrono_tz::Tz;

use super::{DomainError, Leg, StationId};

/// A continuous journey of one or more legs.
///
/// # Invariants
///
/// - Continuity: adjacent legs share a station.
/// - Temporal monotonicity: each leg departs no earlier than the previous
///   leg arrives.
/// - Acyclicity: every station touched by the itinerary is distinct.
#[derive(Debug, Clone)]
pub struct Itinerary {
    legs: Vec<Leg>,
    visited: HashSet<StationId>,
}

impl Itinerary {
    /// Start an itinerary from its first leg.
    pub fn from_first_leg(leg: Leg) -> Self {
        let visited = HashSet::from([leg.depart_station(), leg.arrive_station()]);
        Self {
            legs: vec![leg],
            visited,
        }
    }

    /// Produce a new itinerary extended by one leg, leaving `self` intact.
    ///
    /// The leg list and visited set are copied, so sibling extensions of
    /// the same itinerary stay independent.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the leg does not depart where the itinerary ends,
    /// departs before the last arrival, or arrives at an already-visited
    /// station.
    pub fn extended(&self, leg: Leg) -> Result<Self, DomainError> {
        let last = self.last_leg();

        if leg.depart_station() != last.arrive_station() {
            return Err(DomainError::DiscontinuousLeg {
                expected: last.arrive_station(),
                found: leg.depart_station(),
            });
        }
        if leg.depart_at() < last.arrive_at() {
            return Err(DomainError::NonMonotonicLeg);
        }
        if self.visited.contains(&leg.arrive_station()) {
            return Err(DomainError::RevisitedStation(leg.arrive_station()));
        }

        let mut legs = self.legs.clone();
        let mut visited = self.visited.clone();
        visited.insert(leg.arrive_station());
        legs.push(leg);

        Ok(Self { legs, visited })
    }

    /// Returns true if the itinerary has touched `station`.
    pub fn visits(&self, station: StationId) -> bool {
        self.visited.contains(&station)
    }

    /// Returns the legs in travel order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns the number of legs.
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Returns the final leg.
    pub fn last_leg(&self) -> &Leg {
        // Non-empty by construction
        self.legs.last().expect("itinerary has at least one leg")
    }

    /// Returns the station the itinerary currently ends at.
    pub fn last_station(&self) -> StationId {
        self.last_leg().arrive_station()
    }

    /// Returns the instant the itinerary reaches its final station.
    pub fn final_arrival(&self) -> DateTime<Tz> {
        self.last_leg().arrive_at()
    }

    /// Returns every station id the itinerary touches.
    pub fn stations(&self) -> impl Iterator<Item = StationId> + '_ {
        self.visited.iter().copied()
    }
}
