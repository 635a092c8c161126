//! Itinerary ranking.

use crate::domain::Itinerary;

/// Rank itineraries ascending by arrival at the final station.
///
/// The sort is stable, so among itineraries arriving at the same instant
/// the search's discovery order is preserved; since the search explores
/// shorter itineraries first, ties favor fewer legs.
pub fn rank_itineraries(mut itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    itineraries.sort_by_key(|itinerary| itinerary.final_arrival());
    itineraries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Leg, StationId, TrainId};
    use chrono::TimeZone;
    use chrono_tz::Asia::Tokyo;

    fn itinerary(train: u32, from: u32, to: u32, dep_min: u32, arr_min: u32) -> Itinerary {
        let leg = Leg::new(
            TrainId(train),
            0,
            StationId::new(from).unwrap(),
            StationId::new(to).unwrap(),
            Tokyo.with_ymd_and_hms(2025, 1, 1, 10, dep_min, 0).unwrap(),
            Tokyo.with_ymd_and_hms(2025, 1, 1, 11, arr_min, 0).unwrap(),
        )
        .unwrap();
        Itinerary::from_first_leg(leg)
    }

    #[test]
    fn orders_by_final_arrival() {
        let late = itinerary(1, 1, 2, 0, 45);
        let early = itinerary(2, 1, 3, 10, 15);
        let middle = itinerary(3, 1, 4, 5, 30);

        let ranked = rank_itineraries(vec![late, early, middle]);

        assert_eq!(ranked[0].last_leg().train_id(), TrainId(2));
        assert_eq!(ranked[1].last_leg().train_id(), TrainId(3));
        assert_eq!(ranked[2].last_leg().train_id(), TrainId(1));
    }

    #[test]
    fn ties_keep_discovery_order() {
        let first = itinerary(1, 1, 2, 0, 30);
        let second = itinerary(2, 1, 3, 5, 30);
        let third = itinerary(3, 1, 4, 10, 30);

        let ranked = rank_itineraries(vec![first, second, third]);

        assert_eq!(ranked[0].last_leg().train_id(), TrainId(1));
        assert_eq!(ranked[1].last_leg().train_id(), TrainId(2));
        assert_eq!(ranked[2].last_leg().train_id(), TrainId(3));
    }

    #[test]
    fn empty_input() {
        assert!(rank_itineraries(vec![]).is_empty());
    }
}
