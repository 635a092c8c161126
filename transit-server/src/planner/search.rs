//! Breadth-first itinerary search.
//!
//! Expands partial itineraries outward from the departure station, one
//! timetable query per frontier entry, until the destination is reached or
//! the frontier is exhausted. Station revisits are forbidden, so the
//! cycle-free itinerary space is finite and the search terminates.

use std::collections::VecDeque;
use std::time::Instant;

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{debug, info, instrument, trace, warn};

use crate::domain::{Itinerary, StationId};
use crate::timetable::{TimetableError, TimetableProvider};

use super::config::SearchConfig;
use super::rank::rank_itineraries;

/// Error from itinerary search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// The timetable backend failed mid-search
    #[error(transparent)]
    Backend(#[from] TimetableError),

    /// Deadline exceeded or search cancelled
    #[error("search cancelled: deadline exceeded")]
    Cancelled,

    /// A provider result violated an itinerary invariant
    #[error("search invariant violated: {0}")]
    Internal(String),
}

/// Request for a departure-time route search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Station the journey starts from.
    pub origin: StationId,

    /// Earliest allowed departure, in the timetable's timezone.
    pub departure: DateTime<Tz>,

    /// Station the journey must reach.
    pub destination: StationId,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(origin: StationId, departure: DateTime<Tz>, destination: StationId) -> Self {
        Self {
            origin,
            departure,
            destination,
        }
    }

    /// Validate the search request.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.origin == self.destination {
            return Err(SearchError::InvalidRequest(
                "origin and destination must differ".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of a route search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Completed itineraries, earliest arrival first, at most
    /// `max_results` of them.
    pub itineraries: Vec<Itinerary>,

    /// Number of frontier expansions performed.
    pub expansions: usize,
}

/// Route searcher over a timetable provider.
pub struct Searcher<'a, P: TimetableProvider> {
    provider: &'a P,
    config: &'a SearchConfig,
}

impl<'a, P: TimetableProvider> Searcher<'a, P> {
    /// Create a new searcher.
    pub fn new(provider: &'a P, config: &'a SearchConfig) -> Self {
        Self { provider, config }
    }

    /// Search for itineraries departing `origin` at or after the requested
    /// instant and arriving at `destination`.
    ///
    /// Expansion is breadth-first: every k-leg itinerary is explored before
    /// any (k+1)-leg one. An itinerary reaching the destination is promoted
    /// and never extended further; a leg arriving at a station the
    /// itinerary already touched is discarded. A provider failure aborts
    /// the whole search; an empty result is a normal outcome.
    #[instrument(skip(self, request), fields(
        origin = %request.origin,
        destination = %request.destination,
    ))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        request.validate()?;

        let deadline = Instant::now() + self.config.deadline();
        info!(departure = %request.departure, "starting route search");

        check_deadline(deadline)?;
        let seed_legs = self
            .provider
            .next_departures(request.origin, request.departure)
            .await?;
        debug!(seeds = seed_legs.len(), "seeded frontier");

        let mut frontier: VecDeque<Itinerary> = seed_legs
            .into_iter()
            .map(Itinerary::from_first_leg)
            .collect();

        let mut completed = Vec::new();
        let mut expansions = 0usize;

        loop {
            check_deadline(deadline)?;
            let Some(itinerary) = frontier.pop_front() else {
                break;
            };

            if itinerary.last_station() == request.destination {
                trace!(
                    legs = itinerary.leg_count(),
                    arrival = %itinerary.final_arrival(),
                    "itinerary reached destination"
                );
                completed.push(itinerary);
                continue;
            }

            if itinerary.leg_count() >= self.config.max_legs {
                trace!(
                    station = %itinerary.last_station(),
                    "dropped: leg cap reached"
                );
                continue;
            }

            if expansions >= self.config.max_expansions {
                warn!(expansions, "search stopped: expansion cap reached");
                break;
            }
            expansions += 1;

            check_deadline(deadline)?;
            let legs = self
                .provider
                .next_departures(itinerary.last_station(), itinerary.final_arrival())
                .await?;

            for leg in legs {
                if itinerary.visits(leg.arrive_station()) {
                    continue;
                }
                let extended = itinerary
                    .extended(leg)
                    .map_err(|e| SearchError::Internal(e.to_string()))?;
                frontier.push_back(extended);
            }
        }

        debug!(
            expansions,
            completed = completed.len(),
            "frontier exhausted"
        );

        let mut itineraries = rank_itineraries(completed);
        itineraries.truncate(self.config.max_results);

        info!(expansions, itineraries = itineraries.len(), "search complete");

        Ok(SearchResult {
            itineraries,
            expansions,
        })
    }
}

fn check_deadline(deadline: Instant) -> Result<(), SearchError> {
    if Instant::now() >= deadline {
        Err(SearchError::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Leg;
    use crate::timetable::{TimetableEntry, earliest_per_neighbor};
    use chrono::TimeZone;
    use chrono_tz::Asia::Tokyo;

    fn sta(id: u32) -> StationId {
        StationId::new(id).unwrap()
    }

    fn instant(d: u32, h: u32, mi: u32) -> DateTime<Tz> {
        Tokyo.with_ymd_and_hms(2025, 1, d, h, mi, 0).unwrap()
    }

    fn entry(
        train_id: u32,
        order: u32,
        from: u32,
        dep: &str,
        to: u32,
        arr: &str,
    ) -> TimetableEntry {
        TimetableEntry {
            train_id,
            order,
            depart_station: from,
            depart_clock: dep.to_string(),
            arrive_station: to,
            arrive_clock: arr.to_string(),
        }
    }

    /// In-memory timetable driving the real selection logic.
    struct MockTimetable {
        entries: Vec<TimetableEntry>,
    }

    impl TimetableProvider for MockTimetable {
        async fn next_departures(
            &self,
            station: StationId,
            not_before: DateTime<Tz>,
        ) -> Result<Vec<Leg>, TimetableError> {
            earliest_per_neighbor(&self.entries, station, not_before)
        }
    }

    /// Provider whose every query fails.
    struct BrokenTimetable;

    impl TimetableProvider for BrokenTimetable {
        async fn next_departures(
            &self,
            _station: StationId,
            _not_before: DateTime<Tz>,
        ) -> Result<Vec<Leg>, TimetableError> {
            Err(TimetableError::Backend {
                message: "connection reset".to_string(),
            })
        }
    }

    fn assert_itinerary_invariants(itinerary: &Itinerary, request: &SearchRequest) {
        let legs = itinerary.legs();

        assert_eq!(legs[0].depart_station(), request.origin);
        assert!(legs[0].depart_at() >= request.departure);
        assert_eq!(itinerary.last_station(), request.destination);

        let mut seen = std::collections::HashSet::new();
        seen.insert(legs[0].depart_station());
        for leg in legs {
            assert!(leg.depart_at() < leg.arrive_at());
            assert!(seen.insert(leg.arrive_station()), "station revisited");
        }

        for pair in legs.windows(2) {
            assert_eq!(pair[0].arrive_station(), pair[1].depart_station());
            assert!(pair[0].arrive_at() <= pair[1].depart_at());
        }
    }

    #[tokio::test]
    async fn direct_leg() {
        let provider = MockTimetable {
            entries: vec![entry(1, 0, 1, "10:00:00", 2, "10:30:00")],
        };
        let config = SearchConfig::default();
        let searcher = Searcher::new(&provider, &config);

        let request = SearchRequest::new(sta(1), instant(1, 9, 0), sta(2));
        let result = searcher.search(&request).await.unwrap();

        assert_eq!(result.itineraries.len(), 1);
        let itinerary = &result.itineraries[0];
        assert_eq!(itinerary.leg_count(), 1);
        assert_eq!(itinerary.final_arrival(), instant(1, 10, 30));
        assert_itinerary_invariants(itinerary, &request);
    }

    #[tokio::test]
    async fn one_transfer() {
        let provider = MockTimetable {
            entries: vec![
                entry(1, 0, 1, "10:00:00", 2, "10:30:00"),
                entry(2, 0, 2, "10:45:00", 3, "11:15:00"),
            ],
        };
        let config = SearchConfig::default();
        let searcher = Searcher::new(&provider, &config);

        let request = SearchRequest::new(sta(1), instant(1, 9, 0), sta(3));
        let result = searcher.search(&request).await.unwrap();

        assert_eq!(result.itineraries.len(), 1);
        let itinerary = &result.itineraries[0];
        assert_eq!(itinerary.leg_count(), 2);
        assert_eq!(itinerary.legs()[0].arrive_station(), sta(2));
        assert_eq!(itinerary.final_arrival(), instant(1, 11, 15));
        assert_itinerary_invariants(itinerary, &request);
    }

    #[tokio::test]
    async fn cross_midnight_departure() {
        // Requested at 23:55; the 23:50 train next runs tomorrow night and
        // arrives past the following midnight.
        let provider = MockTimetable {
            entries: vec![entry(3, 0, 1, "23:50:00", 2, "00:20:00")],
        };
        let config = SearchConfig::default();
        let searcher = Searcher::new(&provider, &config);

        let request = SearchRequest::new(sta(1), instant(1, 23, 55), sta(2));
        let result = searcher.search(&request).await.unwrap();

        assert_eq!(result.itineraries.len(), 1);
        let leg = &result.itineraries[0].legs()[0];
        assert_eq!(leg.depart_at(), instant(2, 23, 50));
        assert_eq!(leg.arrive_at(), instant(3, 0, 20));
    }

    #[tokio::test]
    async fn cycles_are_discarded() {
        // A <-> B with a branch B -> C: the B -> A extension is dropped,
        // C is reached only via the acyclic path.
        let provider = MockTimetable {
            entries: vec![
                entry(1, 0, 1, "10:00:00", 2, "10:30:00"),
                entry(2, 0, 2, "10:40:00", 1, "11:10:00"),
                entry(3, 0, 2, "10:45:00", 3, "11:15:00"),
            ],
        };
        let config = SearchConfig::default();
        let searcher = Searcher::new(&provider, &config);

        let request = SearchRequest::new(sta(1), instant(1, 9, 0), sta(3));
        let result = searcher.search(&request).await.unwrap();

        assert_eq!(result.itineraries.len(), 1);
        let itinerary = &result.itineraries[0];
        assert_eq!(itinerary.leg_count(), 2);
        assert_itinerary_invariants(itinerary, &request);
    }

    #[tokio::test]
    async fn ties_rank_in_discovery_order_and_truncate() {
        // Five two-leg routes arriving at the same instant, plus a sixth
        // arriving later; the cap keeps the five earliest in the order the
        // search found them.
        let mut entries = Vec::new();
        for i in 0..6u32 {
            let via = 2 + i; // stations 2..=7
            entries.push(entry(10 + i, 0, 1, "10:00:00", via, "10:30:00"));
            let arrival = if i < 5 { "11:00:00" } else { "11:30:00" };
            entries.push(entry(20 + i, 1, via, "10:45:00", 8, arrival));
        }
        let provider = MockTimetable { entries };
        let config = SearchConfig::default();
        let searcher = Searcher::new(&provider, &config);

        let request = SearchRequest::new(sta(1), instant(1, 9, 0), sta(8));
        let result = searcher.search(&request).await.unwrap();

        assert_eq!(result.itineraries.len(), 5);
        for (i, itinerary) in result.itineraries.iter().enumerate() {
            assert_eq!(itinerary.final_arrival(), instant(1, 11, 0));
            // Discovery order: seed legs sorted by next-hop station id
            assert_eq!(itinerary.legs()[0].arrive_station(), sta(2 + i as u32));
        }
    }

    #[tokio::test]
    async fn unreachable_destination_is_empty_success() {
        let provider = MockTimetable {
            entries: vec![entry(1, 0, 1, "10:00:00", 2, "10:30:00")],
        };
        let config = SearchConfig::default();
        let searcher = Searcher::new(&provider, &config);

        let request = SearchRequest::new(sta(1), instant(1, 9, 0), sta(9));
        let result = searcher.search(&request).await.unwrap();

        assert!(result.itineraries.is_empty());
    }

    #[tokio::test]
    async fn leg_cap_bounds_depth() {
        // A -> B -> C -> D needs three legs; with a cap of two the
        // destination is unreachable.
        let provider = MockTimetable {
            entries: vec![
                entry(1, 0, 1, "10:00:00", 2, "10:10:00"),
                entry(2, 0, 2, "10:20:00", 3, "10:30:00"),
                entry(3, 0, 3, "10:40:00", 4, "10:50:00"),
            ],
        };
        let config = SearchConfig {
            max_legs: 2,
            ..Default::default()
        };
        let searcher = Searcher::new(&provider, &config);

        let request = SearchRequest::new(sta(1), instant(1, 9, 0), sta(4));
        let result = searcher.search(&request).await.unwrap();

        assert!(result.itineraries.is_empty());

        // Raising the cap makes it reachable again
        let config = SearchConfig::default();
        let searcher = Searcher::new(&provider, &config);
        let result = searcher.search(&request).await.unwrap();
        assert_eq!(result.itineraries.len(), 1);
        assert_eq!(result.itineraries[0].leg_count(), 3);
    }

    #[tokio::test]
    async fn expansion_cap_stops_search() {
        let provider = MockTimetable {
            entries: vec![
                entry(1, 0, 1, "10:00:00", 2, "10:10:00"),
                entry(2, 0, 2, "10:20:00", 3, "10:30:00"),
                entry(3, 0, 3, "10:40:00", 4, "10:50:00"),
            ],
        };
        let config = SearchConfig {
            max_expansions: 1,
            ..Default::default()
        };
        let searcher = Searcher::new(&provider, &config);

        // One expansion only reaches B; D stays undiscovered.
        let request = SearchRequest::new(sta(1), instant(1, 9, 0), sta(4));
        let result = searcher.search(&request).await.unwrap();

        assert!(result.itineraries.is_empty());
        assert_eq!(result.expansions, 1);
    }

    #[tokio::test]
    async fn backend_error_aborts_search() {
        let provider = BrokenTimetable;
        let config = SearchConfig::default();
        let searcher = Searcher::new(&provider, &config);

        let request = SearchRequest::new(sta(1), instant(1, 9, 0), sta(2));
        let result = searcher.search(&request).await;

        assert!(matches!(result, Err(SearchError::Backend(_))));
    }

    #[tokio::test]
    async fn expired_deadline_cancels_before_any_query() {
        let provider = MockTimetable {
            entries: vec![entry(1, 0, 1, "10:00:00", 2, "10:30:00")],
        };
        let config = SearchConfig {
            deadline_secs: 0,
            ..Default::default()
        };
        let searcher = Searcher::new(&provider, &config);

        let request = SearchRequest::new(sta(1), instant(1, 9, 0), sta(2));
        let result = searcher.search(&request).await;

        assert!(matches!(result, Err(SearchError::Cancelled)));
    }

    #[tokio::test]
    async fn same_origin_and_destination_rejected() {
        let provider = MockTimetable { entries: vec![] };
        let config = SearchConfig::default();
        let searcher = Searcher::new(&provider, &config);

        let request = SearchRequest::new(sta(1), instant(1, 9, 0), sta(1));
        let result = searcher.search(&request).await;

        assert!(matches!(result, Err(SearchError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn deterministic_given_fixed_timetable() {
        let entries = vec![
            entry(1, 0, 1, "10:00:00", 2, "10:30:00"),
            entry(2, 0, 1, "10:05:00", 3, "10:35:00"),
            entry(3, 0, 2, "10:45:00", 4, "11:15:00"),
            entry(4, 0, 3, "10:50:00", 4, "11:15:00"),
        ];
        let provider = MockTimetable { entries };
        let config = SearchConfig::default();
        let searcher = Searcher::new(&provider, &config);

        let request = SearchRequest::new(sta(1), instant(1, 9, 0), sta(4));

        let first = searcher.search(&request).await.unwrap();
        let second = searcher.search(&request).await.unwrap();

        assert_eq!(first.itineraries.len(), second.itineraries.len());
        for (a, b) in first.itineraries.iter().zip(second.itineraries.iter()) {
            assert_eq!(a.legs(), b.legs());
        }
    }
}
