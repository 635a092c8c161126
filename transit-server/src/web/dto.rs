//! Data transfer objects for web requests and responses.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::{Itinerary, Leg, Station};

/// Request to search transit routes.
#[derive(Debug, Deserialize)]
pub struct TransitSearchRequest {
    /// Departure station id
    pub depart_station_id: u32,

    /// Arrival station id
    pub arrive_station_id: u32,

    /// Earliest departure instant (RFC 3339). Exactly one of this and
    /// `arrive_datetime` must be present.
    #[serde(default)]
    pub depart_datetime: Option<DateTime<FixedOffset>>,

    /// Latest arrival instant (RFC 3339). Accepted by the schema but the
    /// arrival-based search is not available.
    #[serde(default)]
    pub arrive_datetime: Option<DateTime<FixedOffset>>,
}

/// Response for a transit search.
#[derive(Debug, Serialize)]
pub struct TransitSearchResponse {
    /// Every station touched by any returned route, ascending by id
    pub stations: Vec<StationView>,

    /// Found routes, earliest arrival first
    pub routes: Vec<RouteView>,
}

/// A station in a response.
#[derive(Debug, Serialize)]
pub struct StationView {
    /// Backend station id
    pub id: u32,

    /// Native-language name
    pub name: String,

    /// English name
    pub name_en: String,
}

/// Stations matching a keyword search.
#[derive(Debug, Serialize)]
pub struct StationsView {
    /// Matching stations
    pub stations: Vec<StationView>,
}

/// One route in a search response.
#[derive(Debug, Serialize)]
pub struct RouteView {
    /// The route's legs in travel order
    pub operations: Vec<OperationView>,
}

/// One leg of a route.
#[derive(Debug, Serialize)]
pub struct OperationView {
    /// Train identifier
    pub train_id: u32,

    /// Position within the train's stop sequence
    pub order: u32,

    /// Departure station id
    pub depart_station_id: u32,

    /// Absolute departure instant (RFC 3339)
    pub depart_datetime: String,

    /// Arrival station id
    pub arrive_station_id: u32,

    /// Absolute arrival instant (RFC 3339)
    pub arrive_datetime: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StationView {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.get(),
            name: station.name.clone(),
            name_en: station.name_en.clone(),
        }
    }
}

impl OperationView {
    /// Create from a domain Leg.
    pub fn from_leg(leg: &Leg) -> Self {
        Self {
            train_id: leg.train_id().get(),
            order: leg.order(),
            depart_station_id: leg.depart_station().get(),
            depart_datetime: leg.depart_at().to_rfc3339(),
            arrive_station_id: leg.arrive_station().get(),
            arrive_datetime: leg.arrive_at().to_rfc3339(),
        }
    }
}

impl RouteView {
    /// Create from a domain Itinerary.
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        Self {
            operations: itinerary.legs().iter().map(OperationView::from_leg).collect(),
        }
    }
}
