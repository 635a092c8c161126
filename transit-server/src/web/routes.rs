//! HTTP route handlers.

use std::collections::BTreeSet;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::StationId;
use crate::planner::{SearchError, SearchRequest, Searcher};
use crate::timetable::TimetableError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", post(search_transit))
        .route("/stations", get(search_stations))
        .route("/stations/{id}", get(station_by_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search transit routes by departure time.
async fn search_transit(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TransitSearchResponse>, AppError> {
    // Parse JSON manually so malformed bodies get the error JSON shape
    let request: TransitSearchRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest {
            message: format!("Invalid request body: {e}"),
        })?;

    // Exactly one of the two instants must be set
    if request.depart_datetime.is_some() == request.arrive_datetime.is_some() {
        return Err(AppError::BadRequest {
            message: "Either the departure time or the arrival time must be set, but not both."
                .to_string(),
        });
    }

    let origin = StationId::new(request.depart_station_id).map_err(|e| AppError::BadRequest {
        message: format!("Invalid departure station id: {e}"),
    })?;
    let destination =
        StationId::new(request.arrive_station_id).map_err(|e| AppError::BadRequest {
            message: format!("Invalid arrival station id: {e}"),
        })?;

    if origin == destination {
        return Err(AppError::BadRequest {
            message: "Departure station ID and arrival station ID must be different.".to_string(),
        });
    }

    if !state.timetable.both_stations_exist(origin, destination).await? {
        return Err(AppError::BadRequest {
            message: "Departure or arrival station does not exist.".to_string(),
        });
    }

    // Arrival-based search is the dual problem and not yet served
    let Some(depart_datetime) = request.depart_datetime else {
        return Err(AppError::BadRequest {
            message: "Only departure-time search is available (arrival-time search is under maintenance)."
                .to_string(),
        });
    };

    // Normalize the requested instant into the timetable's timezone
    let departure = depart_datetime.with_timezone(&state.timezone);

    let search_request = SearchRequest::new(origin, departure, destination);
    let searcher = Searcher::new(state.timetable.as_ref(), &state.search);
    let result = searcher.search(&search_request).await?;

    // Resolve every station any returned route touches, ascending by id
    let touched: BTreeSet<StationId> = result
        .itineraries
        .iter()
        .flat_map(|itinerary| itinerary.stations())
        .collect();
    let touched: Vec<StationId> = touched.into_iter().collect();
    let stations = state.timetable.stations_by_ids(&touched).await?;

    Ok(Json(TransitSearchResponse {
        stations: stations.iter().map(StationView::from_station).collect(),
        routes: result
            .itineraries
            .iter()
            .map(RouteView::from_itinerary)
            .collect(),
    }))
}

/// Query parameters for station keyword search.
#[derive(Debug, Deserialize)]
struct StationSearchQuery {
    keyword: Option<String>,
}

/// Search stations by partial name match.
async fn search_stations(
    State(state): State<AppState>,
    Query(query): Query<StationSearchQuery>,
) -> Result<Json<StationsView>, AppError> {
    let keyword = query.keyword.as_deref().unwrap_or("");
    if keyword.is_empty() {
        return Err(AppError::BadRequest {
            message: "Keyword must be specified.".to_string(),
        });
    }

    let stations = state.timetable.stations_by_keyword(keyword).await?;

    Ok(Json(StationsView {
        stations: stations.iter().map(StationView::from_station).collect(),
    }))
}

/// Look up a station by id.
async fn station_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StationView>, AppError> {
    let id = id
        .parse::<u32>()
        .ok()
        .and_then(|raw| StationId::new(raw).ok())
        .ok_or_else(|| AppError::BadRequest {
            message: "Invalid station id.".to_string(),
        })?;

    let station = state
        .timetable
        .station_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: "Station not found.".to_string(),
        })?;

    Ok(Json(StationView::from_station(&station)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<TimetableError> for AppError {
    fn from(e: TimetableError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        let message = e.to_string();
        match e {
            SearchError::InvalidRequest(_) => AppError::BadRequest { message },
            SearchError::Cancelled => AppError::Unavailable { message },
            SearchError::Backend(_) | SearchError::Internal(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
