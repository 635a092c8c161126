//! Application state for the web layer.

use std::sync::Arc;

use chrono_tz::Tz;

use crate::planner::SearchConfig;
use crate::timetable::DbTimetable;

/// Shared application state.
///
/// Contains everything a handler needs: the timetable backend, the search
/// limits and the timetable's timezone.
#[derive(Clone)]
pub struct AppState {
    /// Timetable database access
    pub timetable: Arc<DbTimetable>,

    /// Route search configuration
    pub search: Arc<SearchConfig>,

    /// The timetable's fixed timezone
    pub timezone: Tz,
}

impl AppState {
    /// Create a new app state.
    pub fn new(timetable: DbTimetable, search: SearchConfig, timezone: Tz) -> Self {
        Self {
            timetable: Arc::new(timetable),
            search: Arc::new(search),
            timezone,
        }
    }
}
