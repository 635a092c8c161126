//! MySQL-backed timetable.
//!
//! Read-only access to the `stations` and `operations` tables. Clock
//! columns are fetched as text and parsed by the domain `Clock` type, so
//! corrupt values surface as integrity errors rather than silent zeros.

use chrono::DateTime;
use chrono_tz::Tz;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{info, warn};

use crate::config::DbConfig;
use crate::domain::{Leg, Station, StationId};

use super::provider::{TimetableError, TimetableProvider};
use super::select::{TimetableEntry, earliest_per_neighbor};

/// Connect to the timetable database with bounded retry.
///
/// The database container may come up after the server; retry
/// `max_retries` times with `retry_backoff_secs` between attempts, then
/// give up. Intended for boot only.
pub async fn connect(config: &DbConfig) -> Result<MySqlPool, TimetableError> {
    let url = config.url();

    for attempt in 1..=config.max_retries {
        match MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&url)
            .await
        {
            Ok(pool) => {
                info!(attempt, "timetable database connected");
                return Ok(pool);
            }
            Err(e) => {
                warn!(attempt, error = %e, "timetable database connection failed");
            }
        }

        if attempt < config.max_retries {
            tokio::time::sleep(std::time::Duration::from_secs(config.retry_backoff_secs)).await;
        }
    }

    Err(TimetableError::Backend {
        message: format!(
            "database unreachable after {} attempts",
            config.max_retries
        ),
    })
}

/// Timetable reads over a MySQL connection pool.
///
/// The pool is shared and read-only; each query takes a connection on
/// demand and releases it when the future completes.
#[derive(Debug, Clone)]
pub struct DbTimetable {
    pool: MySqlPool,
}

#[derive(sqlx::FromRow)]
struct OperationRow {
    train_id: u32,
    op_order: u32,
    dep_sta_id: u32,
    dep_time: String,
    arr_sta_id: u32,
    arr_time: String,
}

impl From<OperationRow> for TimetableEntry {
    fn from(row: OperationRow) -> Self {
        TimetableEntry {
            train_id: row.train_id,
            order: row.op_order,
            depart_station: row.dep_sta_id,
            depart_clock: row.dep_time,
            arrive_station: row.arr_sta_id,
            arrive_clock: row.arr_time,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StationRow {
    id: u32,
    name: String,
    name_en: String,
}

impl StationRow {
    fn into_station(self) -> Result<Station, TimetableError> {
        let id = StationId::new(self.id).map_err(|e| TimetableError::Integrity {
            message: e.to_string(),
        })?;
        Ok(Station {
            id,
            name: self.name,
            name_en: self.name_en,
        })
    }
}

impl DbTimetable {
    /// Wrap an established pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// All timetable rows departing from `station`.
    async fn departures_from(&self, station: StationId) -> Result<Vec<TimetableEntry>, TimetableError> {
        let rows: Vec<OperationRow> = sqlx::query_as(
            "SELECT train_id, op_order, dep_sta_id, \
                    CAST(dep_time AS CHAR) AS dep_time, \
                    arr_sta_id, \
                    CAST(arr_time AS CHAR) AS arr_time \
             FROM operations \
             WHERE dep_sta_id = ?",
        )
        .bind(station.get())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(TimetableEntry::from).collect())
    }

    /// Look up one station, `None` when the id is unknown.
    pub async fn station_by_id(&self, id: StationId) -> Result<Option<Station>, TimetableError> {
        let row: Option<StationRow> =
            sqlx::query_as("SELECT id, name, name_en FROM stations WHERE id = ?")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;

        row.map(StationRow::into_station).transpose()
    }

    /// Substring search over native and English station names.
    pub async fn stations_by_keyword(&self, keyword: &str) -> Result<Vec<Station>, TimetableError> {
        let pattern = format!("%{keyword}%");
        let rows: Vec<StationRow> = sqlx::query_as(
            "SELECT id, name, name_en FROM stations \
             WHERE name LIKE ? OR name_en LIKE ? \
             ORDER BY id ASC",
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(StationRow::into_station).collect()
    }

    /// Fetch the given stations, ascending by id. Unknown ids are absent
    /// from the result.
    pub async fn stations_by_ids(&self, ids: &[StationId]) -> Result<Vec<Station>, TimetableError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, name, name_en FROM stations WHERE id IN ({placeholders}) ORDER BY id ASC"
        );

        let mut query = sqlx::query_as::<_, StationRow>(&sql);
        for id in ids {
            query = query.bind(id.get());
        }

        let rows = query.fetch_all(&self.pool).await.map_err(backend)?;
        rows.into_iter().map(StationRow::into_station).collect()
    }

    /// Returns true when both (distinct) station ids exist.
    pub async fn both_stations_exist(
        &self,
        a: StationId,
        b: StationId,
    ) -> Result<bool, TimetableError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM stations WHERE id IN (?, ?)")
                .bind(a.get())
                .bind(b.get())
                .fetch_one(&self.pool)
                .await
                .map_err(backend)?;

        Ok(count == 2)
    }
}

impl TimetableProvider for DbTimetable {
    async fn next_departures(
        &self,
        station: StationId,
        not_before: DateTime<Tz>,
    ) -> Result<Vec<Leg>, TimetableError> {
        let entries = self.departures_from(station).await?;
        earliest_per_neighbor(&entries, station, not_before)
    }
}

fn backend(err: sqlx::Error) -> TimetableError {
    TimetableError::Backend {
        message: err.to_string(),
    }
}
