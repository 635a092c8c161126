//! Environment-driven configuration.
//!
//! All knobs are read once at boot. Backend credentials follow the
//! deployment's MYSQL_* convention; search limits and the timetable
//! timezone have defaults that match the reference deployment.

use std::net::SocketAddr;
use std::str::FromStr;

use chrono_tz::Tz;

use crate::planner::SearchConfig;

/// Error returned when the environment is incomplete or malformed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("missing required environment variable {name}")]
    Missing { name: &'static str },

    /// A variable is set but unparseable
    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Timetable database connection settings.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database user.
    pub user: String,

    /// Database password.
    pub password: String,

    /// Database name.
    pub database: String,

    /// Database host.
    pub host: String,

    /// Database port.
    pub port: u16,

    /// Connection pool size.
    pub max_connections: u32,

    /// Boot-time connection attempts before giving up.
    pub max_retries: u32,

    /// Seconds to wait between boot-time connection attempts.
    pub retry_backoff_secs: u64,
}

impl DbConfig {
    /// Connection URL for the pool. Contains the password; never log it.
    pub fn url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Timetable database settings.
    pub db: DbConfig,

    /// Route search limits.
    pub search: SearchConfig,

    /// The timetable's fixed timezone.
    pub timezone: Tz,

    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let db = DbConfig {
            user: required("MYSQL_USER")?,
            password: required("MYSQL_PASSWORD")?,
            database: required("MYSQL_DATABASE")?,
            host: optional("MYSQL_HOST", "db"),
            port: parsed("MYSQL_PORT", 3306)?,
            max_connections: parsed("DB_MAX_CONNECTIONS", 10)?,
            max_retries: parsed("DB_MAX_RETRIES", 10)?,
            retry_backoff_secs: parsed("DB_RETRY_BACKOFF_SECS", 5)?,
        };

        let defaults = SearchConfig::default();
        let search = SearchConfig {
            max_results: parsed("SEARCH_MAX_RESULTS", defaults.max_results)?,
            max_legs: parsed("SEARCH_MAX_LEGS", defaults.max_legs)?,
            max_expansions: parsed("SEARCH_MAX_EXPANSIONS", defaults.max_expansions)?,
            deadline_secs: parsed("SEARCH_DEADLINE_SECS", defaults.deadline_secs)?,
        };

        let timezone = parsed("TIMETABLE_TZ", chrono_tz::Asia::Tokyo)?;
        let listen_addr = parsed("LISTEN_ADDR", SocketAddr::from(([0, 0, 0, 0], 80)))?;

        Ok(Self {
            db,
            search,
            timezone,
            listen_addr,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing { name })
}

fn optional(name: &'static str, default: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn parsed<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            message: e.to_string(),
        }),
        _ => Ok(default),
    }
}
