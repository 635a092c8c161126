use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use transit_server::config::AppConfig;
use transit_server::timetable::{self, DbTimetable};
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    let pool = match timetable::connect(&config.db).await {
        Ok(pool) => pool,
        Err(e) => {
            error!(error = %e, "could not reach the timetable database");
            std::process::exit(1);
        }
    };

    let state = AppState::new(DbTimetable::new(pool), config.search, config.timezone);
    let app = create_router(state);

    info!(addr = %config.listen_addr, "listening");

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("failed to bind listen address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    info!("server exiting");
}

/// Resolves when SIGINT is received, letting in-flight requests drain.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install SIGINT handler");
    info!("shutdown signal received");
}
