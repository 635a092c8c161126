//! Web layer for the transit route server.
//!
//! Provides the JSON HTTP endpoints for route search and station lookup.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
