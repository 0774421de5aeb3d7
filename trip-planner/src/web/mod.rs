//! Web layer for the trip planner.
//!
//! Exposes the route search, the search panel and the subway overlay as
//! JSON endpoints, so a host page can drive the core over HTTP.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
