//! Route search orchestration.
//!
//! Each search owns a provider session. Starting a new search or clearing
//! tears the previous session down first, and results from superseded
//! searches are dropped, so the map and the event stream only ever show
//! the latest search.

mod event;
mod orchestrator;

pub use event::{RouteEvent, SearchId};
pub use orchestrator::{OrchestratorState, RouteOrchestrator, SearchOutcome};
