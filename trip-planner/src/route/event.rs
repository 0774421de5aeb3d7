//! Events emitted when a route search finishes.

use serde::Serialize;

use crate::domain::Itinerary;
use crate::error::PlanError;

/// Monotonic identifier of one search action.
pub type SearchId = u64;

/// Outcome of the latest search, broadcast to subscribers.
///
/// Serialized as `{"event": "routePlanComplete", "detail": {...}}` so a
/// host page can forward it as a DOM event unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "detail")]
pub enum RouteEvent {
    #[serde(rename = "routePlanComplete")]
    PlanComplete {
        search_id: SearchId,
        itinerary: Itinerary,
    },

    #[serde(rename = "routePlanError")]
    PlanError { search_id: SearchId, message: String },
}

impl RouteEvent {
    /// Returns the search this event belongs to.
    pub fn search_id(&self) -> SearchId {
        match self {
            RouteEvent::PlanComplete { search_id, .. } | RouteEvent::PlanError { search_id, .. } => {
                *search_id
            }
        }
    }

    /// Converts the event into the itinerary or a not-found error.
    pub fn into_result(self) -> Result<Itinerary, PlanError> {
        match self {
            RouteEvent::PlanComplete { itinerary, .. } => Ok(itinerary),
            RouteEvent::PlanError { message, .. } => Err(PlanError::RouteNotFound { message }),
        }
    }
}
