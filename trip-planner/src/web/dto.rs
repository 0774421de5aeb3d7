//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::TravelMode;
use crate::panel::{Endpoint, SelectionState};
use crate::subway::InputOrigin;

/// Request to plan a route.
#[derive(Debug, Deserialize)]
pub struct RouteSearchRequest {
    /// Start location: a place name or a `"lng, lat"` label
    pub start: String,

    /// End location, same forms as `start`
    pub end: String,

    /// Travel mode (defaults to the panel's current mode)
    pub mode: Option<TravelMode>,

    /// Policy identifier, e.g. `BMAP_DRIVING_POLICY_AVOID_HIGHWAYS`;
    /// empty for none
    #[serde(default)]
    pub policy: String,
}

/// Request to arm a map pick.
#[derive(Debug, Deserialize)]
pub struct PickRequest {
    pub endpoint: Endpoint,
}

/// Current panel selection.
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selection: SelectionState,
}

/// A click on the main map.
#[derive(Debug, Deserialize)]
pub struct MapClickRequest {
    pub lng: f64,
    pub lat: f64,
}

/// The endpoint a map click set.
#[derive(Debug, Serialize)]
pub struct PickedResponse {
    pub endpoint: Endpoint,

    /// Text for the endpoint's input
    pub label: String,
}

/// Request to clear one endpoint, or everything when absent.
#[derive(Debug, Default, Deserialize)]
pub struct ClearRequest {
    pub endpoint: Option<Endpoint>,
}

/// Query for the policy selector.
#[derive(Debug, Deserialize)]
pub struct PoliciesQuery {
    pub mode: TravelMode,
}

/// Request to show or hide the subway overlay.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub visible: bool,
}

/// Request naming a line or station.
#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

/// Request for a point-to-point subway query.
#[derive(Debug, Deserialize)]
pub struct SubwayRouteRequest {
    pub start: String,
    pub end: String,
}

/// Whether a subway query was issued.
#[derive(Debug, Serialize)]
pub struct SubwayRouteResponse {
    pub issued: bool,
}

/// A wheel event over the overlay.
#[derive(Debug, Deserialize)]
pub struct WheelRequest {
    pub origin: InputOrigin,
    pub delta_y: f64,
}

/// Subway line selector options.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: Vec<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_search_request_defaults() {
        let req: RouteSearchRequest =
            serde_json::from_str(r#"{"start": "夫子庙", "end": "总统府"}"#).unwrap();
        assert!(req.mode.is_none());
        assert!(req.policy.is_empty());

        let req: RouteSearchRequest = serde_json::from_str(
            r#"{"start": "a", "end": "b", "mode": "transit", "policy": "BMAP_TRANSIT_POLICY_LEAST_TIME"}"#,
        )
        .unwrap();
        assert_eq!(req.mode, Some(TravelMode::Transit));
    }

    #[test]
    fn clear_request_endpoint_optional() {
        let req: ClearRequest = serde_json::from_str("{}").unwrap();
        assert!(req.endpoint.is_none());

        let req: ClearRequest = serde_json::from_str(r#"{"endpoint": "start"}"#).unwrap();
        assert_eq!(req.endpoint, Some(Endpoint::Start));
    }

    #[test]
    fn wheel_request_parses_origin() {
        let req: WheelRequest =
            serde_json::from_str(r#"{"origin": "panel", "delta_y": 120.0}"#).unwrap();
        assert_eq!(req.origin, InputOrigin::Panel);
    }
}
