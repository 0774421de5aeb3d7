//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::{Coordinate, PolicyId};
use crate::error::PlanError;
use crate::panel::policy_options;
use crate::route::{RouteEvent, SearchOutcome};
use crate::subway::{OverlaySnapshot, StationQuery};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/route/search", post(search_route))
        .route("/route/clear", post(clear_route))
        .route("/panel/pick", post(begin_pick))
        .route("/panel/click", post(map_click))
        .route("/panel/clear", post(clear_panel))
        .route("/panel/policies", get(list_policies))
        .route("/subway/toggle", post(toggle_subway))
        .route("/subway/state", get(subway_state))
        .route("/subway/panel", get(subway_panel))
        .route("/subway/lines", get(subway_lines))
        .route("/subway/line", post(select_line))
        .route("/subway/route", post(subway_route))
        .route("/subway/station", post(select_station))
        .route("/subway/reset", post(reset_subway))
        .route("/subway/wheel", post(subway_wheel))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan a route and wait for its outcome.
async fn search_route(
    State(state): State<AppState>,
    Json(req): Json<RouteSearchRequest>,
) -> Result<Response, AppError> {
    let policy = PolicyId::parse_optional(&req.policy).map_err(PlanError::from)?;

    // Snapshot the panel so the lock is not held while geocoding
    let inputs = {
        let mut panel = state.panel();
        if let Some(mode) = req.mode {
            panel.set_mode(mode);
        }
        panel.search_inputs(&req.start, &req.end)?
    };

    let request = inputs
        .build_request(policy, state.geocoder.as_ref(), &state.city.name)
        .await?;

    let mut events = state.routes.subscribe();
    let search_id = state.routes.search(&request);

    let outcome = state
        .routes
        .wait_for(&mut events, search_id, state.route_config.response_timeout())
        .await;

    match outcome {
        SearchOutcome::Completed(Ok(itinerary)) => Ok(Json(RouteEvent::PlanComplete {
            search_id,
            itinerary,
        })
        .into_response()),
        SearchOutcome::Completed(Err(PlanError::RouteNotFound { message })) => Ok((
            StatusCode::NOT_FOUND,
            Json(RouteEvent::PlanError { search_id, message }),
        )
            .into_response()),
        SearchOutcome::Completed(Err(e)) => Err(e.into()),
        SearchOutcome::Superseded => Err(AppError::Conflict {
            message: format!("search {} was superseded", search_id),
        }),
        SearchOutcome::TimedOut => Err(AppError::Timeout {
            message: format!("search {} produced no result in time", search_id),
        }),
    }
}

/// Clear the current route from the map.
async fn clear_route(State(state): State<AppState>) -> StatusCode {
    state.routes.clear();
    StatusCode::NO_CONTENT
}

/// Arm the next map click for an endpoint.
async fn begin_pick(
    State(state): State<AppState>,
    Json(req): Json<PickRequest>,
) -> Json<SelectionResponse> {
    let mut panel = state.panel();
    panel.begin_pick(req.endpoint);
    Json(SelectionResponse {
        selection: panel.selection(),
    })
}

/// Apply a click on the main map.
async fn map_click(State(state): State<AppState>, Json(req): Json<MapClickRequest>) -> Response {
    let picked = state
        .panel()
        .handle_map_click(Coordinate::new(req.lng, req.lat));

    match picked {
        Some((endpoint, label)) => Json(PickedResponse { endpoint, label }).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Clear one endpoint, or both endpoints and the route.
async fn clear_panel(State(state): State<AppState>, Json(req): Json<ClearRequest>) -> StatusCode {
    match req.endpoint {
        Some(endpoint) => state.panel().clear_point(endpoint),
        None => {
            state.panel().clear_all();
            state.routes.clear();
        }
    }
    StatusCode::NO_CONTENT
}

/// Policy selector options for a mode.
async fn list_policies(Query(query): Query<PoliciesQuery>) -> impl IntoResponse {
    Json(policy_options(query.mode))
}

/// Show or hide the subway overlay.
async fn toggle_subway(
    State(state): State<AppState>,
    Json(req): Json<ToggleRequest>,
) -> Json<OverlaySnapshot> {
    state.overlay.toggle(req.visible);
    Json(state.overlay.snapshot())
}

async fn subway_state(State(state): State<AppState>) -> Json<OverlaySnapshot> {
    Json(state.overlay.snapshot())
}

/// The panel built when the overlay loaded.
async fn subway_panel(State(state): State<AppState>) -> Result<Response, AppError> {
    let panel = state.overlay.panel().ok_or_else(not_ready)?;
    Ok(Json(panel.clone()).into_response())
}

async fn subway_lines(State(state): State<AppState>) -> Result<Json<LinesResponse>, AppError> {
    let query = ready_query(&state)?;
    Ok(Json(LinesResponse {
        lines: query.line_names().into_iter().map(String::from).collect(),
    }))
}

async fn select_line(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<Response, AppError> {
    let query = ready_query(&state)?;
    Ok(match query.select_line(&req.name) {
        Some(detail) => Json(detail).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

async fn subway_route(
    State(state): State<AppState>,
    Json(req): Json<SubwayRouteRequest>,
) -> Result<Json<SubwayRouteResponse>, AppError> {
    let query = ready_query(&state)?;
    Ok(Json(SubwayRouteResponse {
        issued: query.query_route(&req.start, &req.end),
    }))
}

async fn select_station(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<Response, AppError> {
    let query = ready_query(&state)?;
    Ok(match query.select_station(&req.name) {
        Some(card) => Json(card).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

async fn reset_subway(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    if !state.overlay.reset() {
        return Err(not_ready());
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn subway_wheel(
    State(state): State<AppState>,
    Json(req): Json<WheelRequest>,
) -> impl IntoResponse {
    Json(state.overlay.on_wheel(req.origin, req.delta_y))
}

fn ready_query(state: &AppState) -> Result<StationQuery, AppError> {
    state.overlay.query().ok_or_else(not_ready)
}

fn not_ready() -> AppError {
    AppError::Conflict {
        message: "subway overlay is not ready".to_string(),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Unprocessable { message: String },
    Timeout { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        let message = e.to_string();
        match e {
            PlanError::MissingEndpoint
            | PlanError::InvalidPolicy { .. }
            | PlanError::InvalidPolicyId(_) => AppError::BadRequest { message },
            PlanError::GeocodeFailure { .. } => AppError::Unprocessable { message },
            PlanError::RouteNotFound { .. } | PlanError::TopologyLookupMiss { .. } => {
                AppError::NotFound { message }
            }
            PlanError::ResourceLoadTimeout { .. } => AppError::Timeout { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Unprocessable { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::Timeout { message } => (StatusCode::GATEWAY_TIMEOUT, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else if status == StatusCode::CONFLICT {
            info!(%status, %message, "request conflicted");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CityConfig, OverlayConfig, RouteConfig};
    use crate::geocode::LandmarkGeocoder;
    use crate::mock::{MockMapSurface, MockRoutingProvider, MockScriptLoader, MockSubwaySurface};
    use crate::provider::{MapSurface, RoutingProvider, ScriptLoader, SubwaySurface};
    use crate::route::RouteOrchestrator;
    use crate::subway::OverlayController;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn state_with(provider: MockRoutingProvider) -> AppState {
        let routes = RouteOrchestrator::new(
            Arc::new(provider) as Arc<dyn RoutingProvider>,
            Arc::new(MockMapSurface::new()) as Arc<dyn MapSurface>,
            RouteConfig::default(),
        );
        let surface = MockSubwaySurface::from_fixture("data/subway/nanjing.json").unwrap();
        let overlay = OverlayController::new(
            Arc::new(MockScriptLoader::already_present()) as Arc<dyn ScriptLoader>,
            Arc::new(surface) as Arc<dyn SubwaySurface>,
            OverlayConfig::default().with_polling(1, 1),
        );
        AppState::new(
            routes,
            overlay,
            Arc::new(LandmarkGeocoder::nanjing()),
            CityConfig::default(),
            RouteConfig {
                response_timeout_secs: 5,
                ..RouteConfig::default()
            },
        )
    }

    fn state() -> AppState {
        state_with(MockRoutingProvider::new("data/mock_plans").unwrap())
    }

    async fn send(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_check() {
        let response = create_router(state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn transit_search_returns_itinerary() {
        let state = state();
        let (status, body) = send(
            &state,
            "POST",
            "/route/search",
            Some(json!({"start": "夫子庙", "end": "总统府", "mode": "transit"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["event"], "routePlanComplete");
        let steps = body["detail"]["itinerary"]["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0]["type"], "walk");
        assert_eq!(steps[1]["type"], "subway");
        assert_eq!(body["detail"]["itinerary"]["duration"], "1 h 10 min");
    }

    #[tokio::test]
    async fn missing_mode_fixture_is_not_found() {
        let mut responses = std::collections::HashMap::new();
        responses.insert(
            crate::domain::TravelMode::Driving,
            crate::plan::SearchResponse::failure(),
        );
        let state = state_with(MockRoutingProvider::from_responses(responses));

        let (status, body) = send(
            &state,
            "POST",
            "/route/search",
            Some(json!({"start": "118.7846, 32.0417", "end": "夫子庙", "mode": "driving"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["event"], "routePlanError");
        assert_eq!(body["detail"]["message"], RouteConfig::default().not_found_message);
    }

    #[tokio::test]
    async fn search_input_errors() {
        let state = state();

        let (status, _) = send(
            &state,
            "POST",
            "/route/search",
            Some(json!({"start": "月球背面", "end": "总统府"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            &state,
            "POST",
            "/route/search",
            Some(json!({"start": "", "end": "总统府"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("start and an end"));

        let (status, _) = send(
            &state,
            "POST",
            "/route/search",
            Some(json!({"start": "夫子庙", "end": "总统府", "mode": "driving", "policy": "BMAP_TRANSIT_POLICY_LEAST_TIME"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &state,
            "POST",
            "/route/search",
            Some(json!({"start": "夫子庙", "end": "总统府", "policy": "BMAP_NOPE"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn superseded_search_conflicts() {
        let state = state_with(
            MockRoutingProvider::new("data/mock_plans")
                .unwrap()
                .with_latency(Duration::from_millis(200)),
        );

        let first = {
            let state = state.clone();
            tokio::spawn(async move {
                send(
                    &state,
                    "POST",
                    "/route/search",
                    Some(json!({"start": "夫子庙", "end": "总统府", "mode": "driving"})),
                )
                .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let (status, body) = send(
            &state,
            "POST",
            "/route/search",
            Some(json!({"start": "夫子庙", "end": "总统府", "mode": "transit"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["detail"]["itinerary"]["distance"], "38.9km");

        let (status, _) = first.await.unwrap();
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn panel_pick_and_click() {
        let state = state();

        let (status, _) = send(&state, "POST", "/panel/click", Some(json!({"lng": 118.7, "lat": 32.0}))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&state, "POST", "/panel/pick", Some(json!({"endpoint": "start"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selection"], "start");

        let (_, body) = send(
            &state,
            "POST",
            "/panel/click",
            Some(json!({"lng": 118.77807, "lat": 32.05723})),
        )
        .await;
        assert_eq!(body["endpoint"], "start");
        assert_eq!(body["label"], "118.7781, 32.0572");

        let (status, _) = send(&state, "POST", "/panel/clear", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.panel().selected(crate::panel::Endpoint::Start).is_none());
    }

    #[tokio::test]
    async fn policies_by_mode() {
        let state = state();

        let (status, body) = send(&state, "GET", "/panel/policies?mode=driving", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["value"], "BMAP_DRIVING_POLICY_DEFAULT");

        let (_, body) = send(&state, "GET", "/panel/policies?mode=walking", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert!(body[0]["value"].is_null());
    }

    #[tokio::test]
    async fn subway_requires_ready_overlay() {
        let state = state();

        let (status, _) = send(&state, "GET", "/subway/lines", None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&state, "POST", "/subway/toggle", Some(json!({"visible": true}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["visible"], true);

        state.overlay.ready().await;

        let (_, body) = send(&state, "GET", "/subway/lines", None).await;
        assert_eq!(body["lines"][3], "S1号线");

        let (status, body) = send(&state, "POST", "/subway/line", Some(json!({"name": "S1号线"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["from"], "南京南站");
        assert_eq!(body["to"], "禄口机场");

        let (status, _) = send(&state, "POST", "/subway/line", Some(json!({"name": "10号线"}))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(
            &state,
            "POST",
            "/subway/route",
            Some(json!({"start": "新街口", "end": ""})),
        )
        .await;
        assert_eq!(body["issued"], false);

        let (_, body) = send(&state, "POST", "/subway/station", Some(json!({"name": "大行宫"}))).await;
        assert_eq!(body["lines"], json!(["2号线", "3号线"]));

        let (_, body) = send(
            &state,
            "POST",
            "/subway/wheel",
            Some(json!({"origin": "panel", "delta_y": 100.0})),
        )
        .await;
        assert_eq!(body["outcome"], "isolated");

        let (status, _) = send(&state, "POST", "/subway/reset", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[test]
    fn plan_errors_map_to_statuses() {
        let cases = [
            (PlanError::MissingEndpoint, StatusCode::BAD_REQUEST),
            (
                PlanError::GeocodeFailure {
                    input: "nowhere".into(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                PlanError::RouteNotFound {
                    message: "none".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                PlanError::TopologyLookupMiss {
                    name: "9号线".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                PlanError::ResourceLoadTimeout {
                    after: Duration::from_secs(10),
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
        ];

        for (err, status) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
