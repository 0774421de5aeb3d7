//! Route search panel state.
//!
//! Tracks which endpoint is waiting for a map click, the points picked on
//! the map, and the selected travel mode, and turns the panel's text
//! inputs into a [`TravelRequest`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Coordinate, PolicyId, TravelMode, TravelRequest};
use crate::error::PlanError;
use crate::provider::Geocoder;

/// One end of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

/// Which endpoint, if any, the next map click sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    #[default]
    None,
    Start,
    End,
}

impl From<Endpoint> for SelectionState {
    fn from(endpoint: Endpoint) -> Self {
        match endpoint {
            Endpoint::Start => SelectionState::Start,
            Endpoint::End => SelectionState::End,
        }
    }
}

/// An entry in the policy selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyOption {
    /// `None` for modes without a policy
    pub value: Option<PolicyId>,
    pub label: &'static str,
}

/// Policy selector entries for a mode. Modes without policies get a single
/// "standard route" entry.
pub fn policy_options(mode: TravelMode) -> Vec<PolicyOption> {
    let policies = PolicyId::for_mode(mode);
    if policies.is_empty() {
        return vec![PolicyOption {
            value: None,
            label: "Standard route",
        }];
    }

    policies
        .iter()
        .map(|p| PolicyOption {
            value: Some(*p),
            label: p.label(),
        })
        .collect()
}

/// Panel state for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSearchPanel {
    selection: SelectionState,
    start: Option<Coordinate>,
    end: Option<Coordinate>,
    mode: TravelMode,
}

impl Default for RouteSearchPanel {
    fn default() -> Self {
        Self {
            selection: SelectionState::None,
            start: None,
            end: None,
            mode: TravelMode::Driving,
        }
    }
}

impl RouteSearchPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    /// The point picked on the map for an endpoint.
    pub fn selected(&self, endpoint: Endpoint) -> Option<Coordinate> {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    /// Arms the next map click to set `endpoint`.
    pub fn begin_pick(&mut self, endpoint: Endpoint) {
        self.selection = endpoint.into();
    }

    /// Applies a map click. Returns the endpoint it set and the text to put
    /// in that endpoint's input, or `None` if no pick was pending.
    pub fn handle_map_click(&mut self, point: Coordinate) -> Option<(Endpoint, String)> {
        let endpoint = match std::mem::take(&mut self.selection) {
            SelectionState::None => return None,
            SelectionState::Start => Endpoint::Start,
            SelectionState::End => Endpoint::End,
        };

        match endpoint {
            Endpoint::Start => self.start = Some(point),
            Endpoint::End => self.end = Some(point),
        }
        debug!(?endpoint, %point, "endpoint picked on map");

        Some((endpoint, point.label()))
    }

    pub fn clear_point(&mut self, endpoint: Endpoint) {
        match endpoint {
            Endpoint::Start => self.start = None,
            Endpoint::End => self.end = None,
        }
    }

    /// Forgets both points and any pending pick. The caller clears the
    /// route itself.
    pub fn clear_all(&mut self) {
        self.start = None;
        self.end = None;
        self.selection = SelectionState::None;
    }

    /// Switches mode and returns the policy options for it.
    pub fn set_mode(&mut self, mode: TravelMode) -> Vec<PolicyOption> {
        self.mode = mode;
        policy_options(mode)
    }

    /// Captures what a search needs from the panel.
    ///
    /// # Errors
    ///
    /// [`PlanError::MissingEndpoint`] if either input is blank.
    pub fn search_inputs(&self, start: &str, end: &str) -> Result<SearchInputs, PlanError> {
        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            return Err(PlanError::MissingEndpoint);
        }

        Ok(SearchInputs {
            start: (start.to_string(), self.start),
            end: (end.to_string(), self.end),
            mode: self.mode,
        })
    }
}

/// Panel inputs detached from the panel, so resolution can run without
/// holding on to panel state.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchInputs {
    start: (String, Option<Coordinate>),
    end: (String, Option<Coordinate>),
    mode: TravelMode,
}

impl SearchInputs {
    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    /// Resolves both endpoints and builds the request.
    pub async fn build_request(
        &self,
        policy: Option<PolicyId>,
        geocoder: &dyn Geocoder,
        city_hint: &str,
    ) -> Result<TravelRequest, PlanError> {
        let start = resolve_location(&self.start.0, self.start.1, geocoder, city_hint).await?;
        let end = resolve_location(&self.end.0, self.end.1, geocoder, city_hint).await?;
        TravelRequest::new(start, end, self.mode, policy)
    }
}

/// Turns input text into a coordinate.
///
/// Input containing a comma stands for the point picked on the map, when
/// there is one. Otherwise a `"lng, lat"` label is taken literally, and
/// anything else is geocoded.
///
/// # Errors
///
/// [`PlanError::GeocodeFailure`] when the geocoder finds nothing or fails.
pub async fn resolve_location(
    input: &str,
    selected: Option<Coordinate>,
    geocoder: &dyn Geocoder,
    city_hint: &str,
) -> Result<Coordinate, PlanError> {
    if let Some(point) = selected.filter(|_| input.contains(',')) {
        return Ok(point);
    }
    if let Some(point) = Coordinate::parse_label(input) {
        return Ok(point);
    }

    let failure = || PlanError::GeocodeFailure {
        input: input.to_string(),
    };

    match geocoder.resolve(input, city_hint).await {
        Ok(Some(point)) => Ok(point),
        Ok(None) => {
            debug!(input, "no geocoding match");
            Err(failure())
        }
        Err(e) => {
            warn!(input, error = %e, "geocoding failed");
            Err(failure())
        }
    }
}
