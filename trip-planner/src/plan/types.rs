//! Raw plan DTOs.
//!
//! These mirror what the routing provider hands back. They deserialize
//! from the fixture JSON used by the mock provider.

use serde::{Deserialize, Serialize};

use crate::domain::{Distance, TravelTime};

/// Vehicle kind code the provider uses for rail lines.
pub const RAIL_VEHICLE_KIND: i32 = 1;

/// Outcome status of a provider search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Success,
    Failure,
}

/// Everything a provider search produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub status: SearchStatus,
    #[serde(default)]
    pub plans: Vec<RawPlan>,
}

impl SearchResponse {
    /// A successful response carrying the given plans.
    pub fn success(plans: Vec<RawPlan>) -> Self {
        Self {
            status: SearchStatus::Success,
            plans,
        }
    }

    /// A failed response.
    pub fn failure() -> Self {
        Self {
            status: SearchStatus::Failure,
            plans: Vec::new(),
        }
    }

    /// Returns true if the provider reported success.
    pub fn is_success(&self) -> bool {
        self.status == SearchStatus::Success
    }

    /// Returns the plan at `index`, if present.
    pub fn plan(&self, index: usize) -> Option<&RawPlan> {
        self.plans.get(index)
    }
}

/// One itinerary as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlan {
    /// Provider total; may include parts not exposed as legs
    pub distance: Distance,
    /// Provider total; may include waiting time
    pub duration: TravelTime,
    pub legs: RawLegs,
}

/// Mode-specific leg layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RawLegs {
    /// Driving, walking or riding: routes made of directions
    Uniform { routes: Vec<RawRoute> },
    /// Transit: walk *i* precedes ride *i*, with an optional final walk
    Transit {
        rides: Vec<RideSegment>,
        walks: Vec<WalkSegment>,
    },
}

/// A route of textual directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRoute {
    pub distance: Distance,
    #[serde(default)]
    pub duration: TravelTime,
    #[serde(default)]
    pub directions: Vec<Direction>,
}

/// A single direction; `description` may contain provider markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub description: String,
    pub distance: Distance,
}

/// A stop reference on a ride segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRef {
    pub title: String,
}

impl StopRef {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Boarding a vehicle and riding to an alighting stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideSegment {
    /// Line name, e.g. "S1号线"
    pub title: String,
    pub boarding: StopRef,
    pub alighting: StopRef,
    /// Stops passed between boarding and alighting
    pub via_stops: u32,
    pub distance: Distance,
    #[serde(default)]
    pub duration: TravelTime,
    /// Provider vehicle code; see [`RAIL_VEHICLE_KIND`]
    pub vehicle_kind: i32,
}

impl RideSegment {
    /// Returns true if the provider classifies this vehicle as rail.
    pub fn is_rail(&self) -> bool {
        self.vehicle_kind == RAIL_VEHICLE_KIND
    }
}

/// Pedestrian movement between origin, stops and destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkSegment {
    pub distance: Distance,
    #[serde(default)]
    pub duration: TravelTime,
}
