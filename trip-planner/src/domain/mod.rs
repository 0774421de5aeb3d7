//! Domain types for the trip planner.
//!
//! Values here are validated at construction, so code that receives
//! them can trust their invariants without re-checking.

mod coordinate;
mod itinerary;
mod measure;
mod mode;
mod request;
mod topology;

pub use coordinate::Coordinate;
pub use itinerary::{Itinerary, Step, StepType};
pub use measure::{Distance, TravelTime};
pub use mode::{InvalidPolicyId, InvalidTravelMode, PolicyId, TravelMode};
pub use request::TravelRequest;
pub use topology::{Line, Station, Topology};
