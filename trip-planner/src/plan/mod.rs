//! Raw provider plans and a uniform view over them.
//!
//! The provider returns differently shaped plans per travel mode:
//! driving, walking and riding produce routes made of directions, while
//! transit produces interleaved walk and ride segments. [`PlanView`]
//! exposes both through one accessor set without reformatting anything.

mod types;
mod view;

pub use types::{
    Direction, RAIL_VEHICLE_KIND, RawLegs, RawPlan, RawRoute, RideSegment, SearchResponse,
    SearchStatus, StopRef, WalkSegment,
};
pub use view::{LegRef, PlanView};
