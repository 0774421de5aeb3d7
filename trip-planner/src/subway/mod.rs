//! The subway overlay.
//!
//! A secondary surface that is loaded lazily, shown and hidden on demand,
//! and queried by line or station once it has rendered.

mod input;
mod overlay;
mod query;

pub use input::{InputOrigin, InputRoute, PanelEvent, WheelOutcome, dispatch};
pub use overlay::{LoadState, OverlayController, OverlaySnapshot, SubwayPanel};
pub use query::{LineDetail, StationCard, StationQuery};
