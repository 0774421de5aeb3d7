//! Fixture-driven stand-ins for the mapping provider.
//!
//! Useful for development and testing without provider access: routing
//! responses and the subway network are read from JSON files, and the
//! surfaces record what they were asked to do.

mod routing;
mod subway;

pub use routing::{MockMapSurface, MockRoutingProvider};
pub use subway::{MockScriptLoader, MockSubwaySurface, SurfaceCall};
