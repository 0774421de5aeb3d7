//! Collaborator contracts for the mapping provider.
//!
//! Rendering, geocoding and route computation all live on the provider
//! side. This module defines the seams the core calls through, so the
//! orchestration logic can run against the real provider, the fixture
//! mocks in [`crate::mock`], or test doubles.

mod error;
mod policy;

use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, Line, TravelMode};
use crate::plan::SearchResponse;

pub use error::ProviderError;
pub use policy::{ProviderPolicy, policy_code};

/// Creates routing sessions scoped to one mode and policy.
pub trait RoutingProvider: Send + Sync {
    fn create_session(
        &self,
        mode: TravelMode,
        policy: Option<ProviderPolicy>,
    ) -> Arc<dyn RoutingSession>;
}

/// One provider routing session.
///
/// A session renders its own result on the map, which is why it must be
/// cleared before another session's result can be shown.
pub trait RoutingSession: Send + Sync {
    /// Runs the search. The returned future owns everything it needs.
    fn search(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> BoxFuture<'static, Result<SearchResponse, ProviderError>>;

    /// Removes anything this session rendered.
    fn clear_results(&self);
}

/// The main map surface.
pub trait MapSurface: Send + Sync {
    /// Removes every overlay (markers, paths) from the map.
    fn clear_overlays(&self);
}

/// Text to coordinate resolution.
pub trait Geocoder: Send + Sync {
    /// Resolves `text`, using `city_hint` to disambiguate.
    /// `Ok(None)` means the provider found no match.
    fn resolve<'a>(
        &'a self,
        text: &'a str,
        city_hint: &'a str,
    ) -> BoxFuture<'a, Result<Option<Coordinate>, ProviderError>>;
}

/// Fetches the script resource that backs a rendering surface.
pub trait ScriptLoader: Send + Sync {
    /// Returns true if the resource is already available (loaded by
    /// someone else, or a previous fetch completed).
    fn is_present(&self) -> bool;

    /// Starts fetching the resource; resolves when it has loaded.
    fn load(&self) -> BoxFuture<'static, Result<(), ProviderError>>;
}

/// A city the subway surface has a network for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubwayCity {
    pub name: String,
    pub code: String,
}

/// Which direction renderer a subway search draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionChannel {
    /// Point-to-point route queries, with a result panel
    Route,
    /// Whole-line highlighting between terminals
    Highlight,
}

/// The subway rendering surface.
pub trait SubwaySurface: Send + Sync {
    /// Cities with subway data, available once the script has loaded.
    fn cities(&self) -> Vec<SubwayCity>;

    /// Constructs the surface for a city. Resolves when the surface
    /// reports it has loaded, with the city's line topology.
    fn mount(&self, city_code: &str) -> BoxFuture<'static, Result<Vec<Line>, ProviderError>>;

    fn set_zoom(&self, zoom: f64);

    /// Recenters on a named station.
    fn set_center(&self, station: &str);

    /// Shows or hides the surface without destroying it.
    fn set_visible(&self, visible: bool);

    fn show_loading(&self, show: bool);

    /// Draws a path between two named stations on a channel.
    fn search_direction(&self, channel: DirectionChannel, start: &str, end: &str);

    fn clear_direction(&self, channel: DirectionChannel);

    /// Opens the detail view for a station.
    fn show_station_detail(&self, station: &str);

    fn close_info_window(&self);
}
