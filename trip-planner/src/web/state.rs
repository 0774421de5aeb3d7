//! Application state for the web layer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::{CityConfig, RouteConfig};
use crate::panel::RouteSearchPanel;
use crate::provider::Geocoder;
use crate::route::RouteOrchestrator;
use crate::subway::OverlayController;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Route search orchestration
    pub routes: Arc<RouteOrchestrator>,

    /// Subway overlay
    pub overlay: OverlayController,

    /// Address resolution for panel inputs
    pub geocoder: Arc<dyn Geocoder>,

    /// Search panel selection state
    pub panel: Arc<Mutex<RouteSearchPanel>>,

    /// City the map is framed on
    pub city: Arc<CityConfig>,

    pub route_config: Arc<RouteConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        routes: RouteOrchestrator,
        overlay: OverlayController,
        geocoder: Arc<dyn Geocoder>,
        city: CityConfig,
        route_config: RouteConfig,
    ) -> Self {
        Self {
            routes: Arc::new(routes),
            overlay,
            geocoder,
            panel: Arc::new(Mutex::new(RouteSearchPanel::new())),
            city: Arc::new(city),
            route_config: Arc::new(route_config),
        }
    }

    /// Locks the panel. Never hold the guard across an await.
    pub fn panel(&self) -> MutexGuard<'_, RouteSearchPanel> {
        self.panel.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
