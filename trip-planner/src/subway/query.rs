//! Line and station queries over the captured topology.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::OverlayConfig;
use crate::domain::Topology;
use crate::error::PlanError;
use crate::provider::{DirectionChannel, SubwaySurface};

/// A selected line: its stations and the highlighted terminal pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDetail {
    pub name: String,
    pub stations: Vec<String>,
    /// First terminal; absent for a line with no stations
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Detail card for a single station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationCard {
    pub name: String,
    /// Lines serving the station, in topology order
    pub lines: Vec<String>,
}

/// Queries against the subway surface once it has rendered.
///
/// Names are matched exactly against the topology captured at load time.
/// A name that is not in the topology is a silent no-op: nothing on the
/// surface changes and `None` comes back.
#[derive(Clone)]
pub struct StationQuery {
    topology: Arc<Topology>,
    surface: Arc<dyn SubwaySurface>,
    reset_station: String,
    initial_zoom: f64,
}

impl StationQuery {
    pub fn new(topology: Arc<Topology>, surface: Arc<dyn SubwaySurface>, config: &OverlayConfig) -> Self {
        Self {
            topology,
            surface,
            reset_station: config.reset_station.clone(),
            initial_zoom: config.initial_zoom,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Line selector options, in topology order.
    pub fn line_names(&self) -> Vec<&str> {
        self.topology.line_names()
    }

    /// Shows a line: clears earlier route and highlight renders, then
    /// highlights the path between the line's terminals.
    pub fn select_line(&self, name: &str) -> Option<LineDetail> {
        let Some(line) = self.topology.line(name) else {
            log_miss(name);
            return None;
        };

        self.clear_directions();
        self.surface.close_info_window();

        let terminals = line.terminals();
        if let Some((from, to)) = terminals {
            self.surface
                .search_direction(DirectionChannel::Highlight, &from.name, &to.name);
        }

        debug!(line = %line.name, stations = line.stations.len(), "line selected");

        Some(LineDetail {
            name: line.name.clone(),
            stations: line.stations.iter().map(|s| s.name.clone()).collect(),
            from: terminals.map(|(from, _)| from.name.clone()),
            to: terminals.map(|(_, to)| to.name.clone()),
        })
    }

    /// Issues a point-to-point query. Earlier renders are cleared even when
    /// an input is empty; returns true if a query was issued.
    ///
    /// The surface renders the result itself.
    pub fn query_route(&self, start: &str, end: &str) -> bool {
        let (start, end) = (start.trim(), end.trim());

        self.clear_directions();

        if start.is_empty() || end.is_empty() {
            debug!("subway route query missing an endpoint");
            return false;
        }

        self.surface
            .search_direction(DirectionChannel::Route, start, end);
        debug!(start, end, "subway route query issued");
        true
    }

    /// Opens the detail view for a station and recenters on it.
    pub fn select_station(&self, name: &str) -> Option<StationCard> {
        let name = name.trim();
        if !self.topology.has_station(name) {
            log_miss(name);
            return None;
        }

        self.surface.show_station_detail(name);
        self.surface.set_center(name);

        Some(StationCard {
            name: name.to_string(),
            lines: self
                .topology
                .lines_serving(name)
                .into_iter()
                .map(String::from)
                .collect(),
        })
    }

    /// A station tapped on the surface; same as selecting it.
    pub fn handle_tap(&self, name: &str) -> Option<StationCard> {
        self.select_station(name)
    }

    /// Clears every render and returns the view to its initial framing.
    /// Returns the zoom that was applied.
    pub fn reset(&self) -> f64 {
        self.clear_directions();
        self.surface.set_center(&self.reset_station);
        self.surface.set_zoom(self.initial_zoom);
        self.surface.close_info_window();
        self.initial_zoom
    }

    fn clear_directions(&self) {
        self.surface.clear_direction(DirectionChannel::Route);
        self.surface.clear_direction(DirectionChannel::Highlight);
    }
}

fn log_miss(name: &str) {
    let miss = PlanError::TopologyLookupMiss {
        name: name.to_string(),
    };
    debug!(error = %miss, "ignoring topology lookup");
}
