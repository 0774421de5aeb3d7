//! Subway lines and stations.

use serde::{Deserialize, Serialize};

/// A named station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
}

impl Station {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A line with its stations in running order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub name: String,
    #[serde(default)]
    pub stations: Vec<Station>,
}

impl Line {
    /// Returns the first and last station, if the line has any.
    pub fn terminals(&self) -> Option<(&Station, &Station)> {
        Some((self.stations.first()?, self.stations.last()?))
    }

    /// Returns true if the line calls at the named station.
    pub fn serves(&self, station: &str) -> bool {
        self.stations.iter().any(|s| s.name == station)
    }
}

/// The fixed line/station network for the session.
///
/// Captured once when the overlay finishes loading and never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Topology {
    lines: Vec<Line>,
}

impl Topology {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// All lines in provider order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Looks up a line by exact name.
    pub fn line(&self, name: &str) -> Option<&Line> {
        self.lines.iter().find(|l| l.name == name)
    }

    /// Returns true if any line serves the named station.
    pub fn has_station(&self, name: &str) -> bool {
        self.lines.iter().any(|l| l.serves(name))
    }

    /// Names of the lines serving a station, in provider order.
    pub fn lines_serving(&self, station: &str) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.serves(station))
            .map(|l| l.name.as_str())
            .collect()
    }

    /// Line names in provider order.
    pub fn line_names(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
