//! Geographic point type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in the provider's coordinate system.
///
/// The core never transforms coordinates; they are passed to the
/// provider exactly as received.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    /// Creates a coordinate from longitude and latitude.
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Short label used as input text after a map click, e.g. `"118.7781, 32.0572"`.
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.lng, self.lat)
    }

    /// Parses a `"lng, lat"` label back into a coordinate.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_planner::domain::Coordinate;
    ///
    /// let c = Coordinate::parse_label("118.7781, 32.0572").unwrap();
    /// assert_eq!(c, Coordinate::new(118.7781, 32.0572));
    ///
    /// assert!(Coordinate::parse_label("Xinjiekou").is_none());
    /// assert!(Coordinate::parse_label("118.7781").is_none());
    /// ```
    pub fn parse_label(s: &str) -> Option<Self> {
        let (lng, lat) = s.split_once(',')?;
        let lng: f64 = lng.trim().parse().ok()?;
        let lat: f64 = lat.trim().parse().ok()?;
        if !lng.is_finite() || !lat.is_finite() {
            return None;
        }
        Some(Self { lng, lat })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lng, self.lat)
    }
}
