//! Provider-formatted distance and duration values.
//!
//! The provider hands back both a raw number and display text. The core
//! only ever shows the text, but needs the number for decisions such as
//! suppressing zero-length walks.

use serde::{Deserialize, Serialize};

/// A distance with its display text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "DistanceRepr")]
pub struct Distance {
    pub meters: u32,
    pub text: String,
}

#[derive(Deserialize)]
struct DistanceRepr {
    meters: u32,
    text: Option<String>,
}

impl From<DistanceRepr> for Distance {
    fn from(repr: DistanceRepr) -> Self {
        match repr.text {
            Some(text) => Distance {
                meters: repr.meters,
                text,
            },
            None => Distance::from_meters(repr.meters),
        }
    }
}

impl Distance {
    /// Formats a metre count the way the provider does.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_planner::domain::Distance;
    ///
    /// assert_eq!(Distance::from_meters(50).text, "50m");
    /// assert_eq!(Distance::from_meters(1260).text, "1.3km");
    /// ```
    pub fn from_meters(meters: u32) -> Self {
        let text = if meters < 1000 {
            format!("{meters}m")
        } else {
            format!("{:.1}km", f64::from(meters) / 1000.0)
        };
        Self { meters, text }
    }

    /// Returns true if the distance is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.meters == 0
    }
}

/// A duration with its display text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "TravelTimeRepr")]
pub struct TravelTime {
    pub seconds: u32,
    pub text: String,
}

#[derive(Deserialize)]
struct TravelTimeRepr {
    seconds: u32,
    text: Option<String>,
}

impl From<TravelTimeRepr> for TravelTime {
    fn from(repr: TravelTimeRepr) -> Self {
        match repr.text {
            Some(text) => TravelTime {
                seconds: repr.seconds,
                text,
            },
            None => TravelTime::from_seconds(repr.seconds),
        }
    }
}

impl TravelTime {
    /// Formats a second count, rounded to the nearest minute.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_planner::domain::TravelTime;
    ///
    /// assert_eq!(TravelTime::from_seconds(1500).text, "25 min");
    /// assert_eq!(TravelTime::from_seconds(3900).text, "1 h 5 min");
    /// assert_eq!(TravelTime::from_seconds(7200).text, "2 h");
    /// ```
    pub fn from_seconds(seconds: u32) -> Self {
        let minutes = (seconds + 30) / 60;
        let text = match (minutes / 60, minutes % 60) {
            (0, m) => format!("{m} min"),
            (h, 0) => format!("{h} h"),
            (h, m) => format!("{h} h {m} min"),
        };
        Self { seconds, text }
    }
}
