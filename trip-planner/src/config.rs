//! Configuration for the planner core.
//!
//! Timing values are stored as plain integers and exposed as
//! [`Duration`]s, so configs stay trivially comparable and printable.

use std::time::Duration;

use crate::domain::Coordinate;

/// The city the main map is framed on.
#[derive(Debug, Clone, PartialEq)]
pub struct CityConfig {
    /// Full city name, used as the geocoding hint.
    pub name: String,

    pub center: Coordinate,

    pub default_zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            name: "南京市".to_string(),
            center: Coordinate::new(118.778074, 32.057236),
            default_zoom: 12,
            min_zoom: 10,
            max_zoom: 20,
        }
    }
}

/// Subway overlay behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// City name as the subway surface lists it.
    pub city_name: String,

    /// Delay before the first readiness check after a show (milliseconds).
    pub initial_delay_ms: u64,

    /// Interval between readiness checks (milliseconds).
    pub poll_interval_ms: u64,

    pub zoom_min: f64,
    pub zoom_max: f64,

    /// Zoom applied when the surface is first rendered and on reset.
    pub initial_zoom: f64,

    /// Zoom change per wheel notch.
    pub zoom_step: f64,

    /// Wheel events arriving faster than this are dropped (milliseconds).
    pub wheel_debounce_ms: u64,

    /// Station the view recenters on after a reset.
    pub reset_station: String,
}

impl OverlayConfig {
    /// Returns the initial readiness delay as a Duration.
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Returns the readiness poll interval as a Duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Returns the wheel debounce window as a Duration.
    pub fn wheel_debounce(&self) -> Duration {
        Duration::from_millis(self.wheel_debounce_ms)
    }

    /// Sets the city name.
    pub fn with_city(mut self, city_name: impl Into<String>) -> Self {
        self.city_name = city_name.into();
        self
    }

    /// Sets the readiness timing.
    pub fn with_polling(mut self, initial_delay_ms: u64, poll_interval_ms: u64) -> Self {
        self.initial_delay_ms = initial_delay_ms;
        self.poll_interval_ms = poll_interval_ms;
        self
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            city_name: "南京".to_string(),
            initial_delay_ms: 100,
            poll_interval_ms: 200,
            zoom_min: 0.3,
            zoom_max: 1.0,
            initial_zoom: 0.5,
            zoom_step: 0.1,
            wheel_debounce_ms: 50,
            reset_station: "新街口".to_string(),
        }
    }
}

/// Route search behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig {
    /// Message carried by the error event when no plan is usable.
    pub not_found_message: String,

    /// Buffered events per subscriber. A subscriber that falls further
    /// behind loses the oldest events.
    pub event_capacity: usize,

    /// How long a caller waits for a search outcome (seconds).
    pub response_timeout_secs: u64,
}

impl RouteConfig {
    /// Returns the response timeout as a Duration.
    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            not_found_message: "No suitable route found; try adjusting the start, end or policy"
                .to_string(),
            event_capacity: 16,
            response_timeout_secs: 30,
        }
    }
}

/// Core script bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapConfig {
    /// How long to wait for the core resource (seconds).
    pub timeout_secs: u64,
}

impl BootstrapConfig {
    /// Returns the timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}
