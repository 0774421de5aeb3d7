//! Mock subway surface and script loader.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::debug;

use crate::domain::Line;
use crate::provider::{DirectionChannel, ProviderError, ScriptLoader, SubwayCity, SubwaySurface};

/// Script loader whose fetch completes after a fixed delay.
#[derive(Debug)]
pub struct MockScriptLoader {
    present: Arc<AtomicBool>,
    latency: Duration,
    fail: bool,
    loads: AtomicUsize,
}

impl MockScriptLoader {
    /// A loader whose fetch succeeds after `latency`.
    pub fn new(latency: Duration) -> Self {
        Self {
            present: Arc::new(AtomicBool::new(false)),
            latency,
            fail: false,
            loads: AtomicUsize::new(0),
        }
    }

    /// A loader whose resource was fetched by someone else.
    pub fn already_present() -> Self {
        let loader = Self::new(Duration::ZERO);
        loader.present.store(true, Ordering::SeqCst);
        loader
    }

    /// A loader whose fetch always fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Duration::ZERO)
        }
    }

    /// Number of fetches started.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ScriptLoader for MockScriptLoader {
    fn is_present(&self) -> bool {
        self.present.load(Ordering::SeqCst)
    }

    fn load(&self) -> BoxFuture<'static, Result<(), ProviderError>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let present = Arc::clone(&self.present);
        let latency = self.latency;
        let fail = self.fail;

        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if fail {
                return Err(ProviderError::ScriptLoad("mock script unavailable".into()));
            }
            present.store(true, Ordering::SeqCst);
            Ok(())
        }
        .boxed()
    }
}

/// A call made on the mock subway surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Mount(String),
    SetZoom(f64),
    SetCenter(String),
    SetVisible(bool),
    ShowLoading(bool),
    SearchDirection {
        channel: DirectionChannel,
        start: String,
        end: String,
    },
    ClearDirection(DirectionChannel),
    ShowStationDetail(String),
    CloseInfoWindow,
}

#[derive(Deserialize)]
struct SubwayFixture {
    cities: Vec<SubwayCity>,
    lines: Vec<Line>,
}

/// Subway surface that serves a fixed network and records every call.
#[derive(Debug)]
pub struct MockSubwaySurface {
    cities: Vec<SubwayCity>,
    lines: Vec<Line>,
    mount_latency: Duration,
    calls: Mutex<Vec<SurfaceCall>>,
    mounts: AtomicUsize,
}

impl MockSubwaySurface {
    pub fn new(cities: Vec<SubwayCity>, lines: Vec<Line>) -> Self {
        Self {
            cities,
            lines,
            mount_latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            mounts: AtomicUsize::new(0),
        }
    }

    /// Load the city list and network from a JSON file.
    ///
    /// Expects `{"cities": [{"name", "code"}], "lines": [{"name", "stations"}]}`.
    pub fn from_fixture(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::Fixture(format!("failed to read {:?}: {}", path, e)))?;
        let fixture: SubwayFixture = serde_json::from_str(&json).map_err(|e| ProviderError::Json {
            message: format!("failed to parse {:?}: {}", path, e),
        })?;

        Ok(Self::new(fixture.cities, fixture.lines))
    }

    /// Delays the loaded signal after a mount.
    pub fn with_mount_latency(mut self, latency: Duration) -> Self {
        self.mount_latency = latency;
        self
    }

    /// Every call so far, oldest first.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls_guard().clone()
    }

    /// Number of times the surface was mounted.
    pub fn mount_count(&self) -> usize {
        self.mounts.load(Ordering::SeqCst)
    }

    fn record(&self, call: SurfaceCall) {
        debug!(?call, "mock subway surface call");
        self.calls_guard().push(call);
    }

    fn calls_guard(&self) -> std::sync::MutexGuard<'_, Vec<SurfaceCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SubwaySurface for MockSubwaySurface {
    fn cities(&self) -> Vec<SubwayCity> {
        self.cities.clone()
    }

    fn mount(&self, city_code: &str) -> BoxFuture<'static, Result<Vec<Line>, ProviderError>> {
        self.mounts.fetch_add(1, Ordering::SeqCst);
        self.record(SurfaceCall::Mount(city_code.to_string()));

        let known = self.cities.iter().any(|c| c.code == city_code);
        let city_code = city_code.to_string();
        let lines = self.lines.clone();
        let latency = self.mount_latency;

        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if !known {
                return Err(ProviderError::CityNotFound(city_code));
            }
            Ok(lines)
        }
        .boxed()
    }

    fn set_zoom(&self, zoom: f64) {
        self.record(SurfaceCall::SetZoom(zoom));
    }

    fn set_center(&self, station: &str) {
        self.record(SurfaceCall::SetCenter(station.to_string()));
    }

    fn set_visible(&self, visible: bool) {
        self.record(SurfaceCall::SetVisible(visible));
    }

    fn show_loading(&self, show: bool) {
        self.record(SurfaceCall::ShowLoading(show));
    }

    fn search_direction(&self, channel: DirectionChannel, start: &str, end: &str) {
        self.record(SurfaceCall::SearchDirection {
            channel,
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    fn clear_direction(&self, channel: DirectionChannel) {
        self.record(SurfaceCall::ClearDirection(channel));
    }

    fn show_station_detail(&self, station: &str) {
        self.record(SurfaceCall::ShowStationDetail(station.to_string()));
    }

    fn close_info_window(&self) {
        self.record(SurfaceCall::CloseInfoWindow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_subway_fixture() {
        let surface = MockSubwaySurface::from_fixture("data/subway/nanjing.json").unwrap();

        let cities = surface.cities();
        assert!(cities.iter().any(|c| c.name == "南京" && c.code == "320100"));
        assert_eq!(surface.lines.len(), 4);
        assert!(surface.lines.iter().any(|l| l.name == "S1号线"));
    }

    #[test]
    fn missing_fixture_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MockSubwaySurface::from_fixture(dir.path().join("nowhere.json"));
        assert!(matches!(result, Err(ProviderError::Fixture(_))));
    }

    #[tokio::test]
    async fn mount_unknown_city_fails() {
        let surface = MockSubwaySurface::from_fixture("data/subway/nanjing.json").unwrap();

        let result = surface.mount("110000").await;
        assert!(matches!(result, Err(ProviderError::CityNotFound(_))));
        assert_eq!(surface.mount_count(), 1);
        assert_eq!(surface.calls(), vec![SurfaceCall::Mount("110000".into())]);
    }

    #[tokio::test]
    async fn loader_marks_present_after_fetch() {
        let loader = MockScriptLoader::new(Duration::ZERO);
        assert!(!loader.is_present());

        loader.load().await.unwrap();
        assert!(loader.is_present());
        assert_eq!(loader.load_count(), 1);

        let failing = MockScriptLoader::failing();
        assert!(failing.load().await.is_err());
        assert!(!failing.is_present());
    }
}
