//! Mock routing provider.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{Coordinate, TravelMode};
use crate::plan::SearchResponse;
use crate::provider::{
    MapSurface, ProviderError, ProviderPolicy, RoutingProvider, RoutingSession,
};

/// Routing provider that serves canned responses per travel mode.
///
/// The same response comes back for every search in a mode; endpoints and
/// policy are ignored. A mode with no response answers with a failure
/// status, as the real provider does when it finds no route.
#[derive(Clone)]
pub struct MockRoutingProvider {
    responses: Arc<RwLock<HashMap<TravelMode, SearchResponse>>>,
    latency: Duration,
}

impl MockRoutingProvider {
    /// Create a provider by loading JSON files from a directory.
    ///
    /// Expects files named `{mode}.json` (e.g. `driving.json`,
    /// `transit.json`), each holding one search response.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, ProviderError> {
        Ok(Self::from_responses(load_responses(data_dir.as_ref())?))
    }

    pub fn from_responses(responses: HashMap<TravelMode, SearchResponse>) -> Self {
        Self {
            responses: Arc::new(RwLock::new(responses)),
            latency: Duration::ZERO,
        }
    }

    /// Delays every search by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Modes that have a canned response.
    pub async fn available_modes(&self) -> Vec<TravelMode> {
        let responses = self.responses.read().await;
        TravelMode::ALL
            .into_iter()
            .filter(|m| responses.contains_key(m))
            .collect()
    }

    /// Reload fixtures from disk.
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<(), ProviderError> {
        let fresh = load_responses(data_dir.as_ref())?;
        *self.responses.write().await = fresh;
        Ok(())
    }
}

fn load_responses(data_dir: &Path) -> Result<HashMap<TravelMode, SearchResponse>, ProviderError> {
    let entries = std::fs::read_dir(data_dir).map_err(|e| {
        ProviderError::Fixture(format!("failed to read mock plan directory {:?}: {}", data_dir, e))
    })?;

    let mut responses = HashMap::new();
    for entry in entries {
        let path = entry
            .map_err(|e| ProviderError::Fixture(format!("failed to read directory entry: {}", e)))?
            .path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        // Files not named after a mode are skipped
        let Some(mode) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<TravelMode>().ok())
        else {
            continue;
        };

        let json = std::fs::read_to_string(&path)
            .map_err(|e| ProviderError::Fixture(format!("failed to read {:?}: {}", path, e)))?;
        let response: SearchResponse = serde_json::from_str(&json).map_err(|e| ProviderError::Json {
            message: format!("failed to parse {:?}: {}", path, e),
        })?;

        responses.insert(mode, response);
    }

    if responses.is_empty() {
        return Err(ProviderError::Fixture(format!(
            "no mock plan files found in {:?}",
            data_dir
        )));
    }

    Ok(responses)
}

impl RoutingProvider for MockRoutingProvider {
    fn create_session(
        &self,
        mode: TravelMode,
        policy: Option<ProviderPolicy>,
    ) -> Arc<dyn RoutingSession> {
        debug!(%mode, ?policy, "mock routing session created");
        Arc::new(MockSession {
            mode,
            responses: Arc::clone(&self.responses),
            latency: self.latency,
        })
    }
}

struct MockSession {
    mode: TravelMode,
    responses: Arc<RwLock<HashMap<TravelMode, SearchResponse>>>,
    latency: Duration,
}

impl RoutingSession for MockSession {
    fn search(
        &self,
        _start: Coordinate,
        _end: Coordinate,
    ) -> BoxFuture<'static, Result<SearchResponse, ProviderError>> {
        let mode = self.mode;
        let responses = Arc::clone(&self.responses);
        let latency = self.latency;

        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            let responses = responses.read().await;
            Ok(responses
                .get(&mode)
                .cloned()
                .unwrap_or_else(SearchResponse::failure))
        }
        .boxed()
    }

    fn clear_results(&self) {
        debug!(mode = %self.mode, "mock routing results cleared");
    }
}

/// Map surface that counts overlay clears.
#[derive(Debug, Default)]
pub struct MockMapSurface {
    clears: AtomicUsize,
}

impl MockMapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the overlays were cleared.
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl MapSurface for MockMapSurface {
    fn clear_overlays(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}
