//! Overlay lifecycle: preload, poll until ready, render once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use serde::Serialize;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::OverlayConfig;
use crate::domain::{Line, Topology};
use crate::provider::{ProviderError, ScriptLoader, SubwaySurface};

use super::input::{InputOrigin, InputRoute, PanelEvent, WheelOutcome, dispatch};
use super::query::StationQuery;

/// Where the overlay is in its one-way lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// Nothing requested yet, or the last fetch failed
    Unloaded,
    /// Resource requested or present; surface not rendered yet
    Loading,
    Ready,
}

/// Point-in-time view of the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlaySnapshot {
    pub state: LoadState,
    pub script_loaded: bool,
    pub map_initialized: bool,
    pub current_zoom: f64,
    pub visible: bool,
    /// Line names once the topology is captured; empty before
    pub lines: Vec<String>,
}

/// The panel built once the surface has loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubwayPanel {
    pub line_options: Vec<String>,
    /// Event kinds the panel keeps from reaching the surface
    pub isolated_events: Vec<PanelEvent>,
}

#[derive(Debug)]
struct OverlayState {
    load: LoadState,
    visible: bool,
    initializing: bool,
    loading_shown: bool,
    map_initialized: bool,
    current_zoom: f64,
    last_zoom_at: Option<Instant>,
}

struct Shared {
    loader: Arc<dyn ScriptLoader>,
    surface: Arc<dyn SubwaySurface>,
    config: OverlayConfig,
    state: Mutex<OverlayState>,
    script_loaded: AtomicBool,
    topology: OnceLock<Arc<Topology>>,
    panel: OnceLock<SubwayPanel>,
    ready: watch::Sender<bool>,
}

/// Controls the subway overlay.
///
/// The handle is cheap to clone; clones share one overlay. The surface is
/// rendered at most once per controller no matter how often it is shown,
/// and the captured topology is read-only afterwards.
///
/// Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct OverlayController {
    shared: Arc<Shared>,
}

impl OverlayController {
    pub fn new(
        loader: Arc<dyn ScriptLoader>,
        surface: Arc<dyn SubwaySurface>,
        config: OverlayConfig,
    ) -> Self {
        let (ready, _) = watch::channel(false);
        let state = OverlayState {
            load: LoadState::Unloaded,
            visible: false,
            initializing: false,
            loading_shown: false,
            map_initialized: false,
            current_zoom: config.initial_zoom,
            last_zoom_at: None,
        };

        Self {
            shared: Arc::new(Shared {
                loader,
                surface,
                config,
                state: Mutex::new(state),
                script_loaded: AtomicBool::new(false),
                topology: OnceLock::new(),
                panel: OnceLock::new(),
                ready,
            }),
        }
    }

    /// Starts fetching the overlay resource without waiting for it.
    ///
    /// Idempotent: does nothing once a fetch is under way, the resource is
    /// present, or the overlay is ready. A failed fetch is logged and
    /// leaves the controller `Unloaded` so a later call can retry.
    pub fn preload(&self) {
        {
            let mut state = self.shared.lock();
            if state.load != LoadState::Unloaded {
                return;
            }
            state.load = LoadState::Loading;
        }

        if self.shared.loader.is_present() {
            self.shared.script_loaded.store(true, Ordering::SeqCst);
            debug!("subway script already present");
            return;
        }

        info!("preloading subway script");
        let fetch = self.shared.loader.load();
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            match fetch.await {
                Ok(()) => {
                    shared.script_loaded.store(true, Ordering::SeqCst);
                    info!("subway script loaded");
                }
                Err(e) => {
                    warn!(error = %e, "subway script failed to load");
                    let mut state = shared.lock();
                    if state.load == LoadState::Loading {
                        state.load = LoadState::Unloaded;
                    }
                }
            }
        });
    }

    /// Shows or hides the overlay. Never waits.
    ///
    /// The first show starts lazy initialization: a loading indicator,
    /// then a poll for the resource, then the one-time render.
    pub fn toggle(&self, show: bool) {
        self.shared.surface.set_visible(show);

        let (needs_preload, show_indicator) = {
            let mut state = self.shared.lock();
            state.visible = show;
            if !show || state.load == LoadState::Ready || state.initializing {
                debug!(visible = show, state = ?state.load, "overlay visibility set");
                return;
            }
            state.initializing = true;
            let show_indicator = !state.loading_shown;
            state.loading_shown = true;
            (state.load == LoadState::Unloaded, show_indicator)
        };

        if show_indicator {
            self.shared.surface.show_loading(true);
        }
        if needs_preload {
            self.preload();
        }

        debug!("starting overlay initialization");
        tokio::spawn(initialize(Arc::clone(&self.shared)));
    }

    /// Resolves once the overlay is ready.
    pub async fn ready(&self) {
        let mut rx = self.shared.ready.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// Returns true once the surface has rendered.
    pub fn is_ready(&self) -> bool {
        *self.shared.ready.borrow()
    }

    /// Applies a wheel event to the overlay zoom.
    ///
    /// Downward scrolling zooms out. Zoom changes closer together than the
    /// debounce window are dropped.
    pub fn on_wheel(&self, origin: InputOrigin, delta_y: f64) -> WheelOutcome {
        if dispatch(origin) == InputRoute::Panel {
            return WheelOutcome::Isolated;
        }

        let config = &self.shared.config;
        let zoom = {
            let mut state = self.shared.lock();
            if state.load != LoadState::Ready || delta_y == 0.0 {
                return WheelOutcome::Ignored;
            }

            let now = Instant::now();
            if let Some(last) = state.last_zoom_at {
                if now.duration_since(last) < config.wheel_debounce() {
                    return WheelOutcome::Debounced;
                }
            }

            let step = if delta_y > 0.0 {
                -config.zoom_step
            } else {
                config.zoom_step
            };
            let zoom = round_tenth((state.current_zoom + step).clamp(config.zoom_min, config.zoom_max));
            state.current_zoom = zoom;
            state.last_zoom_at = Some(now);
            zoom
        };

        self.shared.surface.set_zoom(zoom);
        WheelOutcome::Zoomed(zoom)
    }

    /// Returns the query layer, once ready.
    pub fn query(&self) -> Option<StationQuery> {
        if !self.is_ready() {
            return None;
        }
        let topology = self.shared.topology.get()?;
        Some(StationQuery::new(
            Arc::clone(topology),
            Arc::clone(&self.shared.surface),
            &self.shared.config,
        ))
    }

    /// Returns the panel built at load time.
    pub fn panel(&self) -> Option<&SubwayPanel> {
        self.shared.panel.get()
    }

    /// Resets the view through the query layer and the tracked zoom with it.
    /// Returns false if the overlay is not ready.
    pub fn reset(&self) -> bool {
        let Some(query) = self.query() else {
            return false;
        };
        let zoom = query.reset();
        self.shared.lock().current_zoom = zoom;
        true
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        let state = self.shared.lock();
        OverlaySnapshot {
            state: state.load,
            script_loaded: self.shared.script_loaded.load(Ordering::SeqCst),
            map_initialized: state.map_initialized,
            current_zoom: state.current_zoom,
            visible: state.visible,
            lines: self
                .shared
                .topology
                .get()
                .map(|t| t.line_names().into_iter().map(String::from).collect())
                .unwrap_or_default(),
        }
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, OverlayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resource_available(&self) -> bool {
        if self.script_loaded.load(Ordering::SeqCst) {
            return true;
        }
        if self.loader.is_present() {
            self.script_loaded.store(true, Ordering::SeqCst);
            return true;
        }
        false
    }

    async fn render(&self) -> Result<(), ProviderError> {
        let city_name = &self.config.city_name;
        let city = self
            .surface
            .cities()
            .into_iter()
            .find(|c| &c.name == city_name)
            .ok_or_else(|| ProviderError::CityNotFound(city_name.clone()))?;

        let lines = self.surface.mount(&city.code).await?;

        let zoom = {
            let mut state = self.lock();
            state.map_initialized = true;
            state.current_zoom
        };
        self.surface.set_zoom(zoom);

        self.on_loaded(lines);
        Ok(())
    }

    /// Captures the topology and builds the panel, each only once.
    fn on_loaded(&self, lines: Vec<Line>) {
        let topology = self.topology.get_or_init(|| {
            info!(lines = lines.len(), "subway topology captured");
            Arc::new(Topology::new(lines))
        });
        self.panel.get_or_init(|| SubwayPanel {
            line_options: topology.line_names().into_iter().map(String::from).collect(),
            isolated_events: PanelEvent::ISOLATED.to_vec(),
        });

        self.lock().load = LoadState::Ready;
        self.ready.send_replace(true);
        info!("subway overlay ready");
    }

    /// Ends an initialization attempt and hides its indicator.
    fn finish_attempt(&self) {
        let hide = {
            let mut state = self.lock();
            state.initializing = false;
            std::mem::replace(&mut state.loading_shown, false)
        };
        if hide {
            self.surface.show_loading(false);
        }
    }
}

async fn initialize(shared: Arc<Shared>) {
    tokio::time::sleep(shared.config.initial_delay()).await;

    while !shared.resource_available() {
        if shared.lock().load == LoadState::Unloaded {
            warn!("subway script unavailable; overlay not initialized");
            shared.finish_attempt();
            return;
        }
        tokio::time::sleep(shared.config.poll_interval()).await;
    }

    if let Err(e) = shared.render().await {
        error!(error = %e, "subway overlay failed to render");
    }
    shared.finish_attempt();
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
