use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use trip_planner::bootstrap::await_core;
use trip_planner::config::{BootstrapConfig, CityConfig, OverlayConfig, RouteConfig};
use trip_planner::geocode::{
    BaiduGeocoder, CacheConfig, CachedGeocoder, GeocoderChain, GeocoderConfig, LandmarkGeocoder,
};
use trip_planner::mock::{MockMapSurface, MockRoutingProvider, MockScriptLoader, MockSubwaySurface};
use trip_planner::route::RouteOrchestrator;
use trip_planner::subway::OverlayController;
use trip_planner::web::{AppState, create_router};

/// Simulated fetch time of the map scripts when running on fixtures.
const MOCK_SCRIPT_LATENCY: Duration = Duration::from_millis(300);

fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter = EnvFilter::try_new(rust_log).unwrap_or_else(|err| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            err,
        );
        EnvFilter::new(default_level.to_string())
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let data_dir = std::env::var("TRIP_PLANNER_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));

    // The core map script must be there before anything else is wired
    let core_loader = MockScriptLoader::new(MOCK_SCRIPT_LATENCY);
    await_core(&core_loader, &BootstrapConfig::default()).await?;

    let city = CityConfig::default();

    // Landmarks first, then the provider API when a key is configured
    let mut geocoder = GeocoderChain::new().with(Arc::new(LandmarkGeocoder::nanjing()));
    match std::env::var("BAIDU_MAP_AK") {
        Ok(ak) if !ak.is_empty() => {
            let baidu = BaiduGeocoder::new(GeocoderConfig::new(ak))?;
            geocoder = geocoder.with(Arc::new(CachedGeocoder::new(baidu, &CacheConfig::default())));
            info!("geocoding through the provider API");
        }
        _ => warn!("BAIDU_MAP_AK not set; only landmark names and coordinates will resolve"),
    }

    let provider = MockRoutingProvider::new(data_dir.join("mock_plans"))?;
    info!(modes = ?provider.available_modes().await, "loaded mock routing plans");

    let route_config = RouteConfig::default();
    let routes = RouteOrchestrator::new(
        Arc::new(provider),
        Arc::new(MockMapSurface::new()),
        route_config.clone(),
    );

    let surface = MockSubwaySurface::from_fixture(data_dir.join("subway").join("nanjing.json"))?;
    let overlay = OverlayController::new(
        Arc::new(MockScriptLoader::new(MOCK_SCRIPT_LATENCY)),
        Arc::new(surface),
        OverlayConfig::default(),
    );
    // Start the subway fetch now so the first show is quick
    overlay.preload();

    let state = AppState::new(routes, overlay, Arc::new(geocoder), city, route_config);
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("TRIP_PLANNER_ADDR")
        .ok()
        .and_then(|a| a.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

    info!("Trip planner listening on http://{addr}");
    info!("  POST /route/search   - Plan a route");
    info!("  POST /subway/toggle  - Show or hide the subway overlay");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
