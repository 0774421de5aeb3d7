//! Text to coordinate resolution.
//!
//! [`BaiduGeocoder`] calls the provider's geocoding API;
//! [`LandmarkGeocoder`] answers offline for well-known places in the city.
//! [`GeocoderChain`] tries several in order and [`CachedGeocoder`] puts a
//! cache in front of any of them.

mod baidu;
mod cache;
mod landmarks;

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::domain::Coordinate;
use crate::provider::{Geocoder, ProviderError};

pub use baidu::{BaiduGeocoder, GeocoderConfig, parse_response};
pub use cache::{CacheConfig, CachedGeocoder};
pub use landmarks::{Landmark, LandmarkGeocoder};

/// Tries geocoders in order and returns the first match.
///
/// An error from one geocoder does not stop the chain. The result is
/// `Ok(None)` if at least one geocoder answered without a match, or the
/// last error if every geocoder failed.
#[derive(Clone, Default)]
pub struct GeocoderChain {
    geocoders: Vec<Arc<dyn Geocoder>>,
}

impl GeocoderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a geocoder to the end of the chain.
    pub fn with(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoders.push(geocoder);
        self
    }

    pub fn len(&self) -> usize {
        self.geocoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geocoders.is_empty()
    }
}

impl Geocoder for GeocoderChain {
    fn resolve<'a>(
        &'a self,
        text: &'a str,
        city_hint: &'a str,
    ) -> BoxFuture<'a, Result<Option<Coordinate>, ProviderError>> {
        async move {
            let mut last_error = None;
            let mut answered = false;

            for geocoder in &self.geocoders {
                match geocoder.resolve(text, city_hint).await {
                    Ok(Some(coord)) => {
                        debug!(text, %coord, "geocoded");
                        return Ok(Some(coord));
                    }
                    Ok(None) => answered = true,
                    Err(e) => {
                        warn!(text, error = %e, "geocoder failed");
                        last_error = Some(e);
                    }
                }
            }

            match last_error {
                Some(e) if !answered => Err(e),
                _ => Ok(None),
            }
        }
        .boxed()
    }
}
