//! Caching layer for geocoding results.
//!
//! Both matches and misses are cached, keyed by (text, city hint). Errors
//! are not cached, so a transient failure is retried on the next lookup.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use moka::future::Cache as MokaCache;

use crate::domain::Coordinate;
use crate::provider::{Geocoder, ProviderError};

type GeocodeKey = (String, String);

/// Configuration for the geocode cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Geocoder with caching.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: MokaCache<GeocodeKey, Option<Coordinate>>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    fn resolve<'a>(
        &'a self,
        text: &'a str,
        city_hint: &'a str,
    ) -> BoxFuture<'a, Result<Option<Coordinate>, ProviderError>> {
        async move {
            let key = (text.trim().to_string(), city_hint.to_string());

            if let Some(cached) = self.cache.get(&key).await {
                return Ok(cached);
            }

            let found = self.inner.resolve(text, city_hint).await?;
            self.cache.insert(key, found).await;
            Ok(found)
        }
        .boxed()
    }
}
