//! Baidu geocoding API client.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::debug;

use crate::domain::Coordinate;
use crate::provider::{Geocoder, ProviderError};

/// Default endpoint for the geocoding v3 API.
const DEFAULT_BASE_URL: &str = "https://api.map.baidu.com/geocoding/v3/";

/// Status the API uses when it has no result for an address.
const STATUS_NO_RESULT: i32 = 1;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: i32,
    #[serde(default, alias = "msg")]
    message: Option<String>,
    #[serde(default)]
    result: Option<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    location: Coordinate,
}

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Application key sent as the `ak` parameter
    pub ak: String,
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    /// Create a new config with the given application key.
    pub fn new(ak: impl Into<String>) -> Self {
        Self {
            ak: ak.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Client for the Baidu geocoding API.
#[derive(Debug, Clone)]
pub struct BaiduGeocoder {
    http: reqwest::Client,
    config: GeocoderConfig,
}

impl BaiduGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    async fn fetch(&self, text: &str, city_hint: &str) -> Result<Option<Coordinate>, ProviderError> {
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("address", text),
                ("city", city_hint),
                ("output", "json"),
                ("ak", self.config.ak.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: i32::from(status.as_u16()),
                message: body,
            });
        }

        let body = response.text().await?;
        let location = parse_response(&body)?;
        debug!(text, found = location.is_some(), "geocoding response");
        Ok(location)
    }
}

impl Geocoder for BaiduGeocoder {
    fn resolve<'a>(
        &'a self,
        text: &'a str,
        city_hint: &'a str,
    ) -> BoxFuture<'a, Result<Option<Coordinate>, ProviderError>> {
        self.fetch(text, city_hint).boxed()
    }
}

/// Parses a geocoding response body.
///
/// A zero status carries the location; the no-result status means the
/// address is unknown. Any other status is an API error.
pub fn parse_response(body: &str) -> Result<Option<Coordinate>, ProviderError> {
    let response: GeocodeResponse = serde_json::from_str(body).map_err(|e| ProviderError::Json {
        message: e.to_string(),
    })?;

    match response.status {
        0 => response
            .result
            .map(|r| Some(r.location))
            .ok_or_else(|| ProviderError::Json {
                message: "success response without a result".to_string(),
            }),
        STATUS_NO_RESULT => Ok(None),
        status => Err(ProviderError::Api {
            status,
            message: response.message.unwrap_or_default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = GeocoderConfig::new("test-ak");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 10);

        let config = config.with_base_url("http://localhost:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn parse_location() {
        let body = r#"{
            "status": 0,
            "result": {
                "location": {"lng": 118.79412, "lat": 32.04540},
                "precise": 1,
                "confidence": 80,
                "comprehension": 100,
                "level": "旅游景点"
            }
        }"#;

        assert_eq!(
            parse_response(body).unwrap(),
            Some(Coordinate::new(118.79412, 32.04540))
        );
    }

    #[test]
    fn parse_no_result() {
        let body = r#"{"status": 1, "msg": "Internal Service Error:无相关结果", "results": []}"#;
        assert_eq!(parse_response(body).unwrap(), None);
    }

    #[test]
    fn parse_api_error() {
        let body = r#"{"status": 240, "message": "APP 服务被禁用"}"#;
        let err = parse_response(body).unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 240, .. }));
        assert!(err.to_string().contains("APP 服务被禁用"));
    }

    #[test]
    fn parse_garbage() {
        assert!(matches!(
            parse_response("<html>"),
            Err(ProviderError::Json { .. })
        ));
        assert!(matches!(
            parse_response(r#"{"status": 0}"#),
            Err(ProviderError::Json { .. })
        ));
    }
}
