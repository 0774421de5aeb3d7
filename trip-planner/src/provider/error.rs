//! Provider-side error types.

/// Errors raised by provider collaborators.
///
/// These never reach a UI directly; the orchestration layer converts
/// them into [`crate::error::PlanError`] kinds.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Provider returned an error status
    #[error("API error {status}: {message}")]
    Api { status: i32, message: String },

    /// A script resource failed to load
    #[error("script load failed: {0}")]
    ScriptLoad(String),

    /// The subway surface has no data for the configured city
    #[error("no subway data for city {0}")]
    CityNotFound(String),

    /// Mock fixture data could not be read
    #[error("fixture error: {0}")]
    Fixture(String),
}
