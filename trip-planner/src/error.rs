//! Errors surfaced at the core boundary.
//!
//! Provider-layer failures are converted into one of these kinds before
//! they reach a caller; no raw provider error crosses this boundary.

use std::time::Duration;

use crate::domain::{InvalidPolicyId, PolicyId, TravelMode};

/// Failures a host UI can observe.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// The provider search finished without a usable plan
    #[error("route not found: {message}")]
    RouteNotFound { message: String },

    /// Address text could not be resolved to a coordinate
    #[error("could not resolve location: {input}")]
    GeocodeFailure { input: String },

    /// A core provider resource did not become available in time
    #[error("provider resource not available after {after:?}")]
    ResourceLoadTimeout { after: Duration },

    /// A line or station name is absent from the captured topology
    #[error("no line or station named {name}")]
    TopologyLookupMiss { name: String },

    /// Policy belongs to a different travel mode
    #[error("policy {policy} cannot be used for {mode} routes")]
    InvalidPolicy { mode: TravelMode, policy: PolicyId },

    /// Unrecognised policy identifier
    #[error(transparent)]
    InvalidPolicyId(#[from] InvalidPolicyId),

    /// Start or end input was empty
    #[error("both a start and an end location are required")]
    MissingEndpoint,
}
