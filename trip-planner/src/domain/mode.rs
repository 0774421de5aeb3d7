//! Travel modes and routing policies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an unknown travel mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode: {0}")]
pub struct InvalidTravelMode(String);

/// Error returned when parsing an unknown policy identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown routing policy: {0}")]
pub struct InvalidPolicyId(String);

/// How the traveller moves between the two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Transit,
    Walking,
    Riding,
}

impl TravelMode {
    /// Every supported mode, in selector order.
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Driving,
        TravelMode::Transit,
        TravelMode::Walking,
        TravelMode::Riding,
    ];

    /// Returns the lowercase mode name.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Transit => "transit",
            TravelMode::Walking => "walking",
            TravelMode::Riding => "riding",
        }
    }

    /// Returns true if the provider honours a routing policy for this mode.
    pub fn accepts_policy(self) -> bool {
        matches!(self, TravelMode::Driving | TravelMode::Transit)
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = InvalidTravelMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TravelMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| InvalidTravelMode(s.to_string()))
    }
}

/// A routing preference understood by the provider.
///
/// The set is closed: identifiers are validated when a request is built,
/// and the provider's numeric constants are looked up only at the
/// provider edge (see [`crate::provider::policy_code`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyId {
    DrivingDefault,
    DrivingFirstHighways,
    DrivingAvoidHighways,
    DrivingAvoidCongestion,
    TransitRecommend,
    TransitLeastTime,
    TransitLeastTransfer,
    TransitLeastWalking,
    TransitAvoidSubways,
}

const DRIVING_POLICIES: [PolicyId; 4] = [
    PolicyId::DrivingDefault,
    PolicyId::DrivingFirstHighways,
    PolicyId::DrivingAvoidHighways,
    PolicyId::DrivingAvoidCongestion,
];

const TRANSIT_POLICIES: [PolicyId; 5] = [
    PolicyId::TransitRecommend,
    PolicyId::TransitLeastTime,
    PolicyId::TransitLeastTransfer,
    PolicyId::TransitLeastWalking,
    PolicyId::TransitAvoidSubways,
];

impl PolicyId {
    /// Policies offered for a mode, in selector order. Empty for modes
    /// that take no policy.
    pub fn for_mode(mode: TravelMode) -> &'static [PolicyId] {
        match mode {
            TravelMode::Driving => &DRIVING_POLICIES,
            TravelMode::Transit => &TRANSIT_POLICIES,
            TravelMode::Walking | TravelMode::Riding => &[],
        }
    }

    /// The mode this policy applies to.
    pub fn mode(self) -> TravelMode {
        match self {
            PolicyId::DrivingDefault
            | PolicyId::DrivingFirstHighways
            | PolicyId::DrivingAvoidHighways
            | PolicyId::DrivingAvoidCongestion => TravelMode::Driving,
            PolicyId::TransitRecommend
            | PolicyId::TransitLeastTime
            | PolicyId::TransitLeastTransfer
            | PolicyId::TransitLeastWalking
            | PolicyId::TransitAvoidSubways => TravelMode::Transit,
        }
    }

    /// The provider-style identifier, e.g. `BMAP_DRIVING_POLICY_DEFAULT`.
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyId::DrivingDefault => "BMAP_DRIVING_POLICY_DEFAULT",
            PolicyId::DrivingFirstHighways => "BMAP_DRIVING_POLICY_FIRST_HIGHWAYS",
            PolicyId::DrivingAvoidHighways => "BMAP_DRIVING_POLICY_AVOID_HIGHWAYS",
            PolicyId::DrivingAvoidCongestion => "BMAP_DRIVING_POLICY_AVOID_CONGESTION",
            PolicyId::TransitRecommend => "BMAP_TRANSIT_POLICY_RECOMMEND",
            PolicyId::TransitLeastTime => "BMAP_TRANSIT_POLICY_LEAST_TIME",
            PolicyId::TransitLeastTransfer => "BMAP_TRANSIT_POLICY_LEAST_TRANSFER",
            PolicyId::TransitLeastWalking => "BMAP_TRANSIT_POLICY_LEAST_WALKING",
            PolicyId::TransitAvoidSubways => "BMAP_TRANSIT_POLICY_AVOID_SUBWAYS",
        }
    }

    /// Human-readable label for a policy selector.
    pub fn label(self) -> &'static str {
        match self {
            PolicyId::DrivingDefault => "Default",
            PolicyId::DrivingFirstHighways => "Prefer highways",
            PolicyId::DrivingAvoidHighways => "Avoid highways",
            PolicyId::DrivingAvoidCongestion => "Avoid congestion",
            PolicyId::TransitRecommend => "Recommended",
            PolicyId::TransitLeastTime => "Fastest",
            PolicyId::TransitLeastTransfer => "Fewest transfers",
            PolicyId::TransitLeastWalking => "Least walking",
            PolicyId::TransitAvoidSubways => "No subway",
        }
    }

    /// Parses an optional identifier where an empty string means "no policy".
    pub fn parse_optional(s: &str) -> Result<Option<Self>, InvalidPolicyId> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyId {
    type Err = InvalidPolicyId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DRIVING_POLICIES
            .iter()
            .chain(TRANSIT_POLICIES.iter())
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| InvalidPolicyId(s.to_string()))
    }
}

impl Serialize for PolicyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PolicyId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
