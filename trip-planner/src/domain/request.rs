//! Travel request type.

use serde::Serialize;

use crate::error::PlanError;

use super::{Coordinate, PolicyId, TravelMode};

/// One search action: where from, where to, how, and with which preference.
///
/// # Invariants
///
/// - A policy, if present on a driving or transit request, belongs to that mode
/// - Walking and riding requests keep any policy given but never forward it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelRequest {
    start: Coordinate,
    end: Coordinate,
    mode: TravelMode,
    policy: Option<PolicyId>,
}

impl TravelRequest {
    /// Builds a request, validating the policy against the mode.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidPolicy`] when a driving request carries a
    /// transit policy or vice versa.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_planner::domain::{Coordinate, PolicyId, TravelMode, TravelRequest};
    ///
    /// let a = Coordinate::new(118.78, 32.05);
    /// let b = Coordinate::new(118.79, 32.02);
    ///
    /// let req = TravelRequest::new(a, b, TravelMode::Walking, Some(PolicyId::DrivingDefault)).unwrap();
    /// assert_eq!(req.effective_policy(), None);
    ///
    /// assert!(TravelRequest::new(a, b, TravelMode::Driving, Some(PolicyId::TransitLeastTime)).is_err());
    /// ```
    pub fn new(
        start: Coordinate,
        end: Coordinate,
        mode: TravelMode,
        policy: Option<PolicyId>,
    ) -> Result<Self, PlanError> {
        if let Some(policy) = policy {
            if mode.accepts_policy() && policy.mode() != mode {
                return Err(PlanError::InvalidPolicy { mode, policy });
            }
        }

        Ok(Self {
            start,
            end,
            mode,
            policy,
        })
    }

    /// Returns the start point.
    pub fn start(&self) -> Coordinate {
        self.start
    }

    /// Returns the end point.
    pub fn end(&self) -> Coordinate {
        self.end
    }

    /// Returns the travel mode.
    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    /// Returns the policy exactly as requested.
    pub fn policy(&self) -> Option<PolicyId> {
        self.policy
    }

    /// Returns the policy to forward to the provider: `None` for modes
    /// that take no policy.
    pub fn effective_policy(&self) -> Option<PolicyId> {
        self.policy.filter(|_| self.mode.accepts_policy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> Coordinate {
        Coordinate::new(118.778074, 32.057236)
    }

    fn b() -> Coordinate {
        Coordinate::new(118.786001, 32.022747)
    }

    #[test]
    fn matching_policy_is_forwarded() {
        let req = TravelRequest::new(
            a(),
            b(),
            TravelMode::Transit,
            Some(PolicyId::TransitLeastTransfer),
        )
        .unwrap();

        assert_eq!(req.effective_policy(), Some(PolicyId::TransitLeastTransfer));
        assert_eq!(req.start(), a());
        assert_eq!(req.end(), b());
    }

    #[test]
    fn mismatched_policy_is_rejected() {
        let err = TravelRequest::new(
            a(),
            b(),
            TravelMode::Transit,
            Some(PolicyId::DrivingAvoidCongestion),
        )
        .unwrap_err();

        assert_eq!(
            err,
            PlanError::InvalidPolicy {
                mode: TravelMode::Transit,
                policy: PolicyId::DrivingAvoidCongestion,
            }
        );
    }

    #[test]
    fn policy_ignored_for_riding() {
        let req = TravelRequest::new(
            a(),
            b(),
            TravelMode::Riding,
            Some(PolicyId::TransitRecommend),
        )
        .unwrap();

        assert_eq!(req.policy(), Some(PolicyId::TransitRecommend));
        assert_eq!(req.effective_policy(), None);
    }

    #[test]
    fn no_policy_is_fine_everywhere() {
        for mode in TravelMode::ALL {
            let req = TravelRequest::new(a(), b(), mode, None).unwrap();
            assert_eq!(req.effective_policy(), None);
            assert_eq!(req.mode(), mode);
        }
    }
}
