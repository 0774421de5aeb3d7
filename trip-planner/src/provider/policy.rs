//! Mapping from policy identifiers to provider constants.
//!
//! This is the only place the provider's numeric policy values appear.

use crate::domain::PolicyId;

/// A provider-specific numeric policy constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProviderPolicy(pub u32);

/// Returns the provider constant for a policy.
pub fn policy_code(policy: PolicyId) -> ProviderPolicy {
    let code = match policy {
        PolicyId::DrivingDefault => 0,
        PolicyId::DrivingAvoidHighways => 3,
        PolicyId::DrivingFirstHighways => 4,
        PolicyId::DrivingAvoidCongestion => 5,
        PolicyId::TransitRecommend => 0,
        PolicyId::TransitLeastTransfer => 1,
        PolicyId::TransitLeastWalking => 2,
        PolicyId::TransitAvoidSubways => 3,
        PolicyId::TransitLeastTime => 4,
    };
    ProviderPolicy(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TravelMode;
    use std::collections::HashSet;

    #[test]
    fn codes_are_distinct_within_a_mode() {
        for mode in [TravelMode::Driving, TravelMode::Transit] {
            let codes: HashSet<ProviderPolicy> = PolicyId::for_mode(mode)
                .iter()
                .map(|p| policy_code(*p))
                .collect();
            assert_eq!(codes.len(), PolicyId::for_mode(mode).len());
        }
    }

    #[test]
    fn defaults_map_to_zero() {
        assert_eq!(policy_code(PolicyId::DrivingDefault), ProviderPolicy(0));
        assert_eq!(policy_code(PolicyId::TransitRecommend), ProviderPolicy(0));
    }
}
