//! Normalized itinerary types.

use serde::{Deserialize, Serialize};

/// Semantic tag for a step, used by the UI to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    /// A driving, walking or riding direction
    Normal,
    /// A walk to a stop or to the destination
    Walk,
    /// A ride on a bus or other non-rail vehicle
    Bus,
    /// A ride on a rail vehicle
    Subway,
}

impl StepType {
    /// Returns true for ride steps (bus or subway).
    pub fn is_ride(self) -> bool {
        matches!(self, StepType::Bus | StepType::Subway)
    }
}

/// One instruction in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Instruction text, plain or lightly marked up
    pub instruction: String,
    /// Pre-formatted distance
    pub distance: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
}

impl Step {
    /// Creates a step.
    pub fn new(instruction: impl Into<String>, distance: impl Into<String>, step_type: StepType) -> Self {
        Self {
            instruction: instruction.into(),
            distance: distance.into(),
            step_type,
        }
    }
}

/// A complete, UI-ready route.
///
/// Produced whole for each search and replaced whole by the next; steps
/// from different searches are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Total distance as reported by the provider
    pub distance: String,
    /// Total duration as reported by the provider
    pub duration: String,
    /// Steps in traversal order
    pub steps: Vec<Step>,
}

impl Itinerary {
    /// Returns the number of ride steps.
    pub fn ride_count(&self) -> usize {
        self.steps.iter().filter(|s| s.step_type.is_ride()).count()
    }
}
