//! Itinerary normalization.
//!
//! Converts a raw provider plan into one ordered list of typed steps.
//! Each travel mode has its own strategy; all of them return the same
//! [`Step`] shape so the UI never needs to know which mode produced it.

mod markup;

use tracing::{debug, warn};

use crate::domain::{Itinerary, Step, StepType, TravelMode};
use crate::plan::{PlanView, RideSegment};

pub use markup::strip_markup;

/// Normalizes a plan into an itinerary.
///
/// Totals come from the plan itself, never from summing steps: the
/// provider's totals may include waiting time the legs do not expose.
pub fn normalize(view: &PlanView<'_>) -> Itinerary {
    let steps = match view.mode() {
        TravelMode::Driving => driving_steps(view),
        TravelMode::Walking => walking_steps(view),
        TravelMode::Riding => riding_steps(view),
        TravelMode::Transit => transit_steps(view),
    };

    debug!(mode = %view.mode(), steps = steps.len(), "normalized plan");

    Itinerary {
        distance: view.total_distance().text.clone(),
        duration: view.total_duration().text.clone(),
        steps,
    }
}

fn driving_steps(view: &PlanView<'_>) -> Vec<Step> {
    direction_steps(view)
}

fn walking_steps(view: &PlanView<'_>) -> Vec<Step> {
    direction_steps(view)
}

fn riding_steps(view: &PlanView<'_>) -> Vec<Step> {
    direction_steps(view)
}

/// Steps for modes whose plan is a single route of directions.
fn direction_steps(view: &PlanView<'_>) -> Vec<Step> {
    let Some(route) = view.route(0) else {
        if view.is_transit() {
            warn!(mode = %view.mode(), "transit-shaped plan for a direction mode");
        }
        return Vec::new();
    };

    route
        .directions
        .iter()
        .map(|d| Step::new(strip_markup(&d.description), d.distance.text.clone(), StepType::Normal))
        .collect()
}

/// Steps for transit: walk to each boarding stop, ride, and a final walk.
///
/// Zero-length walks are dropped (the rider is already at the stop).
/// Zero-length rides are kept.
fn transit_steps(view: &PlanView<'_>) -> Vec<Step> {
    let ride_count = view.ride_count();
    let mut steps = Vec::with_capacity(ride_count * 2 + 1);

    for i in 0..ride_count {
        let Some(ride) = view.ride(i) else {
            continue;
        };

        if let Some(walk) = view.walk(i).filter(|w| !w.distance.is_zero()) {
            steps.push(Step::new(
                format!("walk {} to reach {}", walk.distance.text, ride.boarding.title),
                walk.distance.text.clone(),
                StepType::Walk,
            ));
        }

        steps.push(ride_step(ride));
    }

    if view.walk_count() > ride_count {
        if let Some(walk) = view.walk(ride_count).filter(|w| !w.distance.is_zero()) {
            steps.push(Step::new(
                format!("walk {} to destination", walk.distance.text),
                walk.distance.text.clone(),
                StepType::Walk,
            ));
        }
    }

    steps
}

fn ride_step(ride: &RideSegment) -> Step {
    let step_type = if ride.is_rail() {
        StepType::Subway
    } else {
        StepType::Bus
    };

    Step::new(
        format!(
            "{}: board at {} — alight at {}, passing {} stops",
            ride.title, ride.boarding.title, ride.alighting.title, ride.via_stops
        ),
        ride.distance.text.clone(),
        step_type,
    )
}
