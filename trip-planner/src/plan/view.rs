//! Uniform accessor over a raw plan.

use crate::domain::{Distance, TravelMode, TravelTime};

use super::types::{RawLegs, RawPlan, RawRoute, RideSegment, WalkSegment};

/// One leg of a plan, whatever its shape.
#[derive(Debug, Clone, Copy)]
pub enum LegRef<'a> {
    Route(&'a RawRoute),
    Walk(&'a WalkSegment),
    Ride(&'a RideSegment),
}

impl<'a> LegRef<'a> {
    /// Returns the leg distance.
    pub fn distance(&self) -> &'a Distance {
        match self {
            LegRef::Route(route) => &route.distance,
            LegRef::Walk(walk) => &walk.distance,
            LegRef::Ride(ride) => &ride.distance,
        }
    }

    /// Returns the leg duration.
    pub fn duration(&self) -> &'a TravelTime {
        match self {
            LegRef::Route(route) => &route.duration,
            LegRef::Walk(walk) => &walk.duration,
            LegRef::Ride(ride) => &ride.duration,
        }
    }
}

/// Read-only view over one provider plan and the mode it was requested with.
///
/// Only built for successful searches. Transit plans expose their legs in
/// traversal order: walk 0, ride 0, walk 1, ride 1, ... and the optional
/// final walk.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::{Distance, TravelMode, TravelTime};
/// use trip_planner::plan::{PlanView, RawLegs, RawPlan, RawRoute};
///
/// let plan = RawPlan {
///     distance: Distance::from_meters(900),
///     duration: TravelTime::from_seconds(660),
///     legs: RawLegs::Uniform {
///         routes: vec![RawRoute {
///             distance: Distance::from_meters(900),
///             duration: TravelTime::from_seconds(660),
///             directions: vec![],
///         }],
///     },
/// };
///
/// let view = PlanView::new(&plan, TravelMode::Walking);
/// assert_eq!(view.leg_count(), 1);
/// assert_eq!(view.ride_count(), 0);
/// assert_eq!(view.total_duration().text, "11 min");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PlanView<'a> {
    plan: &'a RawPlan,
    mode: TravelMode,
}

impl<'a> PlanView<'a> {
    pub fn new(plan: &'a RawPlan, mode: TravelMode) -> Self {
        Self { plan, mode }
    }

    /// Returns the mode the plan was requested with.
    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    /// Returns the provider's total distance.
    pub fn total_distance(&self) -> &'a Distance {
        &self.plan.distance
    }

    /// Returns the provider's total duration.
    pub fn total_duration(&self) -> &'a TravelTime {
        &self.plan.duration
    }

    /// Returns true if the plan has transit-shaped legs.
    pub fn is_transit(&self) -> bool {
        matches!(self.plan.legs, RawLegs::Transit { .. })
    }

    /// Returns the number of legs of any kind.
    pub fn leg_count(&self) -> usize {
        match &self.plan.legs {
            RawLegs::Uniform { routes } => routes.len(),
            RawLegs::Transit { rides, walks } => rides.len() + walks.len(),
        }
    }

    /// Returns the leg at `index` in traversal order.
    pub fn leg(&self, index: usize) -> Option<LegRef<'a>> {
        match &self.plan.legs {
            RawLegs::Uniform { routes } => routes.get(index).map(LegRef::Route),
            RawLegs::Transit { rides, walks } => {
                if index >= rides.len() + walks.len() {
                    return None;
                }
                if index % 2 == 0 {
                    walks.get(index / 2).map(LegRef::Walk)
                } else {
                    rides.get(index / 2).map(LegRef::Ride)
                }
            }
        }
    }

    /// Returns the route at `index` of a uniform plan.
    pub fn route(&self, index: usize) -> Option<&'a RawRoute> {
        match &self.plan.legs {
            RawLegs::Uniform { routes } => routes.get(index),
            RawLegs::Transit { .. } => None,
        }
    }

    /// Returns the number of ride segments (0 for uniform plans).
    pub fn ride_count(&self) -> usize {
        match &self.plan.legs {
            RawLegs::Transit { rides, .. } => rides.len(),
            RawLegs::Uniform { .. } => 0,
        }
    }

    /// Returns the number of walk segments (0 for uniform plans).
    pub fn walk_count(&self) -> usize {
        match &self.plan.legs {
            RawLegs::Transit { walks, .. } => walks.len(),
            RawLegs::Uniform { .. } => 0,
        }
    }

    /// Returns ride segment `index`.
    pub fn ride(&self, index: usize) -> Option<&'a RideSegment> {
        match &self.plan.legs {
            RawLegs::Transit { rides, .. } => rides.get(index),
            RawLegs::Uniform { .. } => None,
        }
    }

    /// Returns walk segment `index`.
    pub fn walk(&self, index: usize) -> Option<&'a WalkSegment> {
        match &self.plan.legs {
            RawLegs::Transit { walks, .. } => walks.get(index),
            RawLegs::Uniform { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Direction, StopRef};

    fn ride(title: &str, meters: u32) -> RideSegment {
        RideSegment {
            title: title.into(),
            boarding: StopRef::new("A"),
            alighting: StopRef::new("B"),
            via_stops: 1,
            distance: Distance::from_meters(meters),
            duration: TravelTime::from_seconds(300),
            vehicle_kind: 1,
        }
    }

    fn walk(meters: u32) -> WalkSegment {
        WalkSegment {
            distance: Distance::from_meters(meters),
            duration: TravelTime::from_seconds(60),
        }
    }

    fn transit_plan(rides: Vec<RideSegment>, walks: Vec<WalkSegment>) -> RawPlan {
        RawPlan {
            distance: Distance::from_meters(5000),
            duration: TravelTime::from_seconds(1800),
            legs: RawLegs::Transit { rides, walks },
        }
    }

    #[test]
    fn transit_legs_interleave_walk_first() {
        let plan = transit_plan(
            vec![ride("L1", 1000), ride("L2", 2000)],
            vec![walk(10), walk(20), walk(30)],
        );
        let view = PlanView::new(&plan, TravelMode::Transit);

        assert_eq!(view.leg_count(), 5);
        let meters: Vec<u32> = (0..view.leg_count())
            .map(|i| view.leg(i).unwrap().distance().meters)
            .collect();
        assert_eq!(meters, vec![10, 1000, 20, 2000, 30]);
        assert!(view.leg(5).is_none());
    }

    #[test]
    fn transit_without_trailing_walk() {
        let plan = transit_plan(vec![ride("L1", 1000)], vec![walk(0)]);
        let view = PlanView::new(&plan, TravelMode::Transit);

        assert_eq!(view.ride_count(), 1);
        assert_eq!(view.walk_count(), 1);
        assert!(view.walk(1).is_none());
        assert!(matches!(view.leg(1), Some(LegRef::Ride(_))));
        assert!(view.route(0).is_none());
    }

    #[test]
    fn uniform_plan_has_no_segments() {
        let plan = RawPlan {
            distance: Distance::from_meters(3000),
            duration: TravelTime::from_seconds(600),
            legs: RawLegs::Uniform {
                routes: vec![RawRoute {
                    distance: Distance::from_meters(3000),
                    duration: TravelTime::from_seconds(600),
                    directions: vec![Direction {
                        description: "head north".into(),
                        distance: Distance::from_meters(3000),
                    }],
                }],
            },
        };
        let view = PlanView::new(&plan, TravelMode::Driving);

        assert!(!view.is_transit());
        assert_eq!(view.ride_count(), 0);
        assert_eq!(view.walk_count(), 0);
        assert!(view.ride(0).is_none());
        assert_eq!(view.route(0).unwrap().directions.len(), 1);
        assert_eq!(view.leg(0).unwrap().duration().text, "10 min");
    }
}
