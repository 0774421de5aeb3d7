//! Input routing between the overlay's own panel and the surface.

use serde::{Deserialize, Serialize};

/// Where an input event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputOrigin {
    /// The overlay's embedded control panel
    Panel,
    /// The rendering surface itself
    Surface,
}

/// Who handles an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputRoute {
    /// Consumed by the panel; never reaches the surface's gesture handling
    Panel,
    Surface,
}

/// Pointer and wheel event kinds the panel stops from propagating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelEvent {
    Click,
    DblClick,
    MouseDown,
    MouseUp,
    TouchStart,
    TouchEnd,
    TouchMove,
    PointerDown,
    Wheel,
}

impl PanelEvent {
    /// Every isolated kind.
    pub const ISOLATED: [PanelEvent; 9] = [
        PanelEvent::Click,
        PanelEvent::DblClick,
        PanelEvent::MouseDown,
        PanelEvent::MouseUp,
        PanelEvent::TouchStart,
        PanelEvent::TouchEnd,
        PanelEvent::TouchMove,
        PanelEvent::PointerDown,
        PanelEvent::Wheel,
    ];
}

/// Routes an event by origin. Every [`PanelEvent`] kind raised on the
/// panel stays in the panel.
pub fn dispatch(origin: InputOrigin) -> InputRoute {
    match origin {
        InputOrigin::Panel => InputRoute::Panel,
        InputOrigin::Surface => InputRoute::Surface,
    }
}

/// What happened to a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "zoom", rename_all = "lowercase")]
pub enum WheelOutcome {
    /// Came from the panel; the surface never saw it
    Isolated,
    /// The surface is not ready, or the event had no direction
    Ignored,
    /// Arrived within the debounce window of the last applied zoom
    Debounced,
    /// Zoom applied; carries the new value
    Zoomed(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_events_never_reach_surface() {
        assert_eq!(dispatch(InputOrigin::Panel), InputRoute::Panel);
        assert_eq!(dispatch(InputOrigin::Surface), InputRoute::Surface);
        assert!(PanelEvent::ISOLATED.contains(&PanelEvent::Wheel));
    }

    #[test]
    fn wheel_outcome_serializes() {
        let json = serde_json::to_value(WheelOutcome::Zoomed(0.6)).unwrap();
        assert_eq!(json["outcome"], "zoomed");
        assert_eq!(json["zoom"], 0.6);

        let json = serde_json::to_value(WheelOutcome::Debounced).unwrap();
        assert_eq!(json["outcome"], "debounced");
    }
}
