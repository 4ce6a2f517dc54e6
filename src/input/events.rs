//! Pointer events delivered by the embedding map view.

use crate::geodesy::LatLng;

/// Pointer event, already unprojected to a geographic coordinate.
///
/// The map view translates its native mouse/touch events into these and hands them
/// to [`ToolRegistry::handle_event`](super::ToolRegistry::handle_event).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button click (press and release without a drag)
    Click(LatLng),
    /// Double click; finishes the active tool's draft
    DoubleClick(LatLng),
    /// Primary button pressed
    PointerDown(LatLng),
    /// Pointer moved, with or without a button held
    PointerMove(LatLng),
    /// Primary button released
    PointerUp(LatLng),
}

impl InputEvent {
    pub fn position(&self) -> LatLng {
        match *self {
            InputEvent::Click(at)
            | InputEvent::DoubleClick(at)
            | InputEvent::PointerDown(at)
            | InputEvent::PointerMove(at)
            | InputEvent::PointerUp(at) => at,
        }
    }
}
