//! Touch input events.
//!
//! Hosts translate their native touch stream into these events before
//! handing them to the surface core. Coordinates are in host view space,
//! chrome included.

use crate::geometry::Point;

/// A single-finger touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    /// Finger went down.
    Down(Point),
    /// Finger moved while down.
    Moved(Point),
    /// Finger lifted.
    Up(Point),
    /// The platform cancelled the touch sequence (incoming call, scroll
    /// takeover, ...).
    Cancelled,
}
