//! The single place in the host view a surface can occupy.

use webpane_types::geometry::Rect;

use crate::engine::SurfaceId;

/// Host view slot. Holds at most one surface, sized to the host bounds.
#[derive(Debug, Clone)]
pub struct ViewSlot {
    bounds: Rect,
    occupant: Option<SurfaceId>,
}

impl ViewSlot {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            occupant: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn occupant(&self) -> Option<SurfaceId> {
        self.occupant
    }

    /// Put `surface` in the slot. Returns the frame it should take.
    pub fn insert(&mut self, surface: SurfaceId) -> Rect {
        if let Some(previous) = self.occupant.replace(surface) {
            log::warn!("{surface} inserted over {previous}, which was never removed");
        }
        self.bounds
    }

    /// Empty the slot if `surface` occupies it. Returns whether it did.
    pub fn remove(&mut self, surface: SurfaceId) -> bool {
        if self.occupant == Some(surface) {
            self.occupant = None;
            true
        } else {
            false
        }
    }
}
