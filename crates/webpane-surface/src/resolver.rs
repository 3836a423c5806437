//! Point-to-link resolution against a surface.
//!
//! Points passed here are already surface-relative; chrome offsets are
//! the caller's job.

use webpane_types::geometry::SurfacePoint;

use crate::dispatch::MessageSink;
use crate::engine::Surface;

/// Asks the engine which link, if any, sits under a point.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointResolver;

impl PointResolver {
    pub fn new() -> Self {
        Self
    }

    /// Blocking lookup. Used as a yes/no gate before a gesture may begin.
    pub fn resolve_sync(&self, surface: &dyn Surface, point: SurfacePoint) -> Option<String> {
        surface.hit_test_sync(point)
    }

    /// Non-blocking lookup. The result arrives on the UI queue as a
    /// `SurfaceMessage::HitTest` tagged with `sink`'s surface.
    pub fn resolve_async(&self, surface: &dyn Surface, point: SurfacePoint, sink: &MessageSink) {
        log::debug!("{}: async hit test at ({}, {})", surface.id(), point.x, point.y);
        surface.hit_test_async(point, sink.hit_test_callback());
    }
}
