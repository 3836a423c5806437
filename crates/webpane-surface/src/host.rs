//! Host-side listener the core reports to.

use webpane_types::geometry::Rect;

use crate::engine::SurfaceId;

/// Snapshot of a newly attached surface, handed to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceInfo {
    pub id: SurfaceId,
    pub frame: Rect,
}

/// Receives page-level events from the active surface.
///
/// All methods run on the UI thread, from inside
/// [`SurfaceLifecycle`](crate::SurfaceLifecycle) calls.
pub trait HostListener {
    /// A new surface became the active one.
    fn attached(&mut self, surface: &SurfaceInfo);

    fn page_load_started(&mut self);

    /// Sent for both successful and failed navigations.
    fn page_load_finished(&mut self);

    /// A long press on a link completed.
    fn long_press_on_link(&mut self, url: &str);

    /// Web data was cleared at the user's request. Hosts typically show
    /// a short confirmation toast.
    fn session_cleared(&mut self) {}
}
