//! Shared test utilities for the surface core.
//!
//! Provides a [`RecordingHost`] that records every host notification for
//! assertion, plus a ready-wired lifecycle over the headless engine.

use std::sync::Arc;

use parking_lot::Mutex;
use webpane_types::geometry::Rect;

use crate::config::SurfaceConfig;
use crate::engine::SurfaceId;
use crate::headless::{HeadlessEngine, HeadlessHandle};
use crate::host::{HostListener, SurfaceInfo};
use crate::lifecycle::SurfaceLifecycle;

/// A recorded host notification.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Attached(SurfaceId),
    PageLoadStarted,
    PageLoadFinished,
    LongPress(String),
    SessionCleared,
}

/// Read side of a [`RecordingHost`].
#[derive(Clone, Default)]
pub struct HostLog {
    events: Arc<Mutex<Vec<HostEvent>>>,
}

impl HostLog {
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Only the long-press URLs, in order.
    pub fn long_presses(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                HostEvent::LongPress(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Host listener that appends every call to a shared log.
pub struct RecordingHost {
    log: HostLog,
}

impl RecordingHost {
    pub fn new() -> (Self, HostLog) {
        let log = HostLog::default();
        (Self { log: log.clone() }, log)
    }

    fn push(&self, event: HostEvent) {
        self.log.events.lock().push(event);
    }
}

impl HostListener for RecordingHost {
    fn attached(&mut self, surface: &SurfaceInfo) {
        self.push(HostEvent::Attached(surface.id));
    }

    fn page_load_started(&mut self) {
        self.push(HostEvent::PageLoadStarted);
    }

    fn page_load_finished(&mut self) {
        self.push(HostEvent::PageLoadFinished);
    }

    fn long_press_on_link(&mut self, url: &str) {
        self.push(HostEvent::LongPress(url.to_string()));
    }

    fn session_cleared(&mut self) {
        self.push(HostEvent::SessionCleared);
    }
}

pub const HOST_BOUNDS: Rect = Rect::new(0.0, 0.0, 375.0, 667.0);

/// A lifecycle over a fresh headless engine with default config and a
/// recording host. No surface is attached yet.
pub fn make_lifecycle() -> (SurfaceLifecycle, HeadlessEngine, HostLog) {
    make_lifecycle_with(SurfaceConfig::default())
}

pub fn make_lifecycle_with(config: SurfaceConfig) -> (SurfaceLifecycle, HeadlessEngine, HostLog) {
    let engine = HeadlessEngine::new();
    let (host, log) = RecordingHost::new();
    let lifecycle = SurfaceLifecycle::new(
        config,
        Box::new(engine.clone()),
        Box::new(host),
        HOST_BOUNDS,
    );
    (lifecycle, engine, log)
}

/// Handle to the lifecycle's active surface. Panics when none is active.
pub fn active_handle(lifecycle: &SurfaceLifecycle, engine: &HeadlessEngine) -> HeadlessHandle {
    let id = lifecycle
        .active_surface_id()
        .expect("a surface should be active");
    engine.handle(id).expect("active surface comes from this engine")
}
