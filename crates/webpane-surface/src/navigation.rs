//! Navigation event relay.
//!
//! The coordinator is bound to whichever surface is active and turns its
//! navigation lifecycle into indicator changes plus host notifications.
//! Success and failure both end in `page_load_finished`; the host gets no
//! error detail.

use crate::dispatch::MessageSink;
use crate::engine::{NavigationError, Surface, SurfaceId};
use crate::host::HostListener;
use crate::progress::ProgressIndicator;

/// A navigation lifecycle step reported by a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    Started,
    Finished,
    Failed(NavigationError),
}

/// Relays navigation events from the bound surface.
#[derive(Debug, Default)]
pub struct NavigationCoordinator {
    bound: Option<SurfaceId>,
}

impl NavigationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound(&self) -> Option<SurfaceId> {
        self.bound
    }

    /// Install this coordinator as `surface`'s navigation observer.
    pub fn bind(&mut self, surface: &mut dyn Surface, sink: &MessageSink) {
        surface.set_navigation_observer(sink.navigation_observer());
        self.bound = Some(surface.id());
    }

    /// Remove the observer from `surface` if it is the bound one.
    pub fn unbind(&mut self, surface: &mut dyn Surface) {
        if self.bound == Some(surface.id()) {
            surface.clear_navigation_observer();
            self.bound = None;
        }
    }

    /// Apply one event. Events from any surface other than the bound one
    /// are ignored.
    pub fn handle(
        &self,
        surface: SurfaceId,
        event: NavigationEvent,
        indicator: &mut ProgressIndicator,
        host: &mut dyn HostListener,
    ) {
        if self.bound != Some(surface) {
            log::debug!("{surface}: ignoring {event:?}, not bound");
            return;
        }
        match event {
            NavigationEvent::Started => {
                indicator.show();
                host.page_load_started();
            },
            NavigationEvent::Finished => {
                indicator.fade_out();
                host.page_load_finished();
            },
            NavigationEvent::Failed(err) => {
                log::debug!("{surface}: {err}");
                indicator.fade_out();
                host.page_load_finished();
            },
        }
    }
}
