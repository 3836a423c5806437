//! UI-thread message queue.
//!
//! Engines call back from whatever thread they like. Every callback the
//! core hands to an engine only posts a [`SurfaceMessage`] tagged with the
//! originating surface; the host drains the queue on the UI thread through
//! [`SurfaceLifecycle::pump`](crate::SurfaceLifecycle::pump). That keeps
//! all state mutation on one thread and lets the router drop messages from
//! surfaces that are no longer active.
//!
//! Each sink also carries an attachment number, so a surface that is
//! detached and later re-attached does not resurrect messages it posted
//! under its earlier attachment.

use crossbeam_channel::{Receiver, Sender, TryIter};

use crate::engine::{
    CacheClearCallback, CacheError, HitTestCallback, NavigationError, NavigationObserver,
    ProgressCallback, SurfaceId,
};
use crate::navigation::NavigationEvent;

/// A callback result waiting to be routed on the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceMessage {
    Navigation {
        surface: SurfaceId,
        event: NavigationEvent,
    },
    Progress {
        surface: SurfaceId,
        value: f64,
    },
    HitTest {
        surface: SurfaceId,
        url: Option<String>,
    },
    CacheCleared {
        surface: SurfaceId,
        result: Result<(), CacheError>,
    },
}

impl SurfaceMessage {
    /// The surface the message came from.
    pub fn surface(&self) -> SurfaceId {
        match self {
            Self::Navigation { surface, .. }
            | Self::Progress { surface, .. }
            | Self::HitTest { surface, .. }
            | Self::CacheCleared { surface, .. } => *surface,
        }
    }
}

/// A queued message and the attachment it was posted under.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub attachment: u64,
    pub message: SurfaceMessage,
}

/// Owner of the queue. Lives inside the lifecycle.
pub struct Dispatcher {
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    next_attachment: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            tx,
            rx,
            next_attachment: 0,
        }
    }

    /// A sink whose callbacks are tagged with `surface` and a fresh
    /// attachment number.
    pub fn sink(&mut self, surface: SurfaceId) -> MessageSink {
        self.next_attachment += 1;
        MessageSink {
            surface,
            attachment: self.next_attachment,
            tx: self.tx.clone(),
        }
    }

    /// Envelopes currently queued, in posting order. Does not block.
    pub fn drain(&self) -> TryIter<'_, Envelope> {
        self.rx.try_iter()
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Posting half of the queue, bound to one surface.
#[derive(Clone)]
pub struct MessageSink {
    surface: SurfaceId,
    attachment: u64,
    tx: Sender<Envelope>,
}

impl MessageSink {
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn attachment(&self) -> u64 {
        self.attachment
    }

    pub fn post(&self, message: SurfaceMessage) {
        let envelope = Envelope {
            attachment: self.attachment,
            message,
        };
        if self.tx.send(envelope).is_err() {
            // The lifecycle is gone; nothing left to notify.
            log::debug!("{}: dropping message, queue closed", self.surface);
        }
    }

    pub fn progress_callback(&self) -> ProgressCallback {
        let sink = self.clone();
        Box::new(move |value| {
            sink.post(SurfaceMessage::Progress {
                surface: sink.surface,
                value,
            });
        })
    }

    pub fn hit_test_callback(&self) -> HitTestCallback {
        let sink = self.clone();
        Box::new(move |url| {
            sink.post(SurfaceMessage::HitTest {
                surface: sink.surface,
                url,
            });
        })
    }

    pub fn cache_callback(&self) -> CacheClearCallback {
        let sink = self.clone();
        Box::new(move |result| {
            sink.post(SurfaceMessage::CacheCleared {
                surface: sink.surface,
                result,
            });
        })
    }

    pub fn navigation_observer(&self) -> Box<dyn NavigationObserver> {
        Box::new(QueuedNavigationObserver { sink: self.clone() })
    }

    fn navigation(&self, event: NavigationEvent) {
        self.post(SurfaceMessage::Navigation {
            surface: self.surface,
            event,
        });
    }
}

/// Navigation observer that forwards into the queue.
struct QueuedNavigationObserver {
    sink: MessageSink,
}

impl NavigationObserver for QueuedNavigationObserver {
    fn on_started(&mut self) {
        self.sink.navigation(NavigationEvent::Started);
    }

    fn on_finished(&mut self) {
        self.sink.navigation(NavigationEvent::Finished);
    }

    fn on_failed(&mut self, error: NavigationError) {
        self.sink.navigation(NavigationEvent::Failed(error));
    }
}
