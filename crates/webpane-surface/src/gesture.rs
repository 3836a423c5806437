//! Long-press-on-link recognition.
//!
//! Two phases, deliberately kept apart:
//!
//! 1. **Admission** on touch-down: a synchronous hit test decides whether
//!    the gesture may begin at all. Touches that miss a link never start
//!    recognizing, so plain content keeps its own long-press behaviour.
//! 2. **Completion** on the began transition: an asynchronous hit test
//!    fetches the URL to report. Its result is delivered through the UI
//!    queue and only reported if the surface that admitted the gesture is
//!    still the active one. Later touches do not cancel a lookup already
//!    in flight.
//!
//! ```text
//! Idle --down+link--> Recognizing --hold--> Began --result--> Resolved
//!   ^                     |
//!   +--up/move/cancel-----+
//! ```

use webpane_types::geometry::Point;

use crate::chrome::ChromeInsets;
use crate::dispatch::MessageSink;
use crate::engine::{Surface, SurfaceId};
use crate::resolver::PointResolver;

/// Where the current long press is.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureState {
    Idle,
    Recognizing {
        surface: SurfaceId,
        origin: Point,
        location: Point,
        held_ms: u32,
    },
    Began {
        surface: SurfaceId,
        released: bool,
    },
    Resolved {
        url: Option<String>,
    },
}

/// How the long-press recognizer arbitrates against the host's own
/// recognizers on the same view. Hosts apply this when installing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognizerPolicy {
    /// Whether it gives way in a simultaneous recognition conflict.
    pub yields_to_others: bool,
    /// Whether competing recognizers must fail before it may begin.
    pub requires_others_to_fail: bool,
}

/// Long-press recognizer bound to the active surface.
#[derive(Debug)]
pub struct GestureDisambiguator {
    state: GestureState,
    bound: Option<SurfaceId>,
    /// Surface whose async lookup is still outstanding.
    pending: Option<SurfaceId>,
    hold_ms: u32,
    tolerance: f32,
    resolver: PointResolver,
}

impl GestureDisambiguator {
    pub fn new(hold_ms: u32, tolerance: f32) -> Self {
        Self {
            state: GestureState::Idle,
            bound: None,
            pending: None,
            hold_ms,
            tolerance,
            resolver: PointResolver::new(),
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn bound(&self) -> Option<SurfaceId> {
        self.bound
    }

    /// Surface with an async lookup still outstanding, if any.
    pub fn pending(&self) -> Option<SurfaceId> {
        self.pending
    }

    /// Attach to a new surface. Any gesture or lookup in flight is dropped.
    pub fn bind(&mut self, surface: SurfaceId) {
        self.bound = Some(surface);
        self.pending = None;
        self.state = GestureState::Idle;
    }

    pub fn unbind(&mut self) {
        self.bound = None;
        self.pending = None;
        self.state = GestureState::Idle;
    }

    /// Fixed: never yields, and other recognizers must fail first.
    pub fn policy(&self) -> RecognizerPolicy {
        RecognizerPolicy {
            yields_to_others: false,
            requires_others_to_fail: true,
        }
    }

    /// Admission check on touch-down. Returns `true` when a link sits under
    /// the touch and recognition starts.
    pub fn should_begin(
        &mut self,
        surface: &dyn Surface,
        raw: Point,
        chrome: &ChromeInsets,
    ) -> bool {
        let id = surface.id();
        if self.bound != Some(id) {
            return false;
        }
        let point = raw.to_surface(chrome.vertical_offset());
        match self.resolver.resolve_sync(surface, point) {
            Some(url) => {
                log::debug!("{id}: long press admitted over {url}");
                self.state = GestureState::Recognizing {
                    surface: id,
                    origin: raw,
                    location: raw,
                    held_ms: 0,
                };
                true
            },
            None => {
                self.state = GestureState::Idle;
                false
            },
        }
    }

    /// Track finger movement. Moving past the tolerance fails the gesture.
    /// Returns `true` while the gesture is still alive.
    pub fn touch_moved(&mut self, raw: Point) -> bool {
        match &mut self.state {
            GestureState::Recognizing {
                origin, location, ..
            } => {
                if origin.distance_to(raw) > self.tolerance {
                    self.state = GestureState::Idle;
                    return false;
                }
                *location = raw;
                true
            },
            GestureState::Began { .. } => true,
            _ => false,
        }
    }

    /// Finger lifted. Before the hold elapses this fails the gesture; after
    /// it, the pending lookup still completes.
    pub fn touch_up(&mut self) -> bool {
        match &mut self.state {
            GestureState::Recognizing { .. } => {
                self.state = GestureState::Idle;
                false
            },
            GestureState::Began { released, .. } => {
                *released = true;
                true
            },
            _ => false,
        }
    }

    /// Platform cancelled the touch sequence.
    pub fn cancel(&mut self) {
        if matches!(self.state, GestureState::Recognizing { .. }) {
            self.state = GestureState::Idle;
        }
    }

    /// Advance the hold timer. On the began transition the relative point
    /// is re-derived and an async lookup is issued. Returns `true` exactly
    /// once per gesture, when it begins.
    pub fn tick(
        &mut self,
        dt_ms: u32,
        surface: &dyn Surface,
        chrome: &ChromeInsets,
        sink: &MessageSink,
    ) -> bool {
        let (id, location) = match &mut self.state {
            GestureState::Recognizing {
                surface: id,
                location,
                held_ms,
                ..
            } => {
                *held_ms = held_ms.saturating_add(dt_ms);
                if *held_ms < self.hold_ms {
                    return false;
                }
                (*id, *location)
            },
            _ => return false,
        };
        if id != surface.id() {
            self.state = GestureState::Idle;
            return false;
        }
        self.state = GestureState::Began {
            surface: id,
            released: false,
        };
        self.pending = Some(id);
        let point = location.to_surface(chrome.vertical_offset());
        self.resolver.resolve_async(surface, point, sink);
        true
    }

    /// Async lookup finished. Returns the URL to report to the host, or
    /// `None` when nothing should fire (no link, stale surface, or no
    /// gesture waiting).
    pub fn complete(
        &mut self,
        surface: SurfaceId,
        active: Option<SurfaceId>,
        url: Option<String>,
    ) -> Option<String> {
        if self.pending != Some(surface) {
            log::debug!("{surface}: hit test result with no gesture waiting");
            return None;
        }
        self.pending = None;
        if active != Some(surface) {
            log::debug!("{surface}: dropping stale hit test result");
            return None;
        }
        // A newer touch may already be recognizing; leave it alone.
        if matches!(self.state, GestureState::Began { .. }) {
            self.state = GestureState::Resolved { url: url.clone() };
        }
        url
    }
}
