//! Render-engine boundary: the traits a platform web engine implements
//! so the core can drive it.
//!
//! The core never renders, runs scripts or touches the network. It only
//! creates surfaces, points them at URLs, and listens to what they report
//! back through the callbacks defined here.

use std::fmt;

use webpane_types::geometry::{Rect, SurfacePoint};

// -----------------------------------------------------------------------
// Identifiers
// -----------------------------------------------------------------------

/// Engine-assigned identity of a surface. Unique for the lifetime of the
/// engine that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Handle returned by [`Surface::observe_progress`], passed back to
/// [`Surface::unobserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

// -----------------------------------------------------------------------
// Engine-reported errors
// -----------------------------------------------------------------------

/// A navigation the engine gave up on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("navigation failed: {reason}")]
pub struct NavigationError {
    pub reason: String,
}

impl NavigationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The engine could not drop its cached web data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cache clear failed: {0}")]
pub struct CacheError(pub String);

// -----------------------------------------------------------------------
// Callbacks
// -----------------------------------------------------------------------

/// Receives every estimated-progress change of a surface.
pub type ProgressCallback = Box<dyn FnMut(f64) + Send>;

/// Receives the link URL under a point, or `None` when there is no link.
pub type HitTestCallback = Box<dyn FnOnce(Option<String>) + Send>;

/// Receives the outcome of a cache clear request.
pub type CacheClearCallback = Box<dyn FnOnce(Result<(), CacheError>) + Send>;

/// Navigation lifecycle callbacks a surface reports to its single
/// registered observer.
pub trait NavigationObserver: Send {
    /// A provisional navigation started.
    fn on_started(&mut self);

    /// The navigation committed and finished loading.
    fn on_finished(&mut self);

    /// The navigation failed.
    fn on_failed(&mut self, error: NavigationError);
}

// -----------------------------------------------------------------------
// Surface
// -----------------------------------------------------------------------

/// One render-engine instance showing one document at a time.
pub trait Surface {
    fn id(&self) -> SurfaceId;

    /// URL of the current document, if any.
    fn url(&self) -> Option<String>;

    /// Title of the current document, if any.
    fn title(&self) -> Option<String>;

    fn can_go_back(&self) -> bool;

    fn can_go_forward(&self) -> bool;

    /// Engine estimate of load progress, nominally `0.0..=1.0`.
    fn estimated_progress(&self) -> f64;

    fn load(&mut self, url: &str);

    fn go_back(&mut self);

    fn go_forward(&mut self);

    fn reload(&mut self);

    /// Register a progress callback. The engine pushes a sample on every
    /// change until the subscription is cancelled.
    fn observe_progress(&mut self, callback: ProgressCallback) -> SubscriptionId;

    /// Cancel a progress subscription.
    fn unobserve(&mut self, subscription: SubscriptionId);

    /// Install the navigation observer, replacing any previous one.
    fn set_navigation_observer(&mut self, observer: Box<dyn NavigationObserver>);

    fn clear_navigation_observer(&mut self);

    /// Non-blocking link lookup. `completion` may run on any thread.
    fn hit_test_async(&self, point: SurfacePoint, completion: HitTestCallback);

    /// Blocking link lookup. Must return promptly.
    fn hit_test_sync(&self, point: SurfacePoint) -> Option<String>;

    /// Drop cached web data (cookies, storage, disk cache).
    fn clear_cache(&mut self, completion: CacheClearCallback);

    /// Place the surface in the host view at `frame`.
    fn set_frame(&mut self, frame: Rect);

    /// Take the surface out of the host view.
    fn remove_from_view(&mut self);

    /// Allow edge-swipe back/forward navigation.
    fn set_back_forward_gestures(&mut self, enabled: bool);
}

/// Factory for surfaces.
pub trait RenderEngine {
    /// Create a fresh, private surface sized to `bounds`. Construction is
    /// assumed to succeed; engine-level failures surface later as failed
    /// navigations.
    fn create_surface(&mut self, bounds: Rect) -> Box<dyn Surface>;
}
