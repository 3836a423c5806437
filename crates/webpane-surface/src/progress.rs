//! Load-progress indicator and the tracker feeding it.

use crate::animation::{Tween, easing};
use crate::dispatch::MessageSink;
use crate::engine::{SubscriptionId, Surface, SurfaceId};

// -----------------------------------------------------------------------
// ProgressIndicator
// -----------------------------------------------------------------------

/// State of the thin progress bar drawn above the surface.
///
/// The fill level follows engine samples directly. Visibility is driven by
/// navigation events: fully opaque on start, faded out on finish/fail.
#[derive(Debug, Clone)]
pub struct ProgressIndicator {
    value: f32,
    alpha: f32,
    fade: Option<Tween>,
    fade_ms: u32,
}

impl ProgressIndicator {
    pub fn new(fade_ms: u32) -> Self {
        Self {
            value: 0.0,
            alpha: 0.0,
            fade: None,
            fade_ms,
        }
    }

    /// Fill level in `[0.0, 1.0]`.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Opacity in `[0.0, 1.0]`.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Set the fill level. Out-of-range and NaN samples are clamped.
    pub fn set_progress(&mut self, sample: f64) {
        self.value = clamp_sample(sample);
    }

    /// Show immediately, cancelling any fade in flight.
    pub fn show(&mut self) {
        self.fade = None;
        self.alpha = 1.0;
    }

    /// Hide and empty immediately, cancelling any fade in flight.
    pub fn reset(&mut self) {
        self.value = 0.0;
        self.alpha = 0.0;
        self.fade = None;
    }

    /// Start fading out from the current opacity.
    pub fn fade_out(&mut self) {
        if self.alpha <= 0.0 {
            self.fade = None;
            return;
        }
        self.fade = Some(Tween::new(
            self.alpha,
            0.0,
            self.fade_ms,
            easing::ease_in_out_quad,
        ));
    }

    /// Advance the fade animation. Returns `true` while still animating.
    pub fn tick(&mut self, dt_ms: u32) -> bool {
        let Some(fade) = self.fade.as_mut() else {
            return false;
        };
        self.alpha = fade.tick(dt_ms);
        if fade.is_finished() {
            self.fade = None;
            self.alpha = 0.0;
            return false;
        }
        true
    }
}

fn clamp_sample(sample: f64) -> f32 {
    if sample.is_nan() {
        0.0
    } else {
        sample.clamp(0.0, 1.0) as f32
    }
}

// -----------------------------------------------------------------------
// ProgressTracker
// -----------------------------------------------------------------------

/// Keeps exactly one progress subscription on the active surface.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    subscription: Option<(SurfaceId, SubscriptionId)>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface currently observed, if any.
    pub fn observed(&self) -> Option<SurfaceId> {
        self.subscription.map(|(surface, _)| surface)
    }

    /// Subscribe to `surface`'s progress, posting samples through `sink`.
    pub fn attach(&mut self, surface: &mut dyn Surface, sink: &MessageSink) {
        if let Some((old, _)) = self.subscription {
            // Old surface is out of reach; only the bookkeeping can go.
            log::warn!(
                "{}: progress subscription still held for {old}, discarding",
                surface.id()
            );
            self.subscription = None;
        }
        let handle = surface.observe_progress(sink.progress_callback());
        self.subscription = Some((surface.id(), handle));
    }

    /// Cancel the subscription on `surface`. Returns `true` when a
    /// subscription was actually cancelled.
    pub fn detach(&mut self, surface: &mut dyn Surface) -> bool {
        match self.subscription {
            Some((id, handle)) if id == surface.id() => {
                surface.unobserve(handle);
                self.subscription = None;
                true
            },
            _ => false,
        }
    }

    /// Apply a sample to the indicator if it came from the observed
    /// surface.
    pub fn on_sample(&self, surface: SurfaceId, sample: f64, indicator: &mut ProgressIndicator) {
        if self.observed() == Some(surface) {
            indicator.set_progress(sample);
        }
    }
}
