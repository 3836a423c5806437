//! Embedded web render-surface core.
//!
//! Owns the lifecycle of the single active render surface inside a host
//! view, coordinates its navigation events and progress reporting, and
//! resolves long presses on links. The engine is abstracted behind the
//! [`engine::RenderEngine`] and [`engine::Surface`] traits; engine callbacks
//! are queued and routed on the UI thread by
//! [`SurfaceLifecycle::pump`].

// Re-exports from webpane-types (foundation types).
pub use webpane_types::error;
pub use webpane_types::geometry;
pub use webpane_types::input;
pub use webpane_types::url;

pub mod animation;
pub mod chrome;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod gesture;
pub mod headless;
pub mod host;
pub mod lifecycle;
pub mod link;
pub mod navigation;
pub mod progress;
pub mod resolver;
pub mod slot;

#[cfg(test)]
pub(crate) mod test_utils;

// ---- Lifecycle ----
pub use lifecycle::SurfaceLifecycle;

// ---- Engine seam ----
pub use engine::{RenderEngine, Surface, SurfaceId};
pub use headless::{HeadlessEngine, HeadlessHandle};
pub use host::{HostListener, SurfaceInfo};

// ---- Components ----
pub use chrome::ChromeInsets;
pub use config::SurfaceConfig;
pub use gesture::{GestureDisambiguator, GestureState, RecognizerPolicy};
pub use link::Link;
pub use navigation::{NavigationCoordinator, NavigationEvent};
pub use progress::{ProgressIndicator, ProgressTracker};
pub use resolver::PointResolver;
