//! Surface configuration, injected into the lifecycle at construction.

use std::path::Path;

use serde::Deserialize;
use webpane_types::error::{Result, WebpaneError};

/// Behaviour knobs for the surface lifecycle (from `webpane.toml`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Page loaded when no explicit URL is given.
    pub home_url: String,
    /// Progress indicator fade-out duration.
    pub progress_fade_ms: u32,
    /// How long a finger must rest on a link before the long press begins.
    pub long_press_hold_ms: u32,
    /// Finger travel (logical px) tolerated while recognizing.
    pub long_press_tolerance: f32,
    /// Status bar height used when building stacked chrome insets.
    pub status_bar_height: f32,
    /// Enable edge-swipe back/forward on new surfaces.
    pub back_forward_gestures: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            home_url: "https://duckduckgo.com".to_string(),
            progress_fade_ms: 1000,
            long_press_hold_ms: 500,
            long_press_tolerance: 10.0,
            status_bar_height: 20.0,
            back_forward_gestures: true,
        }
    }
}

impl SurfaceConfig {
    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&source)
    }

    pub fn validate(&self) -> Result<()> {
        webpane_types::url::validate(&self.home_url)
            .map_err(|e| WebpaneError::Config(format!("home_url: {e}")))?;
        if self.long_press_hold_ms == 0 {
            return Err(WebpaneError::Config(
                "long_press_hold_ms must be greater than zero".into(),
            ));
        }
        if !(self.long_press_tolerance.is_finite() && self.long_press_tolerance >= 0.0) {
            return Err(WebpaneError::Config(
                "long_press_tolerance must be a non-negative number".into(),
            ));
        }
        if !(self.status_bar_height.is_finite() && self.status_bar_height >= 0.0) {
            return Err(WebpaneError::Config(
                "status_bar_height must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}
