//! Host chrome geometry that sits on top of the surface.

/// Vertical chrome stacked above the surface in host coordinates.
///
/// Raw touch points include this band; the engine hit-tests in surface
/// coordinates, so the band is subtracted before every lookup.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ChromeInsets {
    /// The surface is not inside a navigation stack; touch points are
    /// already surface-relative.
    #[default]
    None,
    /// The surface sits under a status bar and a navigation bar.
    Stacked {
        status_bar_height: f32,
        navigation_bar_height: f32,
        navigation_bar_hidden: bool,
    },
}

impl ChromeInsets {
    pub fn stacked(status_bar_height: f32, navigation_bar_height: f32) -> Self {
        Self::Stacked {
            status_bar_height,
            navigation_bar_height,
            navigation_bar_hidden: false,
        }
    }

    /// Toggle navigation-bar visibility. No effect on `None`.
    pub fn set_navigation_bar_hidden(&mut self, hidden: bool) {
        if let Self::Stacked {
            navigation_bar_hidden,
            ..
        } = self
        {
            *navigation_bar_hidden = hidden;
        }
    }

    /// Height of the band to subtract from raw touch Y coordinates.
    pub fn vertical_offset(&self) -> f32 {
        match *self {
            Self::None => 0.0,
            Self::Stacked {
                status_bar_height,
                navigation_bar_hidden: true,
                ..
            } => status_bar_height,
            Self::Stacked {
                status_bar_height,
                navigation_bar_height,
                navigation_bar_hidden: false,
            } => status_bar_height + navigation_bar_height,
        }
    }
}
