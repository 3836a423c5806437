//! Title + URL pair describing the page a surface shows.

use crate::engine::Surface;

/// The current page as a shareable/bookmarkable link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub title: String,
    pub url: String,
}

impl Link {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Build from a title and URL read at the same moment. `None` if either
    /// is missing.
    pub fn from_parts(title: Option<String>, url: Option<String>) -> Option<Self> {
        Some(Self {
            title: title?,
            url: url?,
        })
    }

    /// Read the surface's current title and URL.
    pub fn from_surface(surface: &dyn Surface) -> Option<Self> {
        Self::from_parts(surface.title(), surface.url())
    }
}
