//! Foundation types for webpane.
//!
//! Platform-agnostic types shared by the surface core and its hosts:
//! the error enum, geometry primitives, touch input events and URL
//! validation helpers.

pub mod error;
pub mod geometry;
pub mod input;
pub mod url;
