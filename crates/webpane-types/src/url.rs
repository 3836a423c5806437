//! Lightweight URL checks.
//!
//! The core never parses URLs beyond what it needs to refuse obvious
//! garbage before handing a string to the engine. Everything else is the
//! engine's business.

use crate::error::{Result, WebpaneError};

/// Extract the scheme of an absolute URL (`"https"` for
/// `https://example.com`). Returns `None` for relative references.
pub fn scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(scheme)
    } else {
        None
    }
}

/// Check that `url` is a non-empty absolute URL without whitespace.
pub fn validate(url: &str) -> Result<()> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(WebpaneError::InvalidUrl("empty URL".into()));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(WebpaneError::InvalidUrl(format!(
            "{url}: contains whitespace"
        )));
    }
    if scheme(trimmed).is_none() {
        return Err(WebpaneError::InvalidUrl(format!("{url}: missing scheme")));
    }
    Ok(())
}
