//! Error types for webpane.

use std::io;

/// Errors produced by the webpane crates.
#[derive(Debug, thiserror::Error)]
pub enum WebpaneError {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, WebpaneError>;
