//! Error types for Flurry

use thiserror::Error;

/// The main error type for Flurry operations.
///
/// The simulation itself is infallible; only the drawing surface lifecycle
/// and configuration loading can fail.
#[derive(Debug, Error)]
pub enum FlurryError {
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Engine not initialized: call initialize() before scheduling frames")]
    NotInitialized,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

/// Result type alias for Flurry operations
pub type Result<T> = std::result::Result<T, FlurryError>;

impl From<toml::de::Error> for FlurryError {
    fn from(err: toml::de::Error) -> Self {
        FlurryError::TomlParseError(err.to_string())
    }
}
