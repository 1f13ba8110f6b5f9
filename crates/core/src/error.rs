//! Error types for the kalshi-bars system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the kalshi-bars system.
///
/// Bar conversion itself never fails; these errors come from loading
/// configuration and parsing names supplied by callers.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown IANA timezone name.
    #[error("Unknown timezone: {0}")]
    Timezone(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a timezone error.
    pub fn timezone(name: impl Into<String>) -> Self {
        Error::Timezone(name.into())
    }
}
