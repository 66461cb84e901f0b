//! Error types for lorbot.

use thiserror::Error;

/// Main error type for lorbot operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A card code seen in telemetry has no catalog entry
    #[error("Card code {code} not found in catalog (local card sets were purged, resynchronize them)")]
    CatalogMiss {
        /// The unknown card code
        code: String,
    },

    /// Catalog loading or purging failed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Telemetry feed request failed
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    /// Frame capture failed
    #[error("Capture error: {0}")]
    Capture(String),

    /// Synthetic input failed
    #[error("Actuator error: {0}")]
    Actuator(String),

    /// Game window not found or has no area
    #[error("Game window not found")]
    WindowNotFound,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or parameters (generic)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Image decoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the failure only affects the current tick.
    ///
    /// Transient failures are logged and retried on the next poll. Anything
    /// else aborts the inference cycle.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Telemetry(_) | Error::Capture(_) | Error::Actuator(_) | Error::WindowNotFound
        )
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
