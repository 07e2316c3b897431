//! Error types for the Mosaic gateway.

use thiserror::Error;

/// Main error type for Mosaic operations.
#[derive(Error, Debug)]
pub enum MosaicError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Mosaic operations.
pub type Result<T> = std::result::Result<T, MosaicError>;
