//! Error types for syncwall-sc
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation.

use thiserror::Error;

/// Main error type for the sync controller
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stream discovery errors (fetching /api/streams)
    #[error("Discovery error: {0}")]
    Discovery(#[from] reqwest::Error),

    /// A source URL failed to bind to a playable sink
    #[error("Bind error for {url}: {reason}")]
    Bind { url: String, reason: String },

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// Sync session errors
    #[error("Sync error: {0}")]
    Sync(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using syncwall-sc Error
pub type Result<T> = std::result::Result<T, Error>;
