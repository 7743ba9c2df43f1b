//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur when talking to the catalog service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
