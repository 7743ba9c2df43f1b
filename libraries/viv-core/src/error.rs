/// Core error types for viv-tracks
use thiserror::Error;

/// Result type alias using `VivError`
pub type Result<T> = std::result::Result<T, VivError>;

/// Core error type for viv-tracks
#[derive(Error, Debug)]
pub enum VivError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl VivError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
