/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// A stored row could not be mapped onto a track
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for viv_core::VivError {
    fn from(err: StorageError) -> Self {
        viv_core::VivError::storage(err.to_string())
    }
}
