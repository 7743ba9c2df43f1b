//! Error types for the importer

use std::path::PathBuf;
use thiserror::Error;

/// Fatal ingestion failure; the service must not start after one of these
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("The specified file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid File data format: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid File data format: {0}")]
    InvalidFormat(String),

    #[error("Storage error: {0}")]
    Storage(#[from] viv_core::VivError),
}
