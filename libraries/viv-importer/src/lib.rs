//! viv-tracks Dataset Importer
//!
//! Loads the column-oriented track dataset into a `TrackStore` at startup.
//!
//! # Dataset format
//!
//! The file is one JSON object mapping each column name to an object of
//! `row key -> value`. Row keys are stringified non-negative integers and
//! become the track `idx`; every column must share the `id` column's keys.
//!
//! ```json
//! { "id": { "0": "5vYA1mW9g2Coh1HUFUSmlb" }, "title": { "0": "3AM" }, ... }
//! ```
//!
//! # Architecture
//!
//! - `dataset`: reading, shape validation and row transformation
//! - `importer`: orchestration against the store

mod error;

pub mod dataset;
pub mod importer;

pub use dataset::{read_dataset, ColumnarDataset};
pub use error::StartupError;
pub use importer::{ImportSummary, TrackImporter};

/// Result type for startup-time ingestion
pub type Result<T> = std::result::Result<T, StartupError>;
