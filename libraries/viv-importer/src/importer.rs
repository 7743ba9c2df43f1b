//! Startup ingestion: dataset file -> track store

use crate::{dataset, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use viv_core::storage::TrackStore;

/// Outcome of one ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows read from the dataset
    pub read: usize,
    /// Rows that were not already stored
    pub inserted: u64,
}

impl ImportSummary {
    /// Rows skipped because their `(idx, id)` already existed
    pub fn skipped(&self) -> u64 {
        (self.read as u64).saturating_sub(self.inserted)
    }
}

/// Loads a dataset file into a track store
pub struct TrackImporter {
    store: Arc<dyn TrackStore>,
}

impl TrackImporter {
    /// Create a new importer writing into `store`
    pub fn new(store: Arc<dyn TrackStore>) -> Self {
        Self { store }
    }

    /// Read, validate and insert every row of the dataset in one batch
    ///
    /// Existing rows are left untouched, so running this on every start is safe.
    pub async fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportSummary> {
        let path = path.as_ref();
        let start_time = Instant::now();

        let dataset = dataset::read_dataset(path).await?;
        tracing::debug!(rows = dataset.row_count(), "Transforming dataset rows");

        let tracks = dataset.into_tracks()?;
        let read = tracks.len();

        let inserted = self.store.insert_tracks(&tracks).await?;
        let summary = ImportSummary { read, inserted };

        tracing::info!(
            path = %path.display(),
            read = summary.read,
            inserted = summary.inserted,
            skipped = summary.skipped(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Dataset imported"
        );

        Ok(summary)
    }
}
