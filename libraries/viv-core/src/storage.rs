//! Storage trait for the track catalog

use crate::error::Result;
use crate::types::{Track, TrackKey};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Optional filters for listing tracks
///
/// An empty filter selects every track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Inclusive lower bound on `idx`
    pub offset: Option<i64>,
    /// Maximum number of rows
    pub limit: Option<i64>,
}

impl TrackFilter {
    /// Filter that selects every track
    pub fn all() -> Self {
        Self::default()
    }
}

/// Persistent track catalog
///
/// This trait abstracts storage operations so the service layer can run
/// against `SQLite` or an in-memory double in tests.
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Insert tracks, ignoring any whose `(idx, id)` already exists
    ///
    /// Returns the number of rows actually inserted.
    async fn insert_tracks(&self, tracks: &[Track]) -> Result<u64>;

    /// List tracks matching `filter` in insertion order
    async fn get_tracks(&self, filter: &TrackFilter) -> Result<Vec<Track>>;

    /// Point lookup by primary key
    async fn get_track(&self, key: &TrackKey) -> Result<Option<Track>>;

    /// Overwrite every non-key column of the track with the same key
    ///
    /// Returns `false` when no row matched.
    async fn update_track(&self, track: &Track) -> Result<bool>;
}
