//! Catalog service
//!
//! Listing and patch-based updates on top of a `TrackStore`. Handlers stay thin
//! and every rule about what an update may change lives here.

use crate::error::{messages, Result, ServerError};
use std::sync::Arc;
use viv_core::{
    patch::{self, PatchOperation},
    storage::{TrackFilter, TrackStore},
    types::{Track, TrackKey},
};

/// Track catalog operations
pub struct CatalogService {
    store: Arc<dyn TrackStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn TrackStore>) -> Self {
        Self { store }
    }

    /// List tracks matching `filter`
    pub async fn list(&self, filter: &TrackFilter) -> Result<Vec<Track>> {
        let tracks = self.store.get_tracks(filter).await?;
        tracing::debug!(?filter, count = tracks.len(), "Listed tracks");
        Ok(tracks)
    }

    /// Apply a patch document to the stored track with `key`
    ///
    /// The patch runs against the track's JSON form. The result must still be
    /// a complete track with the same `(idx, id)`, and nothing is written
    /// unless every check passes. Returns whether the write matched a row.
    ///
    /// The lookup and the write are separate statements, so two concurrent
    /// updates of one track may interleave and the later write wins.
    pub async fn update(&self, key: &TrackKey, ops: &[PatchOperation]) -> Result<bool> {
        let current = self
            .store
            .get_track(key)
            .await?
            .ok_or_else(|| ServerError::bad_request(messages::TRACK_NOT_FOUND))?;

        let document = serde_json::to_value(&current)
            .map_err(|e| ServerError::Internal(format!("Failed to serialize track {}: {}", key, e)))?;

        // All operations apply or none do
        let patched = patch::apply(ops, &document).map_err(|e| {
            tracing::debug!(track = %key, error = %e, "Rejected patch");
            ServerError::bad_request(messages::INVALID_PATCH)
        })?;

        let updated: Track = serde_json::from_value(patched).map_err(|e| {
            tracing::debug!(track = %key, error = %e, "Patched document is not a track");
            ServerError::bad_request(messages::INVALID_PATCH)
        })?;

        if updated.key() != *key {
            return Err(ServerError::bad_request(messages::KEY_IMMUTABLE));
        }

        let applied = self.store.update_track(&updated).await?;
        tracing::info!(track = %key, ops = ops.len(), applied, "Updated track");
        Ok(applied)
    }
}
