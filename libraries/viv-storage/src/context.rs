use crate::tracks;
use async_trait::async_trait;
use sqlx::SqlitePool;
use viv_core::{
    error::Result,
    storage::{TrackFilter, TrackStore},
    types::{Track, TrackKey},
};

/// Track store backed by `SQLite`
#[derive(Clone)]
pub struct SqliteTrackStore {
    pool: SqlitePool,
}

impl SqliteTrackStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TrackStore for SqliteTrackStore {
    async fn insert_tracks(&self, tracks: &[Track]) -> Result<u64> {
        tracks::insert(&self.pool, tracks).await.map_err(Into::into)
    }

    async fn get_tracks(&self, filter: &TrackFilter) -> Result<Vec<Track>> {
        tracks::get(&self.pool, filter).await.map_err(Into::into)
    }

    async fn get_track(&self, key: &TrackKey) -> Result<Option<Track>> {
        tracks::get_by_key(&self.pool, key).await.map_err(Into::into)
    }

    async fn update_track(&self, track: &Track) -> Result<bool> {
        tracks::update(&self.pool, track).await.map_err(Into::into)
    }
}
