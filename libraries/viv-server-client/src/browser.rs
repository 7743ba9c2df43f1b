//! Browsing state over the loaded catalog.

use crate::client::CatalogClient;
use crate::csv::tracks_to_csv;
use crate::error::Result;
use crate::table::{Paginator, TableView, DEFAULT_PAGE_SIZE};
use tracing::{info, warn};
use viv_core::types::Track;

/// Where the browser is in loading the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    /// Load failed; holds the error text
    Failed(String),
}

/// Loads the whole catalog once and pages through it locally.
pub struct TrackBrowser {
    client: CatalogClient,
    state: LoadState,
    tracks: Vec<Track>,
    page_size: usize,
    table: TableView,
}

impl TrackBrowser {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            state: LoadState::Idle,
            tracks: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            table: TableView::new(),
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Tracks from the last successful load
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn table(&self) -> &TableView {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableView {
        &mut self.table
    }

    /// Fetch the full collection, replacing whatever was loaded
    ///
    /// On failure the previous tracks are dropped and the state becomes `Failed`.
    pub async fn load(&mut self) -> Result<usize> {
        self.state = LoadState::Loading;

        match self.client.fetch_all().await {
            Ok(tracks) => {
                info!(count = tracks.len(), "Loaded catalog");
                self.tracks = tracks;
                self.state = LoadState::Loaded;
                Ok(self.tracks.len())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load catalog");
                self.tracks.clear();
                self.state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub fn paginator(&self) -> Paginator {
        Paginator::new(self.tracks.len(), self.page_size)
    }

    pub fn page_count(&self) -> usize {
        self.paginator().page_count()
    }

    /// Tracks on page `index`
    pub fn page(&self, index: usize) -> Option<&[Track]> {
        self.paginator().page(&self.tracks, index)
    }

    /// CSV of every loaded track; `None` when nothing is loaded
    pub fn export_csv(&self) -> Option<String> {
        if self.tracks.is_empty() {
            return None;
        }
        Some(tracks_to_csv(&self.tracks))
    }
}
