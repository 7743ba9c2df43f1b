/// Shared application state
use crate::services::CatalogService;
use std::sync::Arc;
use viv_core::storage::TrackStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    pub fn new(store: Arc<dyn TrackStore>) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(store)),
        }
    }
}
