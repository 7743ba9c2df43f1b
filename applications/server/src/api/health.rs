/// Health check API routes
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use viv_core::storage::TrackFilter;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health - reports `unavailable` with 503 when the store cannot be read
pub async fn health(State(app_state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let one_row = TrackFilter {
        limit: Some(1),
        ..TrackFilter::default()
    };

    let (status, label) = match app_state.catalog.list(&one_row).await {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
