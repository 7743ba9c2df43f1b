/// Tracks API routes
use crate::{
    api::params::{ListParams, UpdateParams},
    error::{messages, Result, ServerError},
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, FromRequest, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use viv_core::{patch::PatchOperation, types::Track};

/// Body of a `PATCH` that reached the store
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub data: bool,
    pub error: Option<&'static str>,
}

/// GET /api/v1/tracks
pub async fn list_tracks(
    State(app_state): State<AppState>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Track>>> {
    let Query(params) = params.map_err(|rejection| ServerError::bad_request(rejection.body_text()))?;
    let filter = params.into_filter()?;
    let tracks = app_state.catalog.list(&filter).await?;
    Ok(Json(tracks))
}

/// PATCH /api/v1/tracks?id=..&idx=..
///
/// Body is a JSON Patch document applied to the track's JSON form. The body is
/// only read once the key and content type are accepted.
pub async fn update_track(
    State(app_state): State<AppState>,
    params: std::result::Result<Query<UpdateParams>, QueryRejection>,
    headers: HeaderMap,
    request: Request,
) -> Result<Json<UpdateResponse>> {
    let Query(params) = params.map_err(|_| ServerError::bad_request(messages::MISSING_KEY))?;
    let key = params.into_key()?;

    if !is_json(&headers) {
        return Err(ServerError::UnsupportedMediaType);
    }

    let body = Bytes::from_request(request, &app_state)
        .await
        .map_err(|rejection| {
            tracing::debug!(track = %key, error = %rejection, "Failed to read patch body");
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ServerError::PayloadTooLarge
            } else {
                ServerError::bad_request(messages::INVALID_PATCH)
            }
        })?;

    let ops: Vec<PatchOperation> = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(track = %key, error = %e, "Malformed patch document");
        ServerError::bad_request(messages::INVALID_PATCH)
    })?;

    let applied = app_state.catalog.update(&key, &ops).await?;

    Ok(Json(UpdateResponse {
        data: applied,
        error: (!applied).then_some(messages::NOT_UPDATED),
    }))
}

/// Any other method on the tracks endpoint
pub async fn not_supported() -> ServerError {
    ServerError::NotSupported
}

/// `application/json`, parameters such as `charset` allowed
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}
