/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Client-facing error texts
pub mod messages {
    pub const INVALID_TITLE: &str = "Invalid title";
    pub const INVALID_START: &str = "`start` must be a valid integer";
    pub const INVALID_LIMIT: &str = "`limit` must be a valid integer greater than 0.";
    pub const MISSING_KEY: &str =
        "The Update Request must specify the ID and the Idx of the track to be updated in the request URL.";
    pub const NOT_JSON: &str = "Request body must be in JSON.";
    pub const INVALID_PATCH: &str = "Body is not valid JSON Patch spec.";
    pub const KEY_IMMUTABLE: &str = "The key of a track (`idx`, `id`) cannot be modified.";
    pub const TRACK_NOT_FOUND: &str = "Track to be updated does not exist";
    pub const NOT_UPDATED: &str = "Could not update the document (Reason Unknown).";
    pub const BODY_TOO_LARGE: &str = "Request body is too large.";
    pub const NOT_SUPPORTED: &str = "Not supported.";
    pub const UNKNOWN_ENDPOINT: &str = "Bad Request: This endpoint does not exist.";
    pub const UNKNOWN_ERROR: &str = "An unknown error occurred. Please try again later.";
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported media type")]
    UnsupportedMediaType,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Method not supported")]
    NotSupported,

    #[error("Endpoint not found")]
    EndpointNotFound,

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] viv_core::VivError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServerError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                messages::NOT_JSON.to_string(),
            ),
            ServerError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                messages::BODY_TOO_LARGE.to_string(),
            ),
            ServerError::NotSupported => (
                StatusCode::NOT_IMPLEMENTED,
                messages::NOT_SUPPORTED.to_string(),
            ),
            ServerError::EndpointNotFound => (
                StatusCode::NOT_FOUND,
                messages::UNKNOWN_ENDPOINT.to_string(),
            ),
            ServerError::Catalog(ref e) => {
                tracing::error!("Catalog error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::UNKNOWN_ERROR.to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::UNKNOWN_ERROR.to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    messages::UNKNOWN_ERROR.to_string(),
                )
            }
        };

        let body = Json(json!({
            "data": null,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: ServerError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn bad_request_keeps_message() {
        let (status, body) = render(ServerError::bad_request(messages::INVALID_TITLE)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "data": null, "error": "Invalid title" }));
    }

    #[tokio::test]
    async fn internal_details_are_not_exposed() {
        let (status, body) = render(ServerError::Catalog(viv_core::VivError::storage(
            "disk I/O error at /var/lib/tracks.db",
        )))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], messages::UNKNOWN_ERROR);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn fixed_statuses() {
        assert_eq!(
            render(ServerError::UnsupportedMediaType).await.0,
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            render(ServerError::PayloadTooLarge).await.0,
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            render(ServerError::NotSupported).await.0,
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            render(ServerError::EndpointNotFound).await.0,
            StatusCode::NOT_FOUND
        );
    }
}
