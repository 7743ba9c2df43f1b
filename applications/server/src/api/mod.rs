/// API route modules
pub mod health;
pub mod params;
pub mod tracks;

use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Canonical tracks collection
pub const TRACKS_PATH: &str = "/api/v1/tracks";

/// Old tracks path, permanently redirected to [`TRACKS_PATH`]
pub const LEGACY_TRACKS_PATH: &str = "/api/tracks";

/// Routes without CORS or tracing
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route(
            TRACKS_PATH,
            get(tracks::list_tracks)
                .patch(tracks::update_track)
                .fallback(tracks::not_supported),
        )
        .route(LEGACY_TRACKS_PATH, any(legacy_redirect))
        .route("/api/health", get(health::health))
        .fallback(unknown_endpoint)
        .layer(middleware::from_fn(answer_options))
        .with_state(app_state)
}

/// Full application: routes, CORS restricted to `client_origin`, request tracing
pub fn app(app_state: AppState, client_origin: &str) -> Result<Router> {
    let origin = HeaderValue::from_str(client_origin)
        .map_err(|e| ServerError::Config(format!("Invalid client origin: {}", e)))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(router(app_state)
        .layer(cors)
        .layer(middleware::from_fn(preflight_no_content))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        ))
}

/// `OPTIONS` on any path answers 204 with no body
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(request).await
}

/// CORS preflights are answered by `CorsLayer` with 200; report them as 204
/// and keep the `Access-Control-*` headers
async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if is_options {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

/// 301 to the canonical path, keeping the query string
async fn legacy_redirect(uri: Uri) -> Response {
    let location = match uri.query() {
        Some(query) => format!("{}?{}", TRACKS_PATH, query),
        None => TRACKS_PATH.to_string(),
    };
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

async fn unknown_endpoint() -> ServerError {
    ServerError::EndpointNotFound
}
