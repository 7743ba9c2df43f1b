//! HTTP client for the catalog service.

use crate::error::{ClientError, Result};
use crate::types::{ApiErrorBody, ClientConfig, HealthStatus, TrackQuery, UpdateResponse};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use viv_core::patch::PatchOperation;
use viv_core::types::{Track, TrackKey};

/// Path of the tracks collection.
const TRACKS_PATH: &str = "/api/v1/tracks";

/// Client for a catalog service.
///
/// # Example
///
/// ```ignore
/// use viv_server_client::{CatalogClient, ClientConfig, TrackQuery};
///
/// let client = CatalogClient::new(ClientConfig::new("http://localhost:3000"))?;
/// let tracks = client.list_tracks(&TrackQuery::all().title("walls")).await?;
/// ```
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("viv-tracks/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Base URL without trailing slash.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Check that the service is up.
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/api/health", self.base_url);
        let response = self.http.get(&url).send().await.map_err(unreachable)?;
        parse_json(check_status(response).await?).await
    }

    /// List tracks matching `query`.
    pub async fn list_tracks(&self, query: &TrackQuery) -> Result<Vec<Track>> {
        let url = format!("{}{}", self.base_url, TRACKS_PATH);
        debug!(url = %url, ?query, "Listing tracks");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(unreachable)?;

        let tracks: Vec<Track> = parse_json(check_status(response).await?).await?;
        debug!(count = tracks.len(), "Fetched tracks");
        Ok(tracks)
    }

    /// Fetch the whole collection.
    pub async fn fetch_all(&self) -> Result<Vec<Track>> {
        self.list_tracks(&TrackQuery::all()).await
    }

    /// Apply a patch document to one track.
    ///
    /// Returns the service's `data` flag: `false` means the write matched no row.
    pub async fn patch_track(&self, key: &TrackKey, ops: &[PatchOperation]) -> Result<bool> {
        let url = format!("{}{}", self.base_url, TRACKS_PATH);
        debug!(url = %url, track = %key, ops = ops.len(), "Patching track");

        let response = self
            .http
            .patch(&url)
            .query(&[("id", key.id.as_str()), ("idx", key.idx.to_string().as_str())])
            .json(ops)
            .send()
            .await
            .map_err(unreachable)?;

        let body: UpdateResponse = parse_json(check_status(response).await?).await?;
        if let Some(error) = &body.error {
            warn!(track = %key, error = %error, "Update was not applied");
        }
        Ok(body.data.unwrap_or(false))
    }

    /// Set the rating of a track.
    pub async fn set_rating(&self, key: &TrackKey, rating: i64) -> Result<bool> {
        self.patch_track(key, &[PatchOperation::replace_member("rating", rating)])
            .await
    }

    /// Rename a track.
    pub async fn set_title(&self, key: &TrackKey, title: &str) -> Result<bool> {
        self.patch_track(key, &[PatchOperation::replace_member("title", title)])
            .await
    }
}

fn unreachable(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

/// Turn a non-success response into `ClientError::Server` with the service's message.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(e.to_string()))
}
