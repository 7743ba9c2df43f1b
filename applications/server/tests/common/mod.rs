/// Common test utilities and fixtures
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;
use viv_core::{storage::TrackStore, types::Track};
use viv_server::{api, state::AppState};
use viv_storage::SqliteTrackStore;

pub const CLIENT_ORIGIN: &str = "http://localhost:5173";

/// Router over a real on-disk database, removed on drop
pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteTrackStore>,
    pub temp_dir: TempDir,
}

impl TestApp {
    /// Fresh database seeded with [`fixtures::tracks`]
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

        let pool = viv_storage::create_pool(&db_url).await.unwrap();
        viv_storage::run_migrations(&pool).await.unwrap();

        let store = Arc::new(SqliteTrackStore::new(pool));
        store.insert_tracks(&fixtures::tracks()).await.unwrap();

        let router = api::app(AppState::new(store.clone()), CLIENT_ORIGIN).unwrap();

        Self {
            router,
            store,
            temp_dir,
        }
    }

    /// Send one request through the full middleware stack
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn patch_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(
            Request::patch(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    pub fn tracks(&self) -> Vec<Track> {
        serde_json::from_value(self.body.clone()).unwrap()
    }
}

pub mod fixtures {
    use viv_core::types::Track;

    /// Three tracks with distinct titles and features
    pub fn tracks() -> Vec<Track> {
        let mut first = Track::unrated(0, "5vYA1mW9g2Coh1HUFUSmlb", "3AM");
        first.tempo = 108.031;
        first.duration = 225_947;

        let mut second = Track::unrated(1, "2klCjJcucgGQysgH170npL", "4 Walls");
        second.tempo = 120.0;
        second.duration = 207_477;

        let mut third = Track::unrated(2, "093PI3mdUvOSlvMYDwnV1e", "Walls Come Down");
        third.tempo = 96.5;
        third.duration = 193_933;

        vec![first, second, third]
    }
}
