//! viv-tracks Catalog Client
//!
//! HTTP client for the catalog service plus the presentation logic used to
//! browse the catalog: paging, a table with pinned columns, and CSV export.
//!
//! # Example
//!
//! ```ignore
//! use viv_server_client::{CatalogClient, ClientConfig, TrackBrowser};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(ClientConfig::new("http://localhost:3000"))?;
//!
//!     // Load everything once, then page locally
//!     let mut browser = TrackBrowser::new(client);
//!     browser.load().await;
//!     if let Some(page) = browser.page(0) {
//!         println!("{}", browser.table().render(page, 8));
//!     }
//!
//!     Ok(())
//! }
//! ```

mod browser;
mod client;
mod csv;
mod error;
mod table;
mod types;

pub use browser::{LoadState, TrackBrowser};
pub use client::CatalogClient;
pub use csv::tracks_to_csv;
pub use error::{ClientError, Result};
pub use table::{Paginator, TableView, DEFAULT_PAGE_SIZE, DEFAULT_STICKY_COLUMNS};
pub use types::{ApiErrorBody, ClientConfig, HealthStatus, TrackQuery, UpdateResponse};
