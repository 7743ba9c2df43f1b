//! viv-tracks Server Library
//!
//! HTTP catalog service over the track store: filtered listing and
//! JSON Patch updates of single tracks.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::CatalogService;
pub use state::AppState;
