//! viv-tracks Core
//!
//! Platform-agnostic types, traits, and error handling for the viv-tracks catalog.
//!
//! This crate provides the building blocks shared by the storage layer, the
//! dataset importer, the HTTP service and the client.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackKey` and the static `TrackField` schema
//! - **Patch Documents**: `PatchOperation` plus the pure `patch::validate` / `patch::apply`
//! - **Core Traits**: `TrackStore`
//! - **Error Handling**: Unified `VivError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use viv_core::patch::{self, PatchOperation};
//! use viv_core::types::Track;
//!
//! let track = Track::unrated(0, "1", "21 Guns");
//! let ops: Vec<PatchOperation> =
//!     serde_json::from_str(r#"[{"op": "replace", "path": "/rating", "value": 4}]"#).unwrap();
//!
//! let document = serde_json::to_value(&track).unwrap();
//! let patched = patch::apply(&ops, &document).unwrap();
//! assert_eq!(patched["rating"], 4);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod patch;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{Result, VivError};
pub use patch::{JsonPointer, PatchError, PatchOperation};
pub use storage::{TrackFilter, TrackStore};

pub use types::{FieldKind, FieldValue, Track, TrackField, TrackKey, RATING_UNRATED};
