//! viv-tracks Storage
//!
//! `SQLite` database layer for the track catalog.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: the `tracks` module owns its queries
//! - **Static Schema**: column lists come from `viv_core::TrackField`
//! - **Idempotent Ingestion**: inserts never overwrite existing rows
//!
//! # Example
//!
//! ```rust,no_run
//! use viv_storage::{create_pool, run_migrations, SqliteTrackStore};
//! use viv_core::{TrackFilter, TrackStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create database connection
//! let pool = create_pool("sqlite://tracks.db").await?;
//! run_migrations(&pool).await?;
//!
//! // Get all tracks
//! let store = SqliteTrackStore::new(pool);
//! let tracks = store.get_tracks(&TrackFilter::all()).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod tracks;

pub use context::SqliteTrackStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://tracks.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    // Parse the URL into options so we can configure SQLite behavior
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool created");

    Ok(pool)
}
