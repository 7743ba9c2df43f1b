/// viv-tracks server - loads the track dataset and serves the catalog API
use clap::{Parser, Subcommand};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use viv_core::storage::TrackStore;
use viv_importer::TrackImporter;
use viv_server::{api, config::ServerConfig, state::AppState};
use viv_storage::SqliteTrackStore;

#[derive(Parser)]
#[command(name = "viv-server")]
#[command(about = "Serves data describing the tracks (songs)", long_about = None)]
struct Cli {
    /// Column-oriented JSON dataset, loaded before the server starts
    #[arg(short, long, env = "VIV_DATASET")]
    file: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset and start the HTTP server (default)
    Serve,
    /// Load the dataset into the database and exit
    Import,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "viv_server=info,viv_importer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = ServerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config, &cli.file).await?,
        Commands::Import => {
            open_store(&config, &cli.file).await?;
        }
    }

    Ok(())
}

/// Open the database and ingest the dataset; any failure aborts startup
async fn open_store(config: &ServerConfig, file: &Path) -> anyhow::Result<Arc<dyn TrackStore>> {
    let pool = viv_storage::create_pool(&config.storage.database_url).await?;
    viv_storage::run_migrations(&pool).await?;
    info!(database_url = %config.storage.database_url, "Database connected");

    let store: Arc<dyn TrackStore> = Arc::new(SqliteTrackStore::new(pool));

    let summary = TrackImporter::new(Arc::clone(&store))
        .import_file(file)
        .await?;
    info!(
        read = summary.read,
        inserted = summary.inserted,
        "Dataset loaded from {}",
        file.display()
    );

    Ok(store)
}

async fn serve(config: &ServerConfig, file: &Path) -> anyhow::Result<()> {
    info!("Starting viv-tracks server");

    let store = open_store(config, file).await?;
    let app = api::app(AppState::new(store), &config.server.client_origin)?;

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(client_origin = %config.server.client_origin, "Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = match signal(SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(err) => {
                warn!("Failed to install terminate signal handler: {}", err);
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", err);
        }
    }

    info!("Shutdown signal received");
}
