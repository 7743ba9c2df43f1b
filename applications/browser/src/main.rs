/// viv-browse - page through, rate and export the track catalog
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use viv_core::types::TrackKey;
use viv_server_client::{
    CatalogClient, ClientConfig, TableView, TrackBrowser, DEFAULT_PAGE_SIZE,
    DEFAULT_STICKY_COLUMNS,
};

#[derive(Parser)]
#[command(name = "viv-browse")]
#[command(about = "Browse the viv-tracks catalog", long_about = None)]
struct Cli {
    /// Catalog service base URL
    #[arg(long, env = "VIV_SERVER_URL", default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of the table
    List {
        /// Zero-based page number
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Tracks per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// Columns that fit on screen
        #[arg(short, long, default_value_t = 8)]
        width: usize,

        /// Scroll the unpinned columns right by this many
        #[arg(short, long, default_value_t = 0)]
        scroll: usize,

        /// Leading columns kept in place while scrolling
        #[arg(long, default_value_t = DEFAULT_STICKY_COLUMNS)]
        sticky: usize,
    },
    /// Check that the catalog service is up
    Health,
    /// Write every loaded track as CSV
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rate a track
    Rate {
        #[arg(long)]
        idx: i64,
        #[arg(long)]
        id: String,
        #[arg(short, long)]
        rating: i64,
    },
    /// Rename a track
    Rename {
        #[arg(long)]
        idx: i64,
        #[arg(long)]
        id: String,
        #[arg(short, long)]
        title: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so CSV output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "viv_browse=warn,viv_server_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = CatalogClient::new(ClientConfig::new(cli.url))?;

    match cli.command {
        Commands::List {
            page,
            page_size,
            width,
            scroll,
            sticky,
        } => {
            let mut browser = TrackBrowser::new(client).with_page_size(page_size);
            browser.load().await.context("Failed to load tracks")?;
            *browser.table_mut() = TableView::new().with_sticky(sticky);
            browser.table_mut().scroll_to(scroll);

            let page_count = browser.page_count();
            match browser.page(page) {
                Some(tracks) => {
                    println!("{}", browser.table().render(tracks, width));
                    println!();
                    println!(
                        "Page {} of {} ({} tracks)",
                        page + 1,
                        page_count,
                        browser.tracks().len()
                    );
                }
                None if page_count == 0 => println!("No tracks"),
                None => anyhow::bail!("Page {} does not exist ({} pages)", page, page_count),
            }
        }
        Commands::Health => {
            let health = client.health().await.context("Catalog service is not healthy")?;
            println!("{} (version {})", health.status, health.version);
        }
        Commands::Export { output } => {
            let mut browser = TrackBrowser::new(client);
            browser.load().await.context("Failed to load tracks")?;

            let Some(csv) = browser.export_csv() else {
                tracing::warn!("Nothing to export");
                return Ok(());
            };
            match output {
                Some(path) => {
                    tokio::fs::write(&path, csv)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "Exported tracks");
                }
                None => println!("{}", csv),
            }
        }
        Commands::Rate { idx, id, rating } => {
            let key = TrackKey::new(idx, id);
            report(&key, client.set_rating(&key, rating).await?);
        }
        Commands::Rename { idx, id, title } => {
            let key = TrackKey::new(idx, id);
            report(&key, client.set_title(&key, &title).await?);
        }
    }

    Ok(())
}

fn report(key: &TrackKey, applied: bool) {
    if applied {
        println!("Updated track {}", key);
    } else {
        println!("Track {} was not updated", key);
    }
}
