//! Forecourt Serve - admin JSON API for the listing catalog.

use std::sync::Arc;

use axum::http::Request;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use forecourt_serve::{AppState, Config, router};
use forecourt_store::{ListingStore, MemoryBackend, MemoryMediaStorage, ensure_seeded};

/// Forecourt Serve - admin API over the listing store.
#[derive(Parser, Debug)]
#[command(name = "forecourt-serve")]
#[command(about = "Admin JSON API for vehicle listings", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load .env file if it exists
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();

    // Listing collection with the demo inventory on first run
    let backend = Arc::new(MemoryBackend::new());
    ensure_seeded(backend.as_ref()).await?;
    let store = ListingStore::connect(backend);
    let media = Arc::new(MemoryMediaStorage::new(config.media_base_url.clone()));

    // Create application state
    let state = AppState::new(config, store, media);

    // Build router with middleware
    let app = router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting admin API server");

    axum::serve(listener, app).await?;

    Ok(())
}
