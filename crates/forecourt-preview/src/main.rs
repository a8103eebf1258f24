//! Forecourt Preview - rendering dispatcher for the vehicle detail page.
//!
//! Classifies requesting agents (human / social-preview bot / search
//! crawler) and serves the appropriate representation of a listing's
//! detail page.

use std::sync::Arc;

use axum::http::Request;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use forecourt_preview::{AppState, Config, router};
use forecourt_store::{MemoryBackend, ensure_seeded};

/// Forecourt Preview - agent-aware detail pages for vehicle listings.
#[derive(Parser, Debug)]
#[command(name = "forecourt-preview")]
#[command(about = "Rendering dispatcher for vehicle detail pages", long_about = None)]
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

    // Create application state
    let state = AppState::new(config, backend)?;

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
    tracing::info!(addr = %bind_addr, "starting preview server");

    axum::serve(listener, app).await?;

    Ok(())
}
