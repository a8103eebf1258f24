//! Application state and configuration.

use std::collections::HashSet;
use std::sync::Arc;

use forecourt_store::{ListingStore, MediaStorage};

/// Application configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8081").
    pub bind_addr: String,

    /// Valid API tokens (loaded from FORECOURT_API_TOKENS).
    pub api_tokens: HashSet<String>,

    /// Base URL under which stored media is served.
    pub media_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `FORECOURT_API_TOKENS`: Comma-separated list of valid API tokens
    ///
    /// Optional environment variables:
    /// - `SERVE_BIND_ADDR`: Server bind address (default: "0.0.0.0:8081")
    /// - `MEDIA_BASE_URL`: Public media URL base (default:
    ///   "http://localhost:8081/media")
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("SERVE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let tokens_str = std::env::var("FORECOURT_API_TOKENS")
            .map_err(|_| anyhow::anyhow!("FORECOURT_API_TOKENS environment variable is required"))?;

        let api_tokens: HashSet<String> = tokens_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if api_tokens.is_empty() {
            anyhow::bail!("FORECOURT_API_TOKENS must contain at least one token");
        }

        let media_base_url = std::env::var("MEDIA_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8081/media".to_string())
            .trim_end_matches('/')
            .to_string();

        tracing::info!(
            bind_addr = %bind_addr,
            token_count = api_tokens.len(),
            media_base_url = %media_base_url,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            api_tokens,
            media_base_url,
        })
    }
}

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The listing store (single point of truth for listing data).
    pub store: ListingStore,

    /// Object storage for listing images.
    pub media: Arc<dyn MediaStorage>,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: Config, store: ListingStore, media: Arc<dyn MediaStorage>) -> Self {
        Self {
            store,
            media,
            config: Arc::new(config),
        }
    }
}
