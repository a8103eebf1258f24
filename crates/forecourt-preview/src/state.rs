//! Application state shared across all request handlers.

use std::sync::Arc;

use moka::future::Cache;

use forecourt_store::ListingBackend;

use crate::agent::BotSignatures;
use crate::config::Config;

/// Shell cache capacity. There is normally exactly one shell URL, so this
/// only guards against config churn under a long-lived process.
const SHELL_CACHE_CAPACITY: u64 = 4;

/// Type alias for the app-shell HTML cache, keyed by shell URL.
pub type ShellCache = Cache<String, String>;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Compiled bot signature lists.
    pub signatures: Arc<BotSignatures>,

    /// Read handle on the listing collection.
    pub listings: Arc<dyn ListingBackend>,

    /// HTTP client for the outbound shell fetch (bounded timeout).
    pub http: reqwest::Client,

    /// Cache of successfully fetched shell HTML.
    pub shell_cache: ShellCache,
}

impl AppState {
    /// Create application state from configuration and a listing backend.
    pub fn new(config: Config, listings: Arc<dyn ListingBackend>) -> anyhow::Result<Self> {
        let signatures = BotSignatures::from_config(&config);

        let http = reqwest::Client::builder()
            .timeout(config.shell_fetch_timeout)
            .build()?;

        let shell_cache = Cache::builder()
            .max_capacity(SHELL_CACHE_CAPACITY)
            .time_to_live(config.shell_cache_ttl)
            .build();

        tracing::info!(
            shell_url = %config.shell_url,
            shell_cache_ttl_secs = config.shell_cache_ttl.as_secs(),
            "application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            signatures: Arc::new(signatures),
            listings,
            http,
            shell_cache,
        })
    }
}
