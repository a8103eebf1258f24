//! Dispatcher configuration loaded from environment variables.

use std::time::Duration;

/// Default social-preview bot signatures (link-unfurling crawlers).
const DEFAULT_SOCIAL_SIGNATURES: &[&str] = &[
    "facebookexternalhit",
    "whatsapp",
    "twitterbot",
    "linkedinbot",
    "slackbot",
    "telegrambot",
    "discordbot",
    "skypeuripreview",
];

/// Default search-indexing bot signatures (general web crawlers).
const DEFAULT_SEARCH_SIGNATURES: &[&str] = &[
    "googlebot",
    "bingbot",
    "duckduckbot",
    "yandexbot",
    "baiduspider",
    "applebot",
];

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8082").
    pub bind_addr: String,

    /// Public base URL of the site (used in canonical URLs and OG tags).
    pub base_url: String,

    /// Site name shown in page titles and OG tags.
    pub site_name: String,

    /// Upstream URL of the canonical single-page-app shell HTML.
    pub shell_url: String,

    /// Site-relative path of the app detail route, used for client-side
    /// redirect fallbacks (the listing id is appended as `?id=`).
    pub app_detail_path: String,

    /// Base URL of the image-resizing proxy. Empty disables resizing and
    /// card images are used at their source URL.
    pub resize_proxy_url: String,

    /// Generic brand image used when a listing has no photos at all.
    pub fallback_image_url: String,

    /// Favicon / touch-icon URL advertised to messenger apps.
    pub icon_url: String,

    /// HTML comment marking the start of the replaceable meta-tag block in
    /// the app shell.
    pub meta_marker: String,

    /// Bound on the outbound shell fetch.
    pub shell_fetch_timeout: Duration,

    /// How long a successfully fetched shell is reused before refetching.
    pub shell_cache_ttl: Duration,

    /// Social-preview bot signatures (lowercase substrings).
    pub social_signatures: Vec<String>,

    /// Search-indexing bot signatures (lowercase substrings).
    pub search_signatures: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables have defaults for local development:
    /// - `PREVIEW_BIND_ADDR`: bind address (default: "0.0.0.0:8082")
    /// - `PREVIEW_BASE_URL`: public site URL (default: "http://localhost:8082")
    /// - `PREVIEW_SITE_NAME`: site name (default: "Forecourt Motors")
    /// - `PREVIEW_SHELL_URL`: upstream app shell (default:
    ///   "http://localhost:8080/vehicles/detail-app.html")
    /// - `PREVIEW_APP_DETAIL_PATH`: redirect path (default:
    ///   "/vehicles/detail-app.html")
    /// - `PREVIEW_RESIZE_PROXY_URL`: image proxy base (default: empty)
    /// - `PREVIEW_FALLBACK_IMAGE_URL`: generic card image
    /// - `PREVIEW_ICON_URL`: favicon URL
    /// - `PREVIEW_META_MARKER`: injection marker comment
    /// - `PREVIEW_SHELL_TIMEOUT_SECS`: shell fetch timeout (default: 5)
    /// - `PREVIEW_SHELL_CACHE_SECS`: shell cache TTL (default: 60)
    /// - `PREVIEW_SOCIAL_BOTS` / `PREVIEW_SEARCH_BOTS`: comma-separated
    ///   signature overrides
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("PREVIEW_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8082".to_string());

        let base_url = std::env::var("PREVIEW_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8082".to_string())
            .trim_end_matches('/')
            .to_string();

        let site_name =
            std::env::var("PREVIEW_SITE_NAME").unwrap_or_else(|_| "Forecourt Motors".to_string());

        let shell_url = std::env::var("PREVIEW_SHELL_URL")
            .unwrap_or_else(|_| "http://localhost:8080/vehicles/detail-app.html".to_string());

        let app_detail_path = std::env::var("PREVIEW_APP_DETAIL_PATH")
            .unwrap_or_else(|_| "/vehicles/detail-app.html".to_string());

        let resize_proxy_url = std::env::var("PREVIEW_RESIZE_PROXY_URL").unwrap_or_default();

        let fallback_image_url = std::env::var("PREVIEW_FALLBACK_IMAGE_URL")
            .unwrap_or_else(|_| format!("{base_url}/assets/logo.png"));

        let icon_url = std::env::var("PREVIEW_ICON_URL")
            .unwrap_or_else(|_| format!("{base_url}/assets/icons/favicon.png"));

        let meta_marker = std::env::var("PREVIEW_META_MARKER")
            .unwrap_or_else(|_| "<!-- dynamic-meta -->".to_string());

        let shell_fetch_timeout =
            Duration::from_secs(env_u64("PREVIEW_SHELL_TIMEOUT_SECS").unwrap_or(5));

        let shell_cache_ttl = Duration::from_secs(env_u64("PREVIEW_SHELL_CACHE_SECS").unwrap_or(60));

        let social_signatures = env_signatures("PREVIEW_SOCIAL_BOTS", DEFAULT_SOCIAL_SIGNATURES);
        let search_signatures = env_signatures("PREVIEW_SEARCH_BOTS", DEFAULT_SEARCH_SIGNATURES);

        tracing::info!(
            bind_addr = %bind_addr,
            base_url = %base_url,
            shell_url = %shell_url,
            social_count = social_signatures.len(),
            search_count = search_signatures.len(),
            "preview configuration loaded"
        );

        Ok(Self {
            bind_addr,
            base_url,
            site_name,
            shell_url,
            app_detail_path,
            resize_proxy_url,
            fallback_image_url,
            icon_url,
            meta_marker,
            shell_fetch_timeout,
            shell_cache_ttl,
            social_signatures,
            search_signatures,
        })
    }

    /// Canonical public URL for a listing's detail page.
    pub fn canonical_url(&self, listing_id: &str) -> String {
        format!("{}/vehicles/detail?id={}", self.base_url, listing_id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8082".to_string(),
            base_url: "http://localhost:8082".to_string(),
            site_name: "Forecourt Motors".to_string(),
            shell_url: "http://localhost:8080/vehicles/detail-app.html".to_string(),
            app_detail_path: "/vehicles/detail-app.html".to_string(),
            resize_proxy_url: String::new(),
            fallback_image_url: "http://localhost:8082/assets/logo.png".to_string(),
            icon_url: "http://localhost:8082/assets/icons/favicon.png".to_string(),
            meta_marker: "<!-- dynamic-meta -->".to_string(),
            shell_fetch_timeout: Duration::from_secs(5),
            shell_cache_ttl: Duration::from_secs(60),
            social_signatures: DEFAULT_SOCIAL_SIGNATURES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            search_signatures: DEFAULT_SEARCH_SIGNATURES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Parse a comma-separated signature list, falling back to defaults.
fn env_signatures(key: &str, defaults: &[&str]) -> Vec<String> {
    match std::env::var(key) {
        Ok(raw) => {
            let parsed: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
            if parsed.is_empty() {
                defaults.iter().map(|s| s.to_string()).collect()
            } else {
                parsed
            }
        }
        Err(_) => defaults.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "PREVIEW_BIND_ADDR",
        "PREVIEW_BASE_URL",
        "PREVIEW_SITE_NAME",
        "PREVIEW_SHELL_URL",
        "PREVIEW_APP_DETAIL_PATH",
        "PREVIEW_RESIZE_PROXY_URL",
        "PREVIEW_FALLBACK_IMAGE_URL",
        "PREVIEW_ICON_URL",
        "PREVIEW_META_MARKER",
        "PREVIEW_SHELL_TIMEOUT_SECS",
        "PREVIEW_SHELL_CACHE_SECS",
        "PREVIEW_SOCIAL_BOTS",
        "PREVIEW_SEARCH_BOTS",
    ];

    /// Run a config test with isolated env vars.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:8082");
            assert_eq!(config.site_name, "Forecourt Motors");
            assert_eq!(config.meta_marker, "<!-- dynamic-meta -->");
            assert_eq!(config.shell_fetch_timeout, Duration::from_secs(5));
            assert!(config.social_signatures.contains(&"whatsapp".to_string()));
            assert!(config.search_signatures.contains(&"googlebot".to_string()));
        });
    }

    #[test]
    fn config_base_url_trailing_slash_stripped() {
        with_env_vars(&[("PREVIEW_BASE_URL", "https://cars.example.com/")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.base_url, "https://cars.example.com");
        });
    }

    #[test]
    fn config_signature_overrides_lowercased() {
        with_env_vars(&[("PREVIEW_SOCIAL_BOTS", "MyBot, OtherBot")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.social_signatures, ["mybot", "otherbot"]);
        });
    }

    #[test]
    fn config_blank_signature_override_keeps_defaults() {
        with_env_vars(&[("PREVIEW_SEARCH_BOTS", " , ,")], || {
            let config = Config::from_env().unwrap();
            assert!(config.search_signatures.contains(&"googlebot".to_string()));
        });
    }

    #[test]
    fn canonical_url_shape() {
        let config = Config::default();
        assert_eq!(
            config.canonical_url("kia-sportage-2020"),
            "http://localhost:8082/vehicles/detail?id=kia-sportage-2020"
        );
    }
}
