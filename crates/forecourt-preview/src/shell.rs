//! App-shell proxying: fetch, meta-tag injection, redirect fallback.
//!
//! The full-page path proxies the canonical single-page-app shell from its
//! hosting origin. Fetch failures of any kind degrade to a minimal
//! document that performs a client-side redirect to the app route — the
//! visitor must never see a broken page because our proxy hop failed.
//!
//! For search crawlers, listing-specific meta tags are spliced into the
//! shell between a known HTML comment marker and the next closing script
//! tag. If the marker pair is absent the shell passes through
//! byte-identical.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::state::AppState;

/// Closing tag bounding the replaceable meta block.
const SCRIPT_CLOSE: &str = "</script>";

/// A failed shell fetch.
#[derive(Debug, thiserror::Error)]
pub enum ShellFetchError {
    /// The origin answered with a non-2xx status.
    #[error("shell origin returned status {0}")]
    Status(u16),

    /// Transport-level failure (connect, TLS, timeout...).
    #[error("shell fetch failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Fetch the app-shell HTML, reusing a recent successful fetch.
///
/// Only successful fetches are cached; failures are always retried on the
/// next request.
pub async fn fetch_shell(state: &AppState) -> Result<String, ShellFetchError> {
    let url = &state.config.shell_url;

    if let Some(cached) = state.shell_cache.get(url).await {
        tracing::debug!("shell cache hit");
        return Ok(cached);
    }

    let response = state.http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ShellFetchError::Status(status.as_u16()));
    }
    let html = response.text().await?;

    state.shell_cache.insert(url.clone(), html.clone()).await;
    tracing::debug!(bytes = html.len(), "shell fetched and cached");
    Ok(html)
}

/// Splice `replacement` into `shell` between the marker comment and the
/// next closing script tag.
///
/// Everything between the end of the marker and the start of the closing
/// tag is replaced. If either bound is missing, the shell is returned
/// unchanged.
pub fn inject_meta(shell: &str, marker: &str, replacement: &str) -> String {
    let Some(marker_start) = shell.find(marker) else {
        return shell.to_string();
    };
    let marker_end = marker_start + marker.len();

    let Some(close_offset) = shell[marker_end..].find(SCRIPT_CLOSE) else {
        return shell.to_string();
    };
    let close_start = marker_end + close_offset;

    let mut out = String::with_capacity(shell.len() + replacement.len());
    out.push_str(&shell[..marker_end]);
    out.push('\n');
    out.push_str(replacement);
    out.push('\n');
    out.push_str(&shell[close_start..]);
    out
}

/// Minimal document that sends a real browser to the app route.
///
/// Served when the shell origin is unreachable (and as the body of the bot
/// card's just-in-case redirect). The listing id query parameter is
/// preserved when present.
pub fn redirect_document(site_name: &str, app_detail_path: &str, listing_id: Option<&str>) -> Markup {
    let target = redirect_target(app_detail_path, listing_id);
    // JSON-encode the target so it is a valid, escaped JS string literal.
    let script = format!(
        "window.location.href={};",
        serde_json::to_string(&target).unwrap_or_else(|_| "\"/\"".to_string())
    );

    html! {
        (DOCTYPE)
        html {
            head {
                title { (site_name) }
            }
            body {
                script { (PreEscaped(script)) }
            }
        }
    }
}

/// App route with the listing id preserved.
pub fn redirect_target(app_detail_path: &str, listing_id: Option<&str>) -> String {
    match listing_id {
        Some(id) => format!("{app_detail_path}?id={id}"),
        None => format!("{app_detail_path}?id="),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "<!-- dynamic-meta -->";

    fn shell_with_marker() -> String {
        format!(
            "<!DOCTYPE html><html><head>\n\
             {MARKER}\n\
             <title>Placeholder</title>\n\
             <script>window.__meta = {{}};</script>\n\
             <script src=\"/app.js\"></script>\n\
             </head><body></body></html>"
        )
    }

    // -- injection --

    #[test]
    fn inject_replaces_span_between_marker_and_script_close() {
        let shell = shell_with_marker();
        let out = inject_meta(&shell, MARKER, "<title>Kia Sportage</title>");

        assert!(out.contains("<title>Kia Sportage</title>"));
        // The placeholder block between marker and the first closing script
        // tag is gone, scripts after it survive.
        assert!(!out.contains("Placeholder"));
        assert!(!out.contains("window.__meta"));
        assert!(out.contains("<script src=\"/app.js\"></script>"));
        assert!(out.contains(MARKER));
    }

    #[test]
    fn inject_missing_marker_is_byte_identical() {
        let shell = "<!DOCTYPE html><html><head><script></script></head></html>";
        let out = inject_meta(shell, MARKER, "<title>ignored</title>");
        assert_eq!(out, shell);
    }

    #[test]
    fn inject_marker_without_script_close_is_byte_identical() {
        let shell = format!("<!DOCTYPE html><html><head>{MARKER}</head></html>");
        let out = inject_meta(&shell, MARKER, "<title>ignored</title>");
        assert_eq!(out, shell);
    }

    #[test]
    fn inject_empty_shell_is_byte_identical() {
        assert_eq!(inject_meta("", MARKER, "<meta>"), "");
    }

    #[test]
    fn inject_uses_first_marker_occurrence() {
        let shell = format!(
            "<head>{MARKER}<script>a</script>{MARKER}<script>b</script></head>"
        );
        let out = inject_meta(&shell, MARKER, "<meta name=\"x\">");
        // First block replaced, second untouched.
        assert!(!out.contains("<script>a"));
        assert!(out.contains("<script>b</script>"));
    }

    // -- redirect fallback --

    #[test]
    fn redirect_document_preserves_id() {
        let markup = redirect_document("Forecourt Motors", "/vehicles/detail-app.html", Some("kia-sportage-2020"));
        let html = markup.into_string();
        assert!(html.contains("window.location.href"));
        assert!(html.contains("/vehicles/detail-app.html?id=kia-sportage-2020"));
    }

    #[test]
    fn redirect_document_without_id() {
        let markup = redirect_document("Forecourt Motors", "/vehicles/detail-app.html", None);
        let html = markup.into_string();
        assert!(html.contains("/vehicles/detail-app.html?id="));
    }

    #[test]
    fn redirect_target_shape() {
        assert_eq!(
            redirect_target("/vehicles/detail-app.html", Some("abc")),
            "/vehicles/detail-app.html?id=abc"
        );
        assert_eq!(
            redirect_target("/vehicles/detail-app.html", None),
            "/vehicles/detail-app.html?id="
        );
    }
}
