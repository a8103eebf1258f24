//! The detail-page dispatcher.
//!
//! Handles `GET /vehicles/detail?id=<listing>`:
//!
//! 1. Classify the requesting agent from the User-Agent header
//! 2. A social-preview bot with a listing id gets the lightweight card
//!    (404 if the listing is unknown)
//! 3. Everyone else gets the proxied app shell; search crawlers with an id
//!    additionally get listing meta tags spliced in, best-effort
//! 4. Any shell-fetch failure degrades to a client-side redirect

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::agent::AgentClass;
use crate::error::{NO_STORE, PreviewError};
use crate::render;
use crate::shell;
use crate::state::AppState;

/// Query parameters for the detail route.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailQuery {
    /// Target listing identifier.
    pub id: Option<String>,
}

/// Dispatch a detail-page request by agent class.
pub async fn detail_handler(
    State(state): State<AppState>,
    Query(query): Query<DetailQuery>,
    headers: HeaderMap,
) -> Response {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());
    let agent = state.signatures.classify(user_agent);
    let listing_id = query
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    tracing::debug!(agent = ?agent, id = ?listing_id, "dispatching detail request");

    match (agent, listing_id) {
        (AgentClass::SocialBot, Some(id)) => bot_card(&state, id)
            .await
            .unwrap_or_else(IntoResponse::into_response),
        _ => full_page(&state, agent, listing_id).await,
    }
}

/// Lightweight path: the self-contained meta-tag card.
///
/// An unknown listing id is a hard 404 here — a preview card for a
/// fallback vehicle would be worse than no card.
async fn bot_card(state: &AppState, id: &str) -> Result<Response, PreviewError> {
    let listing = state
        .listings
        .get(id)
        .await
        .map_err(|e| PreviewError::Internal(anyhow::anyhow!(e)))?
        .ok_or_else(|| PreviewError::NotFound(id.to_string()))?;

    let html = render::listing_card(&listing, &state.config).into_string();
    tracing::info!(id = %id, "served bot card");
    Ok(html_response(html))
}

/// Full-page path: proxy the app shell, with best-effort tag injection for
/// search crawlers.
async fn full_page(state: &AppState, agent: AgentClass, listing_id: Option<&str>) -> Response {
    let shell_html = match shell::fetch_shell(state).await {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!(error = %err, "shell fetch failed, degrading to client redirect");
            let fallback = shell::redirect_document(
                &state.config.site_name,
                &state.config.app_detail_path,
                listing_id,
            );
            return html_response(fallback.into_string());
        }
    };

    let html = match (agent, listing_id) {
        (AgentClass::SearchBot, Some(id)) => inject_listing_tags(state, shell_html, id).await,
        _ => shell_html,
    };

    html_response(html)
}

/// Best-effort meta-tag injection: any failure serves the shell unmodified.
async fn inject_listing_tags(state: &AppState, shell_html: String, id: &str) -> String {
    match state.listings.get(id).await {
        Ok(Some(listing)) => {
            let tags = render::injected_meta_tags(&listing, &state.config);
            tracing::debug!(id = %id, "injecting listing meta tags");
            shell::inject_meta(&shell_html, &state.config.meta_marker, &tags)
        }
        Ok(None) => {
            tracing::debug!(id = %id, "listing unknown, serving shell unmodified");
            shell_html
        }
        Err(err) => {
            tracing::warn!(id = %id, error = %err, "listing fetch failed, serving shell unmodified");
            shell_html
        }
    }
}

/// A 200 HTML response with the dispatcher's no-store cache policy.
fn html_response(html: String) -> Response {
    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            ),
            (header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE)),
        ],
        html,
    )
        .into_response()
}
