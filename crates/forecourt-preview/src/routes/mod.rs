//! Route definitions for the rendering dispatcher.
//!
//! ## Routes
//!
//! - `GET /vehicles/detail` - The dispatcher (agent-classified responses)
//! - `GET /health` - Health check (JSON)
//! - `GET /robots.txt` - Crawler instructions

mod detail;
mod health;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::state::AppState;

/// Build the complete dispatcher router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/vehicles/detail", get(detail::detail_handler))
        .route("/health", get(health::health_check))
        .route("/robots.txt", get(robots_txt))
        .with_state(state)
}

/// Serve robots.txt allowing all crawlers.
///
/// Crawlers must be able to fetch the detail route for link previews and
/// indexing.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nAllow: /\n",
    )
}
