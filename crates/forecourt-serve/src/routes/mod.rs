//! API route definitions.
//!
//! ## Public (no auth)
//! - `GET /health` - Health check
//!
//! ## Protected (auth required)
//! - `GET /api/v1/listings` - Full catalog, in collection order
//! - `POST /api/v1/listings` - Create a listing from a draft
//! - `GET /api/v1/listings/{id}` - One listing
//! - `PATCH /api/v1/listings/{id}` - Merge-patch a listing
//! - `DELETE /api/v1/listings/{id}` - Delete a listing
//! - `PUT /api/v1/listings/order` - Rewrite the collection order
//! - `POST /api/v1/media` - Upload an inline image, returns its URL

mod health;
mod listings;
mod media;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};

use crate::auth::require_auth;
use crate::state::AppState;

/// Build the complete API router.
pub fn router(state: AppState) -> Router {
    // Public routes (no authentication)
    let public = Router::new().route("/health", get(health::health_check));

    // Protected API routes
    let api_v1 = Router::new()
        .route(
            "/listings",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route("/listings/order", put(listings::reorder_listings))
        .route(
            "/listings/{id}",
            get(listings::get_listing)
                .patch(listings::update_listing)
                .delete(listings::delete_listing),
        )
        .route("/media", post(media::upload_media))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .nest("/api/v1", api_v1)
        .with_state(state)
}
