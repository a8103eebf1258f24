//! Forecourt Serve - the admin JSON API over the listing store.
//!
//! Exposes the operations the admin panel performs: list, create, update,
//! delete, reorder, and image upload. All mutating routes are bearer-token
//! protected. Mutation failures are surfaced to the caller as JSON error
//! bodies and are never retried server-side.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, Config};
