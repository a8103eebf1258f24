//! Forecourt Preview - the rendering dispatcher for the vehicle detail page.
//!
//! This crate serves the one route real browsers, social-preview bots, and
//! search crawlers all hit: `GET /vehicles/detail?id=<listing>`. The
//! dispatcher classifies the requesting agent and returns one of three
//! response shapes:
//!
//! - **Social-preview bot with a listing id** - a minimal, self-contained
//!   HTML document carrying Open Graph / Twitter-card tags (no app shell,
//!   no JavaScript needed by the bot)
//! - **Search-indexing bot** - the proxied app shell with listing-specific
//!   meta tags spliced in between a marker comment and the next closing
//!   script tag
//! - **Everything else** - the proxied app shell untouched
//!
//! The endpoint's prime directive is to never leave a broken page in front
//! of a real visitor: any upstream failure degrades to a script-based
//! client redirect, and only an unresolvable listing id under bot
//! classification produces a hard 404.
//!
//! All responses carry `Cache-Control: private, no-cache, no-store,
//! must-revalidate` — this HTML is always request-specific.

pub mod agent;
pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod shell;
pub mod state;

pub use agent::{AgentClass, BotSignatures};
pub use config::Config;
pub use error::PreviewError;
pub use routes::router;
pub use state::AppState;
