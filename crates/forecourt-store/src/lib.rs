//! Reactive listing store for Forecourt.
//!
//! This crate is the single point of truth for listing data:
//!
//! - [`ListingBackend`] - the document-collection abstraction (trait), with
//!   an in-memory implementation that emits real-time snapshots
//! - [`ListingStore`] - the store proper: one never-closed watch
//!   subscription, in-process fan-out to registered observers, and the
//!   create/update/delete/reorder operations
//! - [`MediaStorage`] - object storage for listing images, with upload
//!   pathing and the resize-proxy URL builder
//! - one-time seeding of default listings behind a persisted flag
//!
//! # Architecture
//!
//! ```text
//! [ListingBackend] --watch--> [ListingStore] --fan-out--> observers
//!        ^                          |
//!        └──── create/update/delete/reorder
//! ```
//!
//! Consistency is document-level last-write-wins: mutations are serialized
//! by the backend, but there is no optimistic-concurrency check. Two admin
//! sessions editing the same listing race, and the later write wins.

pub mod backend;
mod error;
mod media;
mod seed;
mod store;

pub use backend::{ListingBackend, MemoryBackend, Snapshot};
pub use error::StoreError;
pub use media::{
    MediaPurpose, MediaStorage, MemoryMediaStorage, media_key, resize_url, resolve_image_ref,
};
pub use seed::{SEED_FLAG, default_listings, ensure_seeded};
pub use store::{ListingStore, SubscriptionGuard};
