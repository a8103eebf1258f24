//! Core types and pure logic shared across the Forecourt services.
//!
//! This crate provides:
//! - The `Listing` record (the sole persisted entity) plus its draft and
//!   merge-patch companions
//! - Slug synthesis for new listing identifiers
//! - Display price formatting
//! - Image-reference classification and inline data-URL decoding
//! - Shared error types

mod error;
mod image;
mod listing;
mod price;
mod slug;

/// Maximum number of exterior gallery slots per listing.
pub const MAX_EXTERIOR_SLOTS: usize = 5;

/// Maximum number of interior gallery slots per listing.
pub const MAX_INTERIOR_SLOTS: usize = 9;

pub use error::{Error, Result};
pub use image::{InlineImage, classify_image_ref, decode_inline, extension_for_mime, ImageRefKind};
pub use listing::{ImageSlot, Listing, ListingDraft, ListingPatch};
pub use price::format_price;
pub use slug::listing_slug;
