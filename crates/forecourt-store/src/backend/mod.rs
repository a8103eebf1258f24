//! Document-collection backends.
//!
//! A backend is the remote (or in-memory) collection of listing documents.
//! It owns collection order — an explicit numeric position per document,
//! rewritten in full on reorder — and pushes a complete [`Snapshot`] of the
//! collection through its watch channel after every mutation.
//!
//! All backends must serialize mutations: two concurrent reorders must not
//! interleave. Within one watch subscription, snapshots arrive in the order
//! the backend emitted them; consumers should assume eventual convergence,
//! not cross-writer monotonicity.

mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use forecourt_core::{Listing, ListingPatch};

use crate::error::StoreError;

pub use memory::MemoryBackend;

/// A full materialized view of the listings collection, in collection
/// order, pushed by the real-time watch subscription.
#[derive(Debug, Clone)]
pub struct Snapshot {
    listings: Arc<Vec<Listing>>,
}

impl Snapshot {
    /// Build a snapshot from an ordered sequence of listings.
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings: Arc::new(listings),
        }
    }

    /// The listings, in collection order.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Number of listings in the snapshot.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// The document collection holding listings.
///
/// Implementations decide where documents live (managed document database,
/// memory, ...) but share the contract: slug-keyed documents, explicit
/// collection order, merge-style partial updates, and a broadcast watch
/// channel that carries a fresh snapshot after every committed mutation.
#[async_trait]
pub trait ListingBackend: Send + Sync {
    /// Read the full collection, in collection order.
    async fn snapshot(&self) -> Result<Vec<Listing>, StoreError>;

    /// Read a single document by id.
    async fn get(&self, id: &str) -> Result<Option<Listing>, StoreError>;

    /// Insert a new document at the end of the collection order.
    ///
    /// Fails with [`StoreError::Validation`] if the id is already taken.
    async fn insert(&self, listing: Listing) -> Result<(), StoreError>;

    /// Merge a partial payload into an existing document.
    ///
    /// Fields absent from the patch are untouched. Fails with
    /// [`StoreError::NotFound`] if the document does not exist.
    async fn merge(&self, id: &str, patch: &ListingPatch) -> Result<(), StoreError>;

    /// Remove a document.
    ///
    /// Fails with [`StoreError::NotFound`] if the document does not exist.
    async fn remove(&self, id: &str) -> Result<(), StoreError>;

    /// Rewrite the collection order to match `ids` exactly.
    ///
    /// `ids` must be a permutation of the current document ids; anything
    /// else fails with [`StoreError::Validation`] and changes nothing.
    async fn set_order(&self, ids: &[String]) -> Result<(), StoreError>;

    /// Read a named idempotency flag (used by one-time seeding).
    async fn get_flag(&self, key: &str) -> Result<bool, StoreError>;

    /// Set a named idempotency flag.
    async fn set_flag(&self, key: &str) -> Result<(), StoreError>;

    /// Open a watch subscription.
    ///
    /// The receiver sees every snapshot emitted after this call — there is
    /// no replay of earlier snapshots.
    fn watch(&self) -> broadcast::Receiver<Snapshot>;
}
