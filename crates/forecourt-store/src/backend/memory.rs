//! In-memory listing collection.
//!
//! Used for tests and local development. Documents and their positions live
//! behind one mutex, so mutations are naturally serialized; every committed
//! mutation emits a full snapshot through the watch channel.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use forecourt_core::{Listing, ListingPatch};

use super::{ListingBackend, Snapshot};
use crate::error::StoreError;

/// Watch channel capacity. Snapshots are cheap (Arc'd), so the buffer only
/// needs to absorb a burst of admin mutations faster than observers drain.
const WATCH_CHANNEL_SIZE: usize = 64;

#[derive(Debug, Clone)]
struct Doc {
    listing: Listing,
    /// Explicit collection-order position, rewritten in full on reorder.
    position: u64,
    /// Insertion sequence, tie-breaker for equal positions.
    seq: u64,
}

#[derive(Default)]
struct Inner {
    docs: HashMap<String, Doc>,
    flags: HashSet<String>,
    next_seq: u64,
}

impl Inner {
    fn ordered(&self) -> Vec<Listing> {
        let mut docs: Vec<&Doc> = self.docs.values().collect();
        docs.sort_by_key(|d| (d.position, d.seq));
        docs.iter().map(|d| d.listing.clone()).collect()
    }

    fn next_position(&self) -> u64 {
        self.docs
            .values()
            .map(|d| d.position)
            .max()
            .map_or(0, |p| p + 1)
    }
}

/// In-memory [`ListingBackend`].
pub struct MemoryBackend {
    inner: Mutex<Inner>,
    tx: broadcast::Sender<Snapshot>,
}

impl MemoryBackend {
    /// Create an empty in-memory collection.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(WATCH_CHANNEL_SIZE);
        Self {
            inner: Mutex::new(Inner::default()),
            tx,
        }
    }

    /// Emit a snapshot of the current collection to all watchers.
    ///
    /// A send error only means nobody is watching.
    fn publish(&self, snapshot: Snapshot) {
        let _ = self.tx.send(snapshot);
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingBackend for MemoryBackend {
    async fn snapshot(&self) -> Result<Vec<Listing>, StoreError> {
        Ok(self.inner.lock().ordered())
    }

    async fn get(&self, id: &str) -> Result<Option<Listing>, StoreError> {
        Ok(self.inner.lock().docs.get(id).map(|d| d.listing.clone()))
    }

    async fn insert(&self, listing: Listing) -> Result<(), StoreError> {
        let snapshot = {
            let mut inner = self.inner.lock();
            if inner.docs.contains_key(&listing.id) {
                return Err(StoreError::Validation(format!(
                    "listing '{}' already exists",
                    listing.id
                )));
            }
            let position = inner.next_position();
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.docs.insert(
                listing.id.clone(),
                Doc {
                    listing,
                    position,
                    seq,
                },
            );
            Snapshot::new(inner.ordered())
        };
        self.publish(snapshot);
        Ok(())
    }

    async fn merge(&self, id: &str, patch: &ListingPatch) -> Result<(), StoreError> {
        let snapshot = {
            let mut inner = self.inner.lock();
            let doc = inner
                .docs
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            patch.apply(&mut doc.listing);
            // The id is the document key; a patch can never move a document.
            doc.listing.id = id.to_string();
            Snapshot::new(inner.ordered())
        };
        self.publish(snapshot);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let snapshot = {
            let mut inner = self.inner.lock();
            if inner.docs.remove(id).is_none() {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Snapshot::new(inner.ordered())
        };
        self.publish(snapshot);
        Ok(())
    }

    async fn set_order(&self, ids: &[String]) -> Result<(), StoreError> {
        let snapshot = {
            let mut inner = self.inner.lock();

            if ids.len() != inner.docs.len() {
                return Err(StoreError::Validation(format!(
                    "order must list all {} listings, got {}",
                    inner.docs.len(),
                    ids.len()
                )));
            }
            let unique: HashSet<&str> = ids.iter().map(String::as_str).collect();
            if unique.len() != ids.len() {
                return Err(StoreError::Validation(
                    "order contains duplicate ids".to_string(),
                ));
            }
            if let Some(unknown) = ids.iter().find(|id| !inner.docs.contains_key(*id)) {
                return Err(StoreError::Validation(format!(
                    "order references unknown listing '{unknown}'"
                )));
            }

            for (position, id) in ids.iter().enumerate() {
                if let Some(doc) = inner.docs.get_mut(id) {
                    doc.position = position as u64;
                }
            }
            Snapshot::new(inner.ordered())
        };
        self.publish(snapshot);
        Ok(())
    }

    async fn get_flag(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.inner.lock().flags.contains(key))
    }

    async fn set_flag(&self, key: &str) -> Result<(), StoreError> {
        self.inner.lock().flags.insert(key.to_string());
        Ok(())
    }

    fn watch(&self) -> broadcast::Receiver<Snapshot> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str, brand: &str, model: &str) -> Listing {
        Listing {
            id: id.to_string(),
            brand: brand.to_string(),
            model: model.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn snapshot_preserves_insertion_order() {
        let backend = MemoryBackend::new();
        backend.insert(listing("a", "Audi", "A3")).await.unwrap();
        backend.insert(listing("b", "BMW", "320d")).await.unwrap();
        backend.insert(listing("c", "Cupra", "Leon")).await.unwrap();

        let ids: Vec<String> = backend
            .snapshot()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn insert_duplicate_id_rejected() {
        let backend = MemoryBackend::new();
        backend.insert(listing("a", "Audi", "A3")).await.unwrap();
        let err = backend.insert(listing("a", "Audi", "A4")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn merge_patches_fields() {
        let backend = MemoryBackend::new();
        backend.insert(listing("a", "Audi", "A3")).await.unwrap();

        let patch = ListingPatch {
            price: Some("19.900€".to_string()),
            ..Default::default()
        };
        backend.merge("a", &patch).await.unwrap();

        let doc = backend.get("a").await.unwrap().unwrap();
        assert_eq!(doc.price, "19.900€");
        assert_eq!(doc.brand, "Audi");
    }

    #[tokio::test]
    async fn merge_missing_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend
            .merge("ghost", &ListingPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn remove_then_get_is_none() {
        let backend = MemoryBackend::new();
        backend.insert(listing("a", "Audi", "A3")).await.unwrap();
        backend.remove("a").await.unwrap();
        assert!(backend.get("a").await.unwrap().is_none());
        assert!(matches!(
            backend.remove("a").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn set_order_rewrites_positions() {
        let backend = MemoryBackend::new();
        backend.insert(listing("a", "Audi", "A3")).await.unwrap();
        backend.insert(listing("b", "BMW", "320d")).await.unwrap();
        backend.insert(listing("c", "Cupra", "Leon")).await.unwrap();

        let order: Vec<String> = ["c", "a", "b"].iter().map(|s| s.to_string()).collect();
        backend.set_order(&order).await.unwrap();

        let ids: Vec<String> = backend
            .snapshot()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[tokio::test]
    async fn insert_after_reorder_appends_at_end() {
        let backend = MemoryBackend::new();
        backend.insert(listing("a", "Audi", "A3")).await.unwrap();
        backend.insert(listing("b", "BMW", "320d")).await.unwrap();
        let order: Vec<String> = ["b", "a"].iter().map(|s| s.to_string()).collect();
        backend.set_order(&order).await.unwrap();

        backend.insert(listing("c", "Cupra", "Leon")).await.unwrap();
        let ids: Vec<String> = backend
            .snapshot()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn set_order_rejects_non_permutation() {
        let backend = MemoryBackend::new();
        backend.insert(listing("a", "Audi", "A3")).await.unwrap();
        backend.insert(listing("b", "BMW", "320d")).await.unwrap();

        // wrong length
        let err = backend
            .set_order(&["a".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // duplicate
        let err = backend
            .set_order(&["a".to_string(), "a".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // unknown id
        let err = backend
            .set_order(&["a".to_string(), "ghost".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // nothing changed
        let ids: Vec<String> = backend
            .snapshot()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn flags_round_trip() {
        let backend = MemoryBackend::new();
        assert!(!backend.get_flag("seeded").await.unwrap());
        backend.set_flag("seeded").await.unwrap();
        assert!(backend.get_flag("seeded").await.unwrap());
    }

    #[tokio::test]
    async fn watch_receives_mutation_snapshots() {
        let backend = MemoryBackend::new();
        let mut rx = backend.watch();

        backend.insert(listing("a", "Audi", "A3")).await.unwrap();
        let snap = rx.recv().await.unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.listings()[0].id, "a");

        backend.remove("a").await.unwrap();
        let snap = rx.recv().await.unwrap();
        assert!(snap.is_empty());
    }

    #[tokio::test]
    async fn watch_has_no_replay() {
        let backend = MemoryBackend::new();
        backend.insert(listing("a", "Audi", "A3")).await.unwrap();

        // Subscribing after the mutation sees nothing until the next one.
        let mut rx = backend.watch();
        backend.insert(listing("b", "BMW", "320d")).await.unwrap();
        let snap = rx.recv().await.unwrap();
        assert_eq!(snap.len(), 2);
        assert!(rx.try_recv().is_err());
    }
}
