//! The listing store: subscription fan-out and mutations.
//!
//! One `ListingStore` is constructed at application start from a backend
//! handle and passed by reference to consumers — there is no global
//! instance. Construction opens the backend watch subscription, which stays
//! open for the life of the store; every incoming snapshot is delivered to
//! every registered observer.
//!
//! Observers registered late receive no replay of earlier snapshots.
//! Callers that need current data immediately pair `subscribe` with
//! [`ListingStore::fetch_all`].

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;

use forecourt_core::{Listing, ListingDraft, ListingPatch, listing_slug};

use crate::backend::{ListingBackend, Snapshot};
use crate::error::StoreError;

type Observer = Arc<dyn Fn(&Snapshot) + Send + Sync>;

struct StoreInner {
    backend: Arc<dyn ListingBackend>,
    observers: Mutex<HashMap<u64, Observer>>,
    next_observer_id: AtomicU64,
}

impl StoreInner {
    /// Deliver one snapshot to every registered observer.
    ///
    /// Callbacks run outside the registry lock so an observer may
    /// subscribe or unsubscribe from within its own callback.
    fn dispatch(&self, snapshot: &Snapshot) {
        let observers: Vec<Observer> = self.observers.lock().values().cloned().collect();
        for observer in observers {
            observer(snapshot);
        }
    }
}

/// Single point of truth for listing data.
#[derive(Clone)]
pub struct ListingStore {
    inner: Arc<StoreInner>,
}

impl ListingStore {
    /// Construct the store and open its watch subscription.
    ///
    /// The subscription never closes for the lifetime of the store; the
    /// fan-out task exits when the store (and every clone) is dropped or
    /// the backend channel closes.
    pub fn connect(backend: Arc<dyn ListingBackend>) -> Self {
        let inner = Arc::new(StoreInner {
            backend: backend.clone(),
            observers: Mutex::new(HashMap::new()),
            next_observer_id: AtomicU64::new(0),
        });

        let weak = Arc::downgrade(&inner);
        let mut rx = backend.watch();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(snapshot) => {
                        let Some(inner) = weak.upgrade() else { break };
                        inner.dispatch(&snapshot);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Observers only ever need the latest state, so
                        // skipped intermediate snapshots are harmless.
                        tracing::warn!(skipped, "snapshot fan-out lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!("snapshot fan-out task stopped");
        });

        Self { inner }
    }

    /// Register an observer for future snapshots.
    ///
    /// Returns a guard; dropping it (or calling
    /// [`SubscriptionGuard::unsubscribe`]) stops delivery. The observer
    /// sees no replay — only snapshots emitted after registration.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionGuard
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let id = self.inner.next_observer_id.fetch_add(1, Ordering::Relaxed);
        self.inner.observers.lock().insert(id, Arc::new(callback));
        SubscriptionGuard {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// On-demand read of the full collection, in collection order.
    pub async fn fetch_all(&self) -> Result<Vec<Listing>, StoreError> {
        self.inner.backend.snapshot().await
    }

    /// On-demand read of a single listing.
    pub async fn fetch(&self, id: &str) -> Result<Option<Listing>, StoreError> {
        self.inner.backend.get(id).await
    }

    /// Create a listing from a draft, synthesizing its slug from brand,
    /// model, and the current time.
    pub async fn create(&self, draft: ListingDraft) -> Result<Listing, StoreError> {
        if draft.brand.trim().is_empty() {
            return Err(StoreError::Validation("brand is required".to_string()));
        }
        if draft.model.trim().is_empty() {
            return Err(StoreError::Validation("model is required".to_string()));
        }

        let id = listing_slug(
            &draft.brand,
            &draft.model,
            chrono::Utc::now().timestamp_millis(),
        );
        let listing = draft.into_listing(id);
        self.inner.backend.insert(listing.clone()).await?;
        tracing::info!(id = %listing.id, "listing created");
        Ok(listing)
    }

    /// Merge a partial payload into an existing listing.
    pub async fn update(&self, id: &str, patch: &ListingPatch) -> Result<(), StoreError> {
        self.inner.backend.merge(id, patch).await?;
        tracing::info!(id = %id, "listing updated");
        Ok(())
    }

    /// Delete a listing.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.backend.remove(id).await?;
        tracing::info!(id = %id, "listing deleted");
        Ok(())
    }

    /// Persist a new collection order.
    ///
    /// `ids` is the full desired sequence and must be a permutation of the
    /// current collection. Reordering to the current order is a no-op on
    /// persisted positions.
    pub async fn reorder(&self, ids: &[String]) -> Result<(), StoreError> {
        self.inner.backend.set_order(ids).await?;
        tracing::info!(count = ids.len(), "listing order rewritten");
        Ok(())
    }

    /// Handle to the underlying backend (read paths in other services).
    pub fn backend(&self) -> Arc<dyn ListingBackend> {
        self.inner.backend.clone()
    }
}

/// Capability to cancel an observer registration.
///
/// Dropping the guard unregisters the observer.
pub struct SubscriptionGuard {
    inner: std::sync::Weak<StoreInner>,
    id: u64,
}

impl SubscriptionGuard {
    /// Explicitly unregister (equivalent to dropping the guard).
    pub fn unsubscribe(self) {}
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.observers.lock().remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn draft(brand: &str, model: &str) -> ListingDraft {
        ListingDraft {
            brand: brand.to_string(),
            model: model.to_string(),
            ..Default::default()
        }
    }

    fn store() -> ListingStore {
        ListingStore::connect(Arc::new(MemoryBackend::new()))
    }

    /// Subscribe with a channel-backed observer for deterministic awaiting.
    fn channel_observer(
        store: &ListingStore,
    ) -> (SubscriptionGuard, mpsc::UnboundedReceiver<Vec<String>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let guard = store.subscribe(move |snapshot| {
            let ids = snapshot.listings().iter().map(|l| l.id.clone()).collect();
            let _ = tx.send(ids);
        });
        (guard, rx)
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<Vec<String>>) -> Vec<String> {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("observer should have been notified")
            .expect("observer channel open")
    }

    #[tokio::test]
    async fn create_synthesizes_slug() {
        let store = store();
        let listing = store.create(draft("Kia", "Sportage")).await.unwrap();

        let (prefix, digits) = listing.id.rsplit_once('-').unwrap();
        assert_eq!(prefix, "kia-sportage");
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        assert!(!digits.is_empty());
    }

    #[tokio::test]
    async fn create_requires_brand_and_model() {
        let store = store();
        assert!(matches!(
            store.create(draft("", "Sportage")).await.unwrap_err(),
            StoreError::Validation(_)
        ));
        assert!(matches!(
            store.create(draft("Kia", "  ")).await.unwrap_err(),
            StoreError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn update_leaves_absent_fields_unchanged() {
        let store = store();
        let mut d = draft("Kia", "Sportage");
        d.price = "24.200€".to_string();
        d.fuel = "Hybrid".to_string();
        let created = store.create(d).await.unwrap();

        let patch = ListingPatch {
            price: Some("22.900€".to_string()),
            ..Default::default()
        };
        store.update(&created.id, &patch).await.unwrap();

        let after = store.fetch(&created.id).await.unwrap().unwrap();
        assert_eq!(after.price, "22.900€");
        assert_eq!(after.brand, "Kia");
        assert_eq!(after.model, "Sportage");
        assert_eq!(after.fuel, "Hybrid");
    }

    #[tokio::test]
    async fn reorder_to_current_order_is_stable() {
        let store = store();
        let a = store.create(draft("Audi", "A3")).await.unwrap();
        let b = store.create(draft("BMW", "320d")).await.unwrap();
        let c = store.create(draft("Cupra", "Leon")).await.unwrap();

        let current: Vec<String> = vec![a.id.clone(), b.id.clone(), c.id.clone()];
        store.reorder(&current).await.unwrap();

        let after: Vec<String> = store
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(after, current);
    }

    #[tokio::test]
    async fn reorder_moves_listing() {
        let store = store();
        let a = store.create(draft("Audi", "A3")).await.unwrap();
        let b = store.create(draft("BMW", "320d")).await.unwrap();

        store.reorder(&[b.id.clone(), a.id.clone()]).await.unwrap();

        let after: Vec<String> = store
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(after, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn observers_receive_every_snapshot() {
        let store = store();
        let (_guard, mut rx) = channel_observer(&store);

        let a = store.create(draft("Audi", "A3")).await.unwrap();
        assert_eq!(recv(&mut rx).await, vec![a.id.clone()]);

        store.delete(&a.id).await.unwrap();
        assert!(recv(&mut rx).await.is_empty());
    }

    #[tokio::test]
    async fn multiple_observers_each_receive_snapshots() {
        let store = store();
        let (_g1, mut rx1) = channel_observer(&store);
        let (_g2, mut rx2) = channel_observer(&store);

        let a = store.create(draft("Audi", "A3")).await.unwrap();
        assert_eq!(recv(&mut rx1).await, vec![a.id.clone()]);
        assert_eq!(recv(&mut rx2).await, vec![a.id.clone()]);
    }

    #[tokio::test]
    async fn late_subscriber_gets_no_replay() {
        let store = store();
        let a = store.create(draft("Audi", "A3")).await.unwrap();

        // Wait until an already-registered observer has seen the full
        // two-listing state, so every earlier snapshot has cleared the
        // fan-out task and a later delivery would be a genuine replay.
        let (_settled, mut settle_rx) = channel_observer(&store);
        let b = store.create(draft("BMW", "320d")).await.unwrap();
        loop {
            if recv(&mut settle_rx).await.len() == 2 {
                break;
            }
        }

        let (_guard, mut rx) = channel_observer(&store);
        assert!(rx.try_recv().is_err(), "late subscriber must not replay");

        // Future snapshots still arrive.
        store.delete(&b.id).await.unwrap();
        assert_eq!(recv(&mut rx).await, vec![a.id]);
    }

    #[tokio::test]
    async fn dropped_guard_stops_delivery() {
        let store = store();
        let (kept_guard, mut kept_rx) = channel_observer(&store);
        let (dropped_guard, mut dropped_rx) = channel_observer(&store);
        drop(dropped_guard);

        store.create(draft("Audi", "A3")).await.unwrap();

        // The kept observer proves the snapshot was fanned out...
        recv(&mut kept_rx).await;
        // ...and the unsubscribed one saw nothing.
        assert!(dropped_rx.try_recv().is_err());
        drop(kept_guard);
    }

    #[tokio::test]
    async fn unsubscribe_method_stops_delivery() {
        let store = store();
        let (kept_guard, mut kept_rx) = channel_observer(&store);
        let (guard, mut rx) = channel_observer(&store);
        guard.unsubscribe();

        store.create(draft("Audi", "A3")).await.unwrap();
        recv(&mut kept_rx).await;
        assert!(rx.try_recv().is_err());
        drop(kept_guard);
    }

    #[tokio::test]
    async fn mutation_failures_propagate_once() {
        let store = store();
        let err = store
            .update("ghost", &ListingPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = store.delete("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
