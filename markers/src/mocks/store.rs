//! In-memory marker store.

use crate::error::{MarkerStoreError, Result};
use crate::providers::MarkerStore;
use crate::types::{LatLng, Marker, MarkerId, NewMarker};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A call that reached the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    /// `list_all`
    List,
    /// `create` at a position
    Create(LatLng),
    /// `delete_by_id`
    Delete(MarkerId),
}

#[derive(Debug, Default)]
struct Inner {
    markers: Vec<Marker>,
    next_id: u64,
    calls: Vec<StoreCall>,
    list_failure: Option<MarkerStoreError>,
    create_failure: Option<MarkerStoreError>,
    delete_failure: Option<MarkerStoreError>,
    delete_failures_by_id: HashMap<MarkerId, MarkerStoreError>,
}

impl Inner {
    fn fresh_id(&mut self) -> MarkerId {
        loop {
            self.next_id += 1;
            let id = MarkerId::new(format!("m{}", self.next_id));
            if !self.markers.iter().any(|m| m.id.as_ref() == Some(&id)) {
                return id;
            }
        }
    }
}

/// In-memory marker store.
///
/// Identifiers are assigned as `m1`, `m2`, ... in creation order. Failures
/// can be injected per operation, or per identifier for deletes.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarkerStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryMarkerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `markers`.
    ///
    /// Markers without an identifier are given one.
    #[must_use]
    pub fn with_markers(markers: Vec<Marker>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for mut marker in markers {
                if marker.id.is_none() {
                    marker.id = Some(inner.fresh_id());
                }
                inner.markers.push(marker);
            }
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Markers currently stored (for testing).
    #[must_use]
    pub fn stored(&self) -> Vec<Marker> {
        self.lock().markers.clone()
    }

    /// Calls received so far, in order (for testing).
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Make `list_all` fail with `error`.
    pub fn fail_lists(&self, error: MarkerStoreError) {
        self.lock().list_failure = Some(error);
    }

    /// Make every `create` fail with `error`.
    pub fn fail_creates(&self, error: MarkerStoreError) {
        self.lock().create_failure = Some(error);
    }

    /// Make every `delete_by_id` fail with `error`.
    pub fn fail_deletes(&self, error: MarkerStoreError) {
        self.lock().delete_failure = Some(error);
    }

    /// Make deletes of `id` fail with `error`.
    pub fn fail_delete_of(&self, id: MarkerId, error: MarkerStoreError) {
        self.lock().delete_failures_by_id.insert(id, error);
    }

    /// Remove all injected failures.
    pub fn heal(&self) {
        let mut inner = self.lock();
        inner.list_failure = None;
        inner.create_failure = None;
        inner.delete_failure = None;
        inner.delete_failures_by_id.clear();
    }
}

impl MarkerStore for InMemoryMarkerStore {
    async fn list_all(&self) -> Result<Vec<Marker>> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::List);
        if let Some(error) = inner.list_failure.clone() {
            return Err(error);
        }
        Ok(inner.markers.clone())
    }

    async fn create(&self, marker: &NewMarker) -> Result<MarkerId> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Create(marker.position));
        if let Some(error) = inner.create_failure.clone() {
            return Err(error);
        }
        let id = inner.fresh_id();
        inner.markers.push(Marker::persisted(id.clone(), *marker));
        Ok(id)
    }

    async fn delete_by_id(&self, id: &MarkerId) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Delete(id.clone()));
        if let Some(error) = inner
            .delete_failures_by_id
            .get(id)
            .or(inner.delete_failure.as_ref())
            .cloned()
        {
            return Err(error);
        }
        // Deleting an unknown id succeeds, as it does remotely
        inner.markers.retain(|m| m.id.as_ref() != Some(id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_testing::test_epoch;

    fn new_marker(lat: f64) -> NewMarker {
        NewMarker {
            position: LatLng::from_raw(lat, 0.0),
            created_at: test_epoch(),
        }
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let store = InMemoryMarkerStore::new();
        assert_eq!(store.create(&new_marker(1.0)).await, Ok(MarkerId::new("m1")));
        assert_eq!(store.create(&new_marker(2.0)).await, Ok(MarkerId::new("m2")));
        assert_eq!(store.list_all().await.map(|m| m.len()), Ok(2));
    }

    #[tokio::test]
    async fn seeded_ids_are_not_reused() {
        let store = InMemoryMarkerStore::with_markers(vec![Marker::unsaved(LatLng::from_raw(
            0.0, 0.0,
        ))]);
        assert_eq!(store.create(&new_marker(1.0)).await, Ok(MarkerId::new("m2")));
    }

    #[tokio::test]
    async fn delete_many_continues_past_failures() {
        let store = InMemoryMarkerStore::new();
        for lat in [1.0, 2.0, 3.0] {
            store.create(&new_marker(lat)).await.unwrap();
        }
        let error = MarkerStoreError::Unavailable("flaky".into());
        store.fail_delete_of(MarkerId::new("m2"), error.clone());

        let report = store
            .delete_many(vec![MarkerId::new("m1"), MarkerId::new("m2"), MarkerId::new("m3")])
            .await;

        assert_eq!(report.deleted, vec![MarkerId::new("m1"), MarkerId::new("m3")]);
        assert!(report.has_failed(&MarkerId::new("m2")));
        assert_eq!(report.failed[0].error, error);
        assert_eq!(store.stored().len(), 1);
    }

    #[tokio::test]
    async fn heal_clears_injected_failures() {
        let store = InMemoryMarkerStore::new();
        store.fail_lists(MarkerStoreError::Unavailable("down".into()));
        assert!(store.list_all().await.is_err());

        store.heal();
        assert_eq!(store.list_all().await, Ok(vec![]));
        assert_eq!(store.calls(), vec![StoreCall::List, StoreCall::List]);
    }
}
