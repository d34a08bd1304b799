//! Marker store trait.
//!
//! The remote store owns marker identity: it assigns identifiers on create,
//! and a marker without one cannot be deleted.

use crate::error::{MarkerStoreError, Result};
use crate::types::{Marker, MarkerId, NewMarker};

/// One delete that failed during a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDelete {
    /// Marker that is still stored.
    pub id: MarkerId,
    /// Why the delete failed.
    pub error: MarkerStoreError,
}

/// Outcome of [`MarkerStore::delete_many`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDeleteReport {
    /// Identifiers deleted, in request order.
    pub deleted: Vec<MarkerId>,
    /// Deletes that failed, in request order.
    pub failed: Vec<FailedDelete>,
}

impl BatchDeleteReport {
    /// Whether every requested delete succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of deletes attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    /// Whether the delete of `id` failed.
    #[must_use]
    pub fn has_failed(&self, id: &MarkerId) -> bool {
        self.failed.iter().any(|failure| &failure.id == id)
    }
}

/// Remote marker collection.
///
/// # Implementation Notes
///
/// - `list_all` returns every stored marker; the order is the store's own
/// - `create` assigns a fresh identifier and returns it
/// - `delete_many` must keep going after a failed delete
pub trait MarkerStore: Send + Sync {
    /// Fetch all stored markers.
    ///
    /// # Errors
    ///
    /// Returns error if the store is unreachable or a record is malformed.
    fn list_all(&self) -> impl std::future::Future<Output = Result<Vec<Marker>>> + Send;

    /// Persist a new marker.
    ///
    /// # Errors
    ///
    /// Returns error if the store is unreachable or rejects the record.
    fn create(
        &self,
        marker: &NewMarker,
    ) -> impl std::future::Future<Output = Result<MarkerId>> + Send;

    /// Delete one marker.
    ///
    /// # Errors
    ///
    /// Returns error if the store is unreachable or rejects the delete.
    fn delete_by_id(&self, id: &MarkerId) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Delete several markers, one after the other.
    ///
    /// Each delete is awaited before the next is issued. A failure is
    /// recorded and the batch continues. A marker the store no longer holds
    /// counts as deleted.
    fn delete_many(
        &self,
        ids: Vec<MarkerId>,
    ) -> impl std::future::Future<Output = BatchDeleteReport> + Send {
        async move {
            let mut report = BatchDeleteReport::default();
            for id in ids {
                match self.delete_by_id(&id).await {
                    Ok(()) | Err(MarkerStoreError::NotFound(_)) => report.deleted.push(id),
                    Err(error) => {
                        tracing::warn!(marker_id = %id, error = %error, "Marker delete failed");
                        report.failed.push(FailedDelete { id, error });
                    },
                }
            }
            report
        }
    }
}
