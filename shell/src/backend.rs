//! Marker store selected at startup.

use crate::config::BackendConfig;
use waymark_firestore::{FirestoreError, FirestoreMarkerStore};
use waymark_markers::mocks::InMemoryMarkerStore;
use waymark_markers::{Marker, MarkerId, MarkerStore, NewMarker, Result};

/// Either of the supported marker stores.
#[derive(Clone, Debug)]
pub enum Backend {
    /// Process-local store.
    Memory(InMemoryMarkerStore),
    /// Firestore collection.
    Firestore(FirestoreMarkerStore),
}

impl Backend {
    /// Build the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `FirestoreError` if the HTTP client cannot be built.
    pub fn connect(config: &BackendConfig) -> std::result::Result<Self, FirestoreError> {
        match config {
            BackendConfig::Memory => Ok(Self::Memory(InMemoryMarkerStore::new())),
            BackendConfig::Firestore(firestore) => {
                Ok(Self::Firestore(FirestoreMarkerStore::new(firestore.clone())?))
            },
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Firestore(_) => "firestore",
        }
    }
}

impl MarkerStore for Backend {
    async fn list_all(&self) -> Result<Vec<Marker>> {
        match self {
            Self::Memory(store) => store.list_all().await,
            Self::Firestore(store) => store.list_all().await,
        }
    }

    async fn create(&self, marker: &NewMarker) -> Result<MarkerId> {
        match self {
            Self::Memory(store) => store.create(marker).await,
            Self::Firestore(store) => store.create(marker).await,
        }
    }

    async fn delete_by_id(&self, id: &MarkerId) -> Result<()> {
        match self {
            Self::Memory(store) => store.delete_by_id(id).await,
            Self::Firestore(store) => store.delete_by_id(id).await,
        }
    }
}
