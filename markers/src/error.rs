//! Error types for marker persistence.

use crate::types::MarkerId;
use thiserror::Error;

/// Result type for marker store operations.
pub type Result<T> = std::result::Result<T, MarkerStoreError>;

/// Errors reported by a [`MarkerStore`](crate::providers::MarkerStore).
///
/// Errors travel inside actions, so they are `Clone` and comparable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerStoreError {
    /// The store could not be reached, or asked us to back off.
    #[error("Marker store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the request.
    #[error("Marker store request failed (status {status}): {message}")]
    Request {
        /// Status code returned by the store.
        status: u16,
        /// Message returned by the store.
        message: String,
    },

    /// No record with this identifier.
    #[error("Marker {0} not found")]
    NotFound(MarkerId),

    /// A stored record could not be read as a marker.
    #[error("Invalid marker record: {0}")]
    InvalidRecord(String),
}

impl MarkerStoreError {
    /// Whether retrying the same request later could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
