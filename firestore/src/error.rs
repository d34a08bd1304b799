//! Error types for the Firestore adapter

use thiserror::Error;
use waymark_markers::{MarkerId, MarkerStoreError};

/// Errors that can occur when talking to Firestore
#[derive(Debug, Error)]
pub enum FirestoreError {
    /// Missing `FIRESTORE_PROJECT_ID` environment variable
    #[error("Missing FIRESTORE_PROJECT_ID environment variable")]
    MissingProjectId,

    /// A configuration value could not be parsed
    #[error("Invalid configuration for {key}: {message}")]
    InvalidConfig {
        /// Offending variable
        key: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be parsed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Rate limited - too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Document does not exist
    #[error("Document {0} not found")]
    NotFound(MarkerId),

    /// API returned an error
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// A document is missing a field or holds an unusable value
    #[error("Invalid document {name}: {reason}")]
    InvalidDocument {
        /// Document resource name
        name: String,
        /// What was wrong with it
        reason: String,
    },
}

impl From<FirestoreError> for MarkerStoreError {
    fn from(error: FirestoreError) -> Self {
        match error {
            FirestoreError::NotFound(id) => Self::NotFound(id),
            FirestoreError::ApiError { status, message } if status >= 500 => {
                Self::Unavailable(format!("status {status}: {message}"))
            },
            FirestoreError::ApiError { status, message } => Self::Request { status, message },
            FirestoreError::ResponseParseFailed(_) | FirestoreError::InvalidDocument { .. } => {
                Self::InvalidRecord(error.to_string())
            },
            FirestoreError::RateLimited
            | FirestoreError::RequestFailed(_)
            | FirestoreError::ClientBuild(_)
            | FirestoreError::MissingProjectId
            | FirestoreError::InvalidConfig { .. } => Self::Unavailable(error.to_string()),
        }
    }
}
