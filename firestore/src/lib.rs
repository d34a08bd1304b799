//! Firestore REST adapter for the waymark marker store.
//!
//! [`FirestoreMarkerStore`] implements [`waymark_markers::MarkerStore`] over
//! the Firestore v1 REST API using `reqwest`:
//!
//! - `list_all` pages through the collection until no `nextPageToken` is left
//! - `create` POSTs a document with `lat`, `lng` and `timestamp` fields and
//!   returns the id the server assigned
//! - `delete_by_id` DELETEs the document
//!
//! # Example
//!
//! ```rust,no_run
//! use waymark_firestore::{FirestoreConfig, FirestoreMarkerStore};
//! use waymark_markers::MarkerStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FirestoreMarkerStore::new(
//!     FirestoreConfig::new("my-project").with_api_key("AIza..."),
//! )?;
//! let markers = store.list_all().await?;
//! println!("{} markers", markers.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod document;
pub mod error;

pub use client::FirestoreMarkerStore;
pub use config::FirestoreConfig;
pub use error::FirestoreError;
