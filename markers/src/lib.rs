//! # Waymark Markers
//!
//! The marker synchronization flow: a session-scoped list of map markers kept
//! in step with a remote marker store.
//!
//! ## Flow
//!
//! - **Load**: on start the stored markers are fetched once
//! - **Add mode**: a map click persists a marker, which is shown once the
//!   store has assigned it an identifier
//! - **Delete mode**: a marker click deletes it remotely, then locally
//! - **Drag**: moves the local copy only and forgets its identity
//! - **Clear all**: deletes every identified marker one at a time
//! - **Focus**: pans and zooms the map onto a list entry
//!
//! ## Architecture
//!
//! ```text
//! MarkerAction ─▶ MarkerReducer ─▶ MarkerState
//!                      │
//!                      └─▶ Effects ─▶ MarkerStore / MapWidget ─▶ events
//! ```
//!
//! Remote failures never change the list; they raise a [`Notice`] that is
//! dismissed after [`SyncConfig::notice_ttl`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use waymark_markers::mocks::{InMemoryMarkerStore, RecordingMapWidget};
//! use waymark_markers::{MarkerAction, MarkerEnvironment, MarkerReducer, MarkerState};
//! use waymark_runtime::Store;
//!
//! # async fn example() -> Result<(), waymark_runtime::StoreError> {
//! let env = MarkerEnvironment::new(InMemoryMarkerStore::new(), RecordingMapWidget::new());
//! let store = Store::new(MarkerState::new(), MarkerReducer::new(), env);
//!
//! store.send(MarkerAction::LoadMarkers).await?;
//! store.send(MarkerAction::ToggleAddMode).await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod mocks;
pub mod providers;
pub mod reducer;
pub mod state;
pub mod types;
pub mod view;

pub use actions::MarkerAction;
pub use config::{ClearPolicy, SyncConfig};
pub use environment::MarkerEnvironment;
pub use error::{MarkerStoreError, Result};
pub use providers::{BatchDeleteReport, FailedDelete, MapWidget, MarkerStore};
pub use reducer::MarkerReducer;
pub use state::{LoadStatus, MarkerState, Notice};
pub use types::{Camera, InvalidCoordinate, LatLng, Marker, MarkerId, NewMarker};
pub use view::MapView;
