//! Provider traits for the marker flow.
//!
//! The reducer never talks to the outside world directly. It produces effects
//! that call into these two collaborators:
//!
//! - [`MarkerStore`]: the remote collection the markers are persisted in
//! - [`MapWidget`]: the map the markers are drawn on

pub mod map;
pub mod store;

pub use map::MapWidget;
pub use store::{BatchDeleteReport, FailedDelete, MarkerStore};
