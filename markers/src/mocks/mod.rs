//! Mock provider implementations for testing.
//!
//! In-memory stand-ins for the marker store and the map widget. Both record
//! every call so tests can assert on what reached the outside world.

pub mod map;
pub mod store;

pub use map::RecordingMapWidget;
pub use store::{InMemoryMarkerStore, StoreCall};
