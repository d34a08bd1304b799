//! Recording map widget.

use crate::providers::MapWidget;
use crate::types::LatLng;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct Recorded {
    pans: Vec<LatLng>,
    zooms: Vec<u8>,
}

/// Map widget that only remembers the camera commands it received.
///
/// Clones share the same recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingMapWidget {
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingMapWidget {
    /// Create a widget with an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions passed to `pan_to`, in order.
    #[must_use]
    pub fn pans(&self) -> Vec<LatLng> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pans
            .clone()
    }

    /// Levels passed to `set_zoom`, in order.
    #[must_use]
    pub fn zooms(&self) -> Vec<u8> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .zooms
            .clone()
    }
}

impl MapWidget for RecordingMapWidget {
    fn pan_to(&self, position: LatLng) {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pans
            .push(position);
    }

    fn set_zoom(&self, zoom: u8) {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .zooms
            .push(zoom);
    }
}
