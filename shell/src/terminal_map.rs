//! Map widget for the terminal.
//!
//! There is nothing to draw on, so the widget keeps the camera it was told
//! to show and logs every move.

use std::sync::{Arc, Mutex, PoisonError};
use waymark_markers::{Camera, LatLng, MapWidget};

/// Camera-tracking map widget.
///
/// Clones share the same camera.
#[derive(Clone, Debug)]
pub struct TerminalMap {
    camera: Arc<Mutex<Camera>>,
}

impl TerminalMap {
    /// Start at `camera`.
    #[must_use]
    pub fn new(camera: Camera) -> Self {
        Self {
            camera: Arc::new(Mutex::new(camera)),
        }
    }

    /// Where the map is looking now.
    #[must_use]
    pub fn camera(&self) -> Camera {
        *self.camera.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MapWidget for TerminalMap {
    fn pan_to(&self, position: LatLng) {
        self.camera
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .center = position;
        tracing::info!(center = %position, "Map panned");
    }

    fn set_zoom(&self, zoom: u8) {
        self.camera
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .zoom = zoom;
        tracing::info!(zoom, "Map zoomed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_follows_commands() {
        let map = TerminalMap::new(Camera {
            center: LatLng::from_raw(0.0, 0.0),
            zoom: 13,
        });
        let shared = map.clone();

        map.pan_to(LatLng::from_raw(1.0, 2.0));
        map.set_zoom(15);

        assert_eq!(
            shared.camera(),
            Camera {
                center: LatLng::from_raw(1.0, 2.0),
                zoom: 15,
            }
        );
    }
}
