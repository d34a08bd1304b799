//! Map widget trait.

use crate::types::LatLng;

/// Imperative handle on the rendered map.
///
/// Only the camera commands the flow needs are exposed. Both are fire and
/// forget: the widget animates on its own and reports nothing back.
pub trait MapWidget: Send + Sync {
    /// Center the viewport on `position`.
    fn pan_to(&self, position: LatLng);

    /// Change the zoom level.
    fn set_zoom(&self, zoom: u8);
}
