//! Actions for the marker flow.
//!
//! Commands come from the user (through the view shell); events are fed back
//! by effects once the store or the map has answered.

use crate::error::MarkerStoreError;
use crate::providers::BatchDeleteReport;
use crate::types::{LatLng, Marker, MarkerId};

/// Marker flow actions.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkerAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════════
    /// Fetch the stored markers (once per session).
    LoadMarkers,

    /// Flip between add mode and delete mode.
    ToggleAddMode,

    /// Show or hide the marker list.
    ToggleListVisible,

    /// The map surface was clicked.
    ///
    /// `position` is `None` when the widget could not resolve a coordinate.
    MapClicked {
        /// Clicked coordinate.
        position: Option<LatLng>,
    },

    /// A marker was dropped after dragging.
    MarkerDragEnded {
        /// Ordinal of the dragged marker.
        index: usize,
        /// Drop coordinate, if the widget reported one.
        position: Option<LatLng>,
    },

    /// A marker pin was clicked.
    MarkerClicked {
        /// Ordinal of the clicked marker.
        index: usize,
    },

    /// Delete every marker.
    ClearAll,

    /// Center and zoom the map on a marker from the list.
    FocusMarker {
        /// Ordinal of the list entry.
        index: usize,
    },

    /// Hide a notice once its time is up.
    DismissNotice {
        /// Notice to hide.
        id: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════════
    /// The initial load finished.
    MarkersLoaded {
        /// Stored markers.
        markers: Vec<Marker>,
    },

    /// The initial load failed.
    LoadFailed {
        /// Store error.
        error: MarkerStoreError,
    },

    /// The store accepted a new marker.
    MarkerCreated {
        /// Marker carrying its new identifier.
        marker: Marker,
    },

    /// The store rejected a new marker.
    CreateFailed {
        /// Where the marker would have been.
        position: LatLng,
        /// Store error.
        error: MarkerStoreError,
    },

    /// The store deleted a marker.
    MarkerDeleted {
        /// Ordinal the marker had when the delete was requested.
        index: usize,
        /// Deleted identifier.
        id: MarkerId,
    },

    /// The store failed to delete a marker.
    DeleteFailed {
        /// Identifier that is still stored.
        id: MarkerId,
        /// Store error.
        error: MarkerStoreError,
    },

    /// A clear-all batch finished.
    MarkersCleared {
        /// Per-identifier outcome.
        report: BatchDeleteReport,
    },
}

impl MarkerAction {
    /// Whether this action is user input.
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::LoadMarkers
                | Self::ToggleAddMode
                | Self::ToggleListVisible
                | Self::MapClicked { .. }
                | Self::MarkerDragEnded { .. }
                | Self::MarkerClicked { .. }
                | Self::ClearAll
                | Self::FocusMarker { .. }
                | Self::DismissNotice { .. }
        )
    }

    /// Whether this action reports the outcome of an effect.
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_and_events_are_disjoint() {
        assert!(MarkerAction::ClearAll.is_command());
        assert!(!MarkerAction::ClearAll.is_event());

        let event = MarkerAction::MarkerDeleted {
            index: 0,
            id: MarkerId::new("m1"),
        };
        assert!(event.is_event());
        assert!(!event.is_command());
    }
}
