//! Session state for the marker flow.

use crate::types::{Marker, MarkerId};
use serde::{Deserialize, Serialize};

/// Progress of the one-time initial load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    /// No load requested yet.
    #[default]
    NotLoaded,
    /// Load in flight.
    Loading,
    /// Markers fetched; further load requests are ignored.
    Loaded,
    /// The last attempt failed; a new attempt is allowed.
    Failed,
}

/// A transient error message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Identifies the notice so a stale dismissal can be told apart.
    pub id: u64,
    /// Text shown to the user.
    pub message: String,
}

/// Everything the session knows about markers and UI modes.
///
/// Only the reducer mutates this. The marker list is ordered by insertion;
/// a marker's position in the list is its ordinal in the UI.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerState {
    /// Markers in display order.
    pub markers: Vec<Marker>,
    /// Map clicks create markers; marker clicks do nothing.
    pub is_add_mode: bool,
    /// Whether the marker list panel is shown.
    pub is_list_visible: bool,
    /// Initial load progress.
    pub load_status: LoadStatus,
    /// Notice currently shown, if any.
    pub notice: Option<Notice>,
    #[serde(default)]
    next_notice_id: u64,
}

impl MarkerState {
    /// Empty session: no markers, delete mode, list hidden.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session seeded with markers (as if already loaded).
    #[must_use]
    pub fn with_markers(markers: Vec<Marker>) -> Self {
        Self {
            markers,
            load_status: LoadStatus::Loaded,
            ..Self::default()
        }
    }

    /// Start in add mode (or not).
    #[must_use]
    pub const fn with_add_mode(mut self, on: bool) -> Self {
        self.is_add_mode = on;
        self
    }

    /// Start with the list panel shown (or not).
    #[must_use]
    pub const fn with_list_visible(mut self, visible: bool) -> Self {
        self.is_list_visible = visible;
        self
    }

    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Identifiers of every persisted marker, in list order.
    #[must_use]
    pub fn persisted_ids(&self) -> Vec<MarkerId> {
        self.markers.iter().filter_map(|m| m.id.clone()).collect()
    }

    /// Find the marker a delete confirmation refers to.
    ///
    /// `index` is where the marker was when the delete was requested. If it
    /// still holds `id` that slot wins; otherwise the first marker carrying
    /// `id` is used.
    #[must_use]
    pub fn locate(&self, index: usize, id: &MarkerId) -> Option<usize> {
        let holds_id = |i: usize| self.markers.get(i).and_then(|m| m.id.as_ref()) == Some(id);
        if holds_id(index) {
            return Some(index);
        }
        self.markers
            .iter()
            .position(|m| m.id.as_ref() == Some(id))
    }

    /// Replace the current notice and return its identifier.
    pub fn raise_notice(&mut self, message: impl Into<String>) -> u64 {
        self.next_notice_id += 1;
        let id = self.next_notice_id;
        self.notice = Some(Notice {
            id,
            message: message.into(),
        });
        id
    }

    /// Clear the notice if it is still the one identified by `id`.
    ///
    /// Returns whether anything was cleared.
    pub fn dismiss_notice(&mut self, id: u64) -> bool {
        if self.notice.as_ref().is_some_and(|notice| notice.id == id) {
            self.notice = None;
            true
        } else {
            false
        }
    }
}
