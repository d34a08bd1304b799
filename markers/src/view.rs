//! View model for the marker page.
//!
//! A pure projection of [`MarkerState`]: whatever renders the page (the
//! terminal shell, a test) reads a [`MapView`] and never the state itself.

use crate::config::SyncConfig;
use crate::state::{MarkerState, Notice};
use crate::types::{Camera, LatLng};

/// A marker pin on the map.
#[derive(Clone, Debug, PartialEq)]
pub struct PinView {
    /// Stable render key: the marker id, or `#<ordinal>` for unsaved markers.
    pub key: String,
    /// Position in the marker list (0-based).
    pub index: usize,
    /// Where to draw the pin.
    pub position: LatLng,
    /// Text on the pin (1-based ordinal).
    pub label: String,
    /// Hover text with the coordinate.
    pub title: String,
    /// Pins can always be dragged.
    pub draggable: bool,
}

/// A toolbar button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonView {
    /// Short caption.
    pub caption: &'static str,
    /// Highlighted (pressed) look.
    pub active: bool,
}

/// The three toolbar buttons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolbarView {
    /// Toggles add mode; active while adding.
    pub add_mode: ButtonView,
    /// Deletes every marker.
    pub clear_all: ButtonView,
    /// Shows or hides the list panel; active while shown.
    pub list_toggle: ButtonView,
}

/// One entry in the list panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListEntryView {
    /// Position in the marker list (0-based).
    pub index: usize,
    /// `Marker <ordinal>`.
    pub label: String,
}

/// The collapsible list panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListPanelView {
    /// `Markers: <count>`.
    pub header: String,
    /// One entry per marker, in list order.
    pub entries: Vec<ListEntryView>,
}

/// Everything needed to draw the page.
#[derive(Clone, Debug, PartialEq)]
pub struct MapView {
    /// Initial camera.
    pub camera: Camera,
    /// Marker pins in list order.
    pub pins: Vec<PinView>,
    /// Toolbar buttons.
    pub toolbar: ToolbarView,
    /// List panel, present only while visible.
    pub list: Option<ListPanelView>,
    /// Notice to show, if any.
    pub notice: Option<Notice>,
}

impl MapView {
    /// Project the state onto the page.
    #[must_use]
    pub fn from_state(state: &MarkerState, config: &SyncConfig) -> Self {
        let pins = state
            .markers
            .iter()
            .enumerate()
            .map(|(index, marker)| PinView {
                key: marker
                    .id
                    .as_ref()
                    .map_or_else(|| format!("#{}", index + 1), ToString::to_string),
                index,
                position: marker.position,
                label: (index + 1).to_string(),
                title: marker.position.to_string(),
                draggable: true,
            })
            .collect();

        let toolbar = ToolbarView {
            add_mode: ButtonView {
                caption: "+",
                active: state.is_add_mode,
            },
            clear_all: ButtonView {
                caption: "clear",
                active: false,
            },
            list_toggle: ButtonView {
                caption: "list",
                active: state.is_list_visible,
            },
        };

        let list = state.is_list_visible.then(|| ListPanelView {
            header: format!("Markers: {}", state.len()),
            entries: (0..state.len())
                .map(|index| ListEntryView {
                    index,
                    label: format!("Marker {}", index + 1),
                })
                .collect(),
        });

        Self {
            camera: config.initial_camera,
            pins,
            toolbar,
            list,
            notice: state.notice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Marker, MarkerId};

    fn state() -> MarkerState {
        MarkerState::with_markers(vec![
            Marker {
                id: Some(MarkerId::new("abc")),
                position: LatLng::from_raw(49.839_7, 24.029_7),
                created_at: None,
            },
            Marker::unsaved(LatLng::from_raw(-1.5, 2.25)),
        ])
    }

    #[test]
    fn pins_are_labelled_by_ordinal() {
        let view = MapView::from_state(&state(), &SyncConfig::default());

        let keys: Vec<_> = view.pins.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["abc", "#2"]);
        assert_eq!(view.pins[0].label, "1");
        assert_eq!(view.pins[1].label, "2");
        assert_eq!(view.pins[1].title, "Lat: -1.50000, Lng: 2.25000");
        assert!(view.pins.iter().all(|p| p.draggable));
    }

    #[test]
    fn list_panel_only_when_visible() {
        let mut state = state();
        assert_eq!(MapView::from_state(&state, &SyncConfig::default()).list, None);

        state.is_list_visible = true;
        let view = MapView::from_state(&state, &SyncConfig::default());
        let Some(list) = view.list else {
            panic!("list panel should be visible");
        };
        assert_eq!(list.header, "Markers: 2");
        let labels: Vec<_> = list.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["Marker 1", "Marker 2"]);
        assert!(view.toolbar.list_toggle.active);
    }

    #[test]
    fn camera_comes_from_config() {
        let view = MapView::from_state(&MarkerState::new(), &SyncConfig::default());
        assert_eq!(view.camera.zoom, 13);
        assert_eq!(view.camera.center, LatLng::from_raw(49.8397, 24.0297));
        assert!(!view.toolbar.add_mode.active);
    }
}
