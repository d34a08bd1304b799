//! Marker flow reducer.
//!
//! All state changes happen here. Remote calls are returned as effects and
//! their outcomes come back as events, so the marker list only ever reflects
//! what the store has confirmed. Drags are the one exception: they change the
//! local copy only.

use crate::actions::MarkerAction;
use crate::config::ClearPolicy;
use crate::environment::MarkerEnvironment;
use crate::error::MarkerStoreError;
use crate::metrics::RemoteMetrics;
use crate::providers::{MapWidget, MarkerStore};
use crate::state::{LoadStatus, MarkerState};
use crate::types::{LatLng, Marker, NewMarker};
use std::marker::PhantomData;
use std::time::Instant;
use waymark_core::{SmallVec, async_effect, delay, effect::Effect, reducer::Reducer, smallvec};

/// Marker flow reducer.
///
/// # Type Parameters
///
/// - `S`: Marker store
/// - `M`: Map widget
#[derive(Debug, Clone, Copy)]
pub struct MarkerReducer<S, M> {
    _phantom: PhantomData<fn() -> (S, M)>,
}

impl<S, M> MarkerReducer<S, M> {
    /// Create a new marker reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<S, M> Default for MarkerReducer<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, M> MarkerReducer<S, M>
where
    S: MarkerStore + Clone + 'static,
    M: MapWidget + Clone + 'static,
{
    /// Show an error notice and schedule its dismissal.
    fn notify_error(
        state: &mut MarkerState,
        env: &MarkerEnvironment<S, M>,
        message: String,
    ) -> SmallVec<[Effect<MarkerAction>; 4]> {
        let id = state.raise_notice(message);
        smallvec![delay! {
            duration: env.config.notice_ttl,
            action: MarkerAction::DismissNotice { id }
        }]
    }

    fn apply(
        state: &mut MarkerState,
        action: MarkerAction,
        env: &MarkerEnvironment<S, M>,
    ) -> SmallVec<[Effect<MarkerAction>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Initial load
            // ═══════════════════════════════════════════════════════════════
            MarkerAction::LoadMarkers => {
                if matches!(state.load_status, LoadStatus::Loading | LoadStatus::Loaded) {
                    tracing::debug!(status = ?state.load_status, "Ignoring repeated load request");
                    return smallvec![Effect::None];
                }
                state.load_status = LoadStatus::Loading;

                let store = env.store.clone();
                smallvec![async_effect! {
                    let started = Instant::now();
                    let result = store.list_all().await;
                    RemoteMetrics::record("list", result.is_ok(), started.elapsed());
                    Some(match result {
                        Ok(markers) => MarkerAction::MarkersLoaded { markers },
                        Err(error) => MarkerAction::LoadFailed { error },
                    })
                }]
            },

            MarkerAction::MarkersLoaded { markers } => {
                tracing::info!(count = markers.len(), "Markers loaded");
                state.markers = markers;
                state.load_status = LoadStatus::Loaded;
                smallvec![Effect::None]
            },

            MarkerAction::LoadFailed { error } => {
                tracing::warn!(error = %error, "Failed to load markers");
                state.load_status = LoadStatus::Failed;
                Self::notify_error(state, env, format!("Could not load markers: {error}"))
            },

            // ═══════════════════════════════════════════════════════════════
            // Modes
            // ═══════════════════════════════════════════════════════════════
            MarkerAction::ToggleAddMode => {
                state.is_add_mode = !state.is_add_mode;
                tracing::debug!(add_mode = state.is_add_mode, "Add mode toggled");
                smallvec![Effect::None]
            },

            MarkerAction::ToggleListVisible => {
                state.is_list_visible = !state.is_list_visible;
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Create
            // ═══════════════════════════════════════════════════════════════
            MarkerAction::MapClicked { position } => {
                if !state.is_add_mode {
                    return smallvec![Effect::None];
                }
                let Some(position) = position.filter(LatLng::is_valid) else {
                    tracing::debug!(?position, "Ignoring map click without a usable coordinate");
                    return smallvec![Effect::None];
                };

                let new_marker = NewMarker {
                    position,
                    created_at: env.clock.now(),
                };
                let store = env.store.clone();
                smallvec![async_effect! {
                    let started = Instant::now();
                    let result = store.create(&new_marker).await;
                    RemoteMetrics::record("create", result.is_ok(), started.elapsed());
                    Some(match result {
                        Ok(id) => MarkerAction::MarkerCreated {
                            marker: Marker::persisted(id, new_marker),
                        },
                        Err(error) => MarkerAction::CreateFailed {
                            position: new_marker.position,
                            error,
                        },
                    })
                }]
            },

            MarkerAction::MarkerCreated { marker } => {
                tracing::info!(marker_id = ?marker.id, position = %marker.position, "Marker created");
                state.markers.push(marker);
                smallvec![Effect::None]
            },

            MarkerAction::CreateFailed { position, error } => {
                tracing::warn!(position = %position, error = %error, "Failed to create marker");
                Self::notify_error(state, env, format!("Could not save marker: {error}"))
            },

            // ═══════════════════════════════════════════════════════════════
            // Drag: local only, identity is dropped
            // ═══════════════════════════════════════════════════════════════
            MarkerAction::MarkerDragEnded { index, position } => {
                let Some(position) = position.filter(LatLng::is_valid) else {
                    return smallvec![Effect::None];
                };
                let Some(slot) = state.markers.get_mut(index) else {
                    tracing::debug!(index, "Drag end for unknown marker");
                    return smallvec![Effect::None];
                };
                *slot = Marker::unsaved(position);
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Delete
            // ═══════════════════════════════════════════════════════════════
            MarkerAction::MarkerClicked { index } => {
                if state.is_add_mode {
                    return smallvec![Effect::None];
                }
                let Some(id) = state.markers.get(index).and_then(|m| m.id.clone()) else {
                    tracing::debug!(index, "Clicked marker has no stored identity");
                    return smallvec![Effect::None];
                };

                let store = env.store.clone();
                smallvec![async_effect! {
                    let started = Instant::now();
                    // Already gone remotely: drop it locally as well
                    let result = match store.delete_by_id(&id).await {
                        Err(MarkerStoreError::NotFound(_)) => Ok(()),
                        other => other,
                    };
                    RemoteMetrics::record("delete", result.is_ok(), started.elapsed());
                    Some(match result {
                        Ok(()) => MarkerAction::MarkerDeleted { index, id },
                        Err(error) => MarkerAction::DeleteFailed { id, error },
                    })
                }]
            },

            MarkerAction::MarkerDeleted { index, id } => {
                if let Some(position) = state.locate(index, &id) {
                    state.markers.remove(position);
                    tracing::info!(marker_id = %id, "Marker deleted");
                } else {
                    tracing::debug!(marker_id = %id, "Deleted marker no longer in list");
                }
                smallvec![Effect::None]
            },

            MarkerAction::DeleteFailed { id, error } => {
                tracing::warn!(marker_id = %id, error = %error, "Failed to delete marker");
                Self::notify_error(state, env, format!("Could not delete marker: {error}"))
            },

            // ═══════════════════════════════════════════════════════════════
            // Clear all
            // ═══════════════════════════════════════════════════════════════
            MarkerAction::ClearAll => {
                let ids = state.persisted_ids();
                if ids.is_empty() {
                    state.markers.clear();
                    return smallvec![Effect::None];
                }

                let store = env.store.clone();
                smallvec![async_effect! {
                    let started = Instant::now();
                    let report = store.delete_many(ids).await;
                    RemoteMetrics::record("clear", report.is_complete(), started.elapsed());
                    Some(MarkerAction::MarkersCleared { report })
                }]
            },

            MarkerAction::MarkersCleared { report } => {
                match env.config.clear_policy {
                    ClearPolicy::DropAll => state.markers.clear(),
                    ClearPolicy::RetainFailed => state
                        .markers
                        .retain(|m| m.id.as_ref().is_some_and(|id| report.has_failed(id))),
                }

                if report.is_complete() {
                    tracing::info!(deleted = report.deleted.len(), "Markers cleared");
                    return smallvec![Effect::None];
                }

                tracing::warn!(
                    deleted = report.deleted.len(),
                    failed = report.failed.len(),
                    "Clear-all finished with failures"
                );
                Self::notify_error(
                    state,
                    env,
                    format!(
                        "Could not delete {} of {} markers",
                        report.failed.len(),
                        report.attempted()
                    ),
                )
            },

            // ═══════════════════════════════════════════════════════════════
            // Camera
            // ═══════════════════════════════════════════════════════════════
            MarkerAction::FocusMarker { index } => {
                let Some(position) = state.markers.get(index).map(|m| m.position) else {
                    return smallvec![Effect::None];
                };
                // Camera moves happen in the effect; the reducer never touches the map
                let map = env.map.clone();
                let zoom = env.config.focus_zoom;
                smallvec![async_effect! {
                    map.pan_to(position);
                    map.set_zoom(zoom);
                    None
                }]
            },

            // ═══════════════════════════════════════════════════════════════
            // Notices
            // ═══════════════════════════════════════════════════════════════
            MarkerAction::DismissNotice { id } => {
                state.dismiss_notice(id);
                smallvec![Effect::None]
            },
        }
    }
}

impl<S, M> Reducer for MarkerReducer<S, M>
where
    S: MarkerStore + Clone + 'static,
    M: MapWidget + Clone + 'static,
{
    type State = MarkerState;
    type Action = MarkerAction;
    type Environment = MarkerEnvironment<S, M>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let effects = Self::apply(state, action, env);
        RemoteMetrics::set_marker_count(state.len());
        effects
    }
}
