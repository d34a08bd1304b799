//! One interactive session: a store, a map, and the command dispatcher.

use crate::backend::Backend;
use crate::commands::{Command, HELP};
use crate::render::render;
use crate::terminal_map::TerminalMap;
use std::time::Duration;
use waymark_markers::{MapView, MarkerAction, MarkerEnvironment, MarkerReducer, MarkerState, SyncConfig};
use waymark_runtime::metrics::PrometheusMetrics;
use waymark_runtime::{Store, StoreError};

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text and read the next line.
    Continue(String),
    /// Stop reading input.
    Quit,
}

/// A running shell session.
pub struct Session {
    store: Store<MarkerState, MarkerAction>,
    map: TerminalMap,
    config: SyncConfig,
    metrics: Option<PrometheusMetrics>,
}

impl Session {
    /// Start the store over `backend`.
    ///
    /// Must be called inside a Tokio runtime.
    #[must_use]
    pub fn start(backend: Backend, config: SyncConfig, metrics: Option<PrometheusMetrics>) -> Self {
        let map = TerminalMap::new(config.initial_camera);
        let env = MarkerEnvironment::new(backend, map.clone()).with_config(config.clone());
        let store = Store::new(MarkerState::new(), MarkerReducer::new(), env);
        Self {
            store,
            map,
            config,
            metrics,
        }
    }

    /// Load the stored markers.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store has stopped.
    pub async fn load(&self) -> Result<(), StoreError> {
        self.store.send(MarkerAction::LoadMarkers).await
    }

    /// Current page as text.
    pub async fn page(&self) -> String {
        let view = self
            .store
            .state(|state| MapView::from_state(state, &self.config))
            .await;
        render(&view, &self.map.camera())
    }

    /// Run one command.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store has stopped.
    pub async fn execute(&self, command: Command) -> Result<Outcome, StoreError> {
        if let Some(action) = command.to_action() {
            self.store.send(action).await?;
            return Ok(Outcome::Continue(self.page().await));
        }

        Ok(match command {
            Command::Help => Outcome::Continue(HELP.to_string()),
            Command::Metrics => Outcome::Continue(
                self.metrics
                    .as_ref()
                    .and_then(PrometheusMetrics::render)
                    .unwrap_or_else(|| "metrics are off (set WAYMARK_METRICS=on)".to_string()),
            ),
            Command::Quit => Outcome::Quit,
            _ => Outcome::Continue(self.page().await),
        })
    }

    /// Read-only access to the marker state.
    pub async fn state<T>(&self, f: impl FnOnce(&MarkerState) -> T) -> T {
        self.store.state(f).await
    }

    /// The map widget.
    #[must_use]
    pub const fn map(&self) -> &TerminalMap {
        &self.map
    }

    /// Drain outstanding work and stop the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ShutdownTimeout` if work is still pending after
    /// `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }
}
