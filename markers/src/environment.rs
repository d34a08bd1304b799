//! Marker flow environment.
//!
//! Dependency injection for [`MarkerReducer`](crate::reducer::MarkerReducer).

use crate::config::SyncConfig;
use crate::providers::{MapWidget, MarkerStore};
use std::sync::Arc;
use waymark_core::environment::{Clock, SystemClock};

/// Everything the marker reducer's effects reach out to.
///
/// # Type Parameters
///
/// - `S`: Marker store
/// - `M`: Map widget
#[derive(Clone)]
pub struct MarkerEnvironment<S, M>
where
    S: MarkerStore + Clone,
    M: MapWidget + Clone,
{
    /// Remote marker collection.
    pub store: S,

    /// Map the markers are drawn on.
    pub map: M,

    /// Source of marker creation timestamps.
    pub clock: Arc<dyn Clock>,

    /// Flow settings.
    pub config: SyncConfig,
}

impl<S, M> MarkerEnvironment<S, M>
where
    S: MarkerStore + Clone,
    M: MapWidget + Clone,
{
    /// Create an environment with the system clock and default settings.
    #[must_use]
    pub fn new(store: S, map: M) -> Self {
        Self {
            store,
            map,
            clock: Arc::new(SystemClock),
            config: SyncConfig::default(),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the settings.
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }
}
