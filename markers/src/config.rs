//! Configuration for the marker flow.

use crate::types::{Camera, LatLng};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default map center (Lviv).
pub const DEFAULT_CENTER: LatLng = LatLng::from_raw(49.8397, 24.0297);

/// Zoom the map opens at.
pub const DEFAULT_ZOOM: u8 = 13;

/// Zoom used when focusing a marker from the list.
pub const DEFAULT_FOCUS_ZOOM: u8 = 15;

/// How long an error notice stays visible.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

/// What clear-all does with markers whose delete failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClearPolicy {
    /// Empty the list no matter how the deletes went.
    #[default]
    DropAll,
    /// Keep markers whose delete failed so the user can retry.
    RetainFailed,
}

/// Unknown clear policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown clear policy '{0}' (expected 'drop-all' or 'retain-failed')")]
pub struct ParseClearPolicyError(String);

impl FromStr for ClearPolicy {
    type Err = ParseClearPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop-all" | "drop_all" => Ok(Self::DropAll),
            "retain-failed" | "retain_failed" => Ok(Self::RetainFailed),
            other => Err(ParseClearPolicyError(other.to_string())),
        }
    }
}

/// Marker flow settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncConfig {
    /// Where the map opens.
    pub initial_camera: Camera,
    /// Zoom applied by `FocusMarker`.
    pub focus_zoom: u8,
    /// Lifetime of an error notice.
    pub notice_ttl: Duration,
    /// Clear-all behavior on partial failure.
    pub clear_policy: ClearPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            initial_camera: Camera {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
            },
            focus_zoom: DEFAULT_FOCUS_ZOOM,
            notice_ttl: DEFAULT_NOTICE_TTL,
            clear_policy: ClearPolicy::default(),
        }
    }
}

impl SyncConfig {
    /// Set the initial camera.
    #[must_use]
    pub const fn with_initial_camera(mut self, camera: Camera) -> Self {
        self.initial_camera = camera;
        self
    }

    /// Set the focus zoom.
    #[must_use]
    pub const fn with_focus_zoom(mut self, zoom: u8) -> Self {
        self.focus_zoom = zoom;
        self
    }

    /// Set the notice lifetime.
    #[must_use]
    pub const fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    /// Set the clear-all policy.
    #[must_use]
    pub const fn with_clear_policy(mut self, policy: ClearPolicy) -> Self {
        self.clear_policy = policy;
        self
    }
}
