//! Shell configuration from environment variables.
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `WAYMARK_BACKEND` | `memory`, `firestore` | `memory` |
//! | `WAYMARK_NOTICE_TTL_SECS` | seconds | `5` |
//! | `WAYMARK_FOCUS_ZOOM` | 0-22 | `15` |
//! | `WAYMARK_CLEAR_POLICY` | `drop-all`, `retain-failed` | `drop-all` |
//! | `WAYMARK_METRICS` | `on`, `off` | `off` |
//!
//! With the Firestore backend the `FIRESTORE_*` variables are read as well.

use std::time::Duration;
use thiserror::Error;
use waymark_firestore::{FirestoreConfig, FirestoreError};
use waymark_markers::{ClearPolicy, SyncConfig};

/// Highest zoom level map widgets accept.
pub const MAX_ZOOM: u8 = 22;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be used.
    #[error("Invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Value found.
        value: String,
        /// What would have been accepted.
        expected: &'static str,
    },

    /// Firestore settings are incomplete.
    #[error(transparent)]
    Firestore(#[from] FirestoreError),
}

/// Where markers are persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendConfig {
    /// Process-local store; markers vanish on exit.
    Memory,
    /// Firestore collection.
    Firestore(FirestoreConfig),
}

/// Everything the shell needs to start.
#[derive(Clone, Debug, PartialEq)]
pub struct ShellConfig {
    /// Marker persistence.
    pub backend: BackendConfig,
    /// Marker flow settings.
    pub sync: SyncConfig,
    /// Install the Prometheus recorder.
    pub metrics: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::Memory,
            sync: SyncConfig::default(),
            metrics: false,
        }
    }
}

impl ShellConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable holds an unusable value or the
    /// Firestore backend is selected without a project id.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// See [`ShellConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = get("WAYMARK_BACKEND") {
            config.backend = match value.to_ascii_lowercase().as_str() {
                "memory" => BackendConfig::Memory,
                "firestore" => BackendConfig::Firestore(FirestoreConfig::from_lookup(&lookup)?),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "WAYMARK_BACKEND",
                        value,
                        expected: "'memory' or 'firestore'",
                    });
                },
            };
        }

        if let Some(value) = get("WAYMARK_NOTICE_TTL_SECS") {
            let secs = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "WAYMARK_NOTICE_TTL_SECS",
                value: value.clone(),
                expected: "a whole number of seconds",
            })?;
            config.sync = config.sync.with_notice_ttl(Duration::from_secs(secs));
        }

        if let Some(value) = get("WAYMARK_FOCUS_ZOOM") {
            let zoom = value
                .parse::<u8>()
                .ok()
                .filter(|zoom| *zoom <= MAX_ZOOM)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "WAYMARK_FOCUS_ZOOM",
                    value: value.clone(),
                    expected: "a zoom level between 0 and 22",
                })?;
            config.sync = config.sync.with_focus_zoom(zoom);
        }

        if let Some(value) = get("WAYMARK_CLEAR_POLICY") {
            let policy = value
                .parse::<ClearPolicy>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "WAYMARK_CLEAR_POLICY",
                    value: value.clone(),
                    expected: "'drop-all' or 'retain-failed'",
                })?;
            config.sync = config.sync.with_clear_policy(policy);
        }

        if let Some(value) = get("WAYMARK_METRICS") {
            config.metrics = match value.to_ascii_lowercase().as_str() {
                "on" | "true" | "1" => true,
                "off" | "false" | "0" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "WAYMARK_METRICS",
                        value,
                        expected: "'on' or 'off'",
                    });
                },
            };
        }

        Ok(config)
    }
}
