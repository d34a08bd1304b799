//! # Waymark Shell
//!
//! Terminal front-end for the marker flow. It stands in for the browser page:
//! commands on stdin play the part of clicks and drags, and the page is
//! re-drawn as text after each one.
//!
//! - [`config`]: environment-driven settings
//! - [`backend`]: in-memory or Firestore marker store
//! - [`terminal_map`]: map widget that tracks its camera
//! - [`commands`]: line parser
//! - [`render`]: text view of a [`waymark_markers::MapView`]
//! - [`session`]: store wiring and command dispatch

pub mod backend;
pub mod commands;
pub mod config;
pub mod render;
pub mod session;
pub mod terminal_map;

pub use backend::Backend;
pub use config::{BackendConfig, ConfigError, ShellConfig};
pub use session::{Outcome, Session};
