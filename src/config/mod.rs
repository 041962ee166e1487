//! Configuration loading and management.
//!
//! - [`types`]: the tracker configuration (`TrackerConfig`) and its error type
//! - [`defaults`]: serde default functions

mod defaults;
mod types;

pub use types::{ConfigError, MalformedTokenPolicy, TrackerConfig};
