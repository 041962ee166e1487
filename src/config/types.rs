//! Core configuration types and loading.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use super::defaults::{default_features, default_true};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What to do with an ISUPPORT token that contains whitespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedTokenPolicy {
    /// Skip the offending token and keep applying the rest of the batch.
    #[default]
    SkipToken,
    /// Drop the offending token and everything after it in the batch.
    AbortBatch,
}

/// Tracker configuration.
///
/// ```toml
/// track_members = true
/// evict_empty_channels = false
/// malformed_tokens = "abort-batch"
///
/// [defaults]
/// CHANTYPES = "#&"
/// PREFIX = "(ov)@+"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Track ISUPPORT features (default: true).
    #[serde(default = "default_true")]
    pub track_features: bool,
    /// Track channel rosters (default: true). Implies `track_features`.
    #[serde(default = "default_true")]
    pub track_members: bool,
    /// Drop a channel once a departure leaves its roster empty (default: true).
    #[serde(default = "default_true")]
    pub evict_empty_channels: bool,
    /// Handling of ISUPPORT tokens with embedded whitespace.
    #[serde(default)]
    pub malformed_tokens: MalformedTokenPolicy,
    /// Features seeded before the first ISUPPORT reply.
    #[serde(default = "default_features")]
    pub defaults: BTreeMap<String, String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            track_features: true,
            track_members: true,
            evict_empty_channels: true,
            malformed_tokens: MalformedTokenPolicy::default(),
            defaults: default_features(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TrackerConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Whether ISUPPORT tracking ends up enabled, counting the implicit
    /// dependency of roster tracking on it.
    pub fn features_enabled(&self) -> bool {
        self.track_features || self.track_members
    }
}
