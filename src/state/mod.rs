//! State management module.
//!
//! Contains the per-connection [`ConnectionState`] aggregate: the ISUPPORT
//! [`FeatureRegistry`] and the channel [`MembershipStore`]. The connection
//! object owns it behind an `Arc`; there is no process-wide state.

mod channel;
mod features;
mod members;

pub use channel::{Channel, MemberModes, Membership};
pub use features::{Feature, FeatureDecoder, FeatureRegistry, FeatureValue};
pub use members::MembershipStore;

use std::sync::Arc;

use slirc_proto::PrefixModes;

use crate::config::TrackerConfig;
use crate::telemetry::{DiagnosticSink, TracingSink};

/// Everything tracked for one connection.
#[derive(Debug)]
pub struct ConnectionState {
    features: Arc<FeatureRegistry>,
    members: MembershipStore,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl ConnectionState {
    /// Build state for a new connection, logging anomalies via `tracing`.
    pub fn new(config: &TrackerConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Build state for a new connection with a custom diagnostic sink.
    pub fn with_sink(config: &TrackerConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        let features = Arc::new(FeatureRegistry::new(
            &config.defaults,
            config.malformed_tokens,
            Arc::clone(&sink),
        ));
        let members = MembershipStore::new(Arc::clone(&features), config.evict_empty_channels);
        Self {
            features,
            members,
            diagnostics: sink,
        }
    }

    #[inline]
    pub fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    #[inline]
    pub fn members(&self) -> &MembershipStore {
        &self.members
    }

    #[inline]
    pub fn diagnostics(&self) -> &dyn DiagnosticSink {
        self.diagnostics.as_ref()
    }

    /// Shortcut for [`FeatureRegistry::prefix_modes`].
    pub fn prefix_modes(&self) -> Arc<PrefixModes> {
        self.features.prefix_modes()
    }

    /// Shortcut for [`FeatureRegistry::nick_len`].
    pub fn nick_len(&self) -> Option<usize> {
        self.features.nick_len()
    }
}
