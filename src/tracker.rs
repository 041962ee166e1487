//! Setup entry point wiring the handlers into a connection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::config::TrackerConfig;
use crate::handlers::{
    Dispatcher, IsupportHandler, JoinHandler, KickHandler, ModeHandler, NamesHandler, NickHandler,
    PartHandler, QuitHandler,
};
use crate::state::ConnectionState;
use crate::telemetry::DiagnosticSink;
use slirc_proto::Response;

/// Per-connection tracker.
///
/// Owns the connection's [`ConnectionState`] and registers the handlers that
/// keep it current. Each subsystem registers at most once, however many
/// times setup is called.
#[derive(Debug)]
pub struct Tracker {
    state: Arc<ConnectionState>,
    config: TrackerConfig,
    features_wired: AtomicBool,
    members_wired: AtomicBool,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Self {
        let state = Arc::new(ConnectionState::new(&config));
        Self::from_parts(state, config)
    }

    /// Tracker whose anomalies go to `sink` instead of the log.
    pub fn with_sink(config: TrackerConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        let state = Arc::new(ConnectionState::with_sink(&config, sink));
        Self::from_parts(state, config)
    }

    fn from_parts(state: Arc<ConnectionState>, config: TrackerConfig) -> Self {
        Self {
            state,
            config,
            features_wired: AtomicBool::new(false),
            members_wired: AtomicBool::new(false),
        }
    }

    /// Shared handle to the tracked state, for application readers.
    pub fn state(&self) -> Arc<ConnectionState> {
        Arc::clone(&self.state)
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Register the ISUPPORT handler. Returns `false` if already registered.
    pub fn setup_feature_detect(&self, dispatcher: &mut dyn Dispatcher) -> bool {
        if self.features_wired.swap(true, Ordering::AcqRel) {
            return false;
        }

        dispatcher.register(
            Response::RPL_ISUPPORT.as_command(),
            Box::new(IsupportHandler::new(self.state())),
        );
        info!("Feature detection enabled");
        true
    }

    /// Register the membership handlers, enabling feature detection first.
    /// Returns `false` if already registered.
    pub fn setup_nick_track(&self, dispatcher: &mut dyn Dispatcher) -> bool {
        self.setup_feature_detect(dispatcher);
        if self.members_wired.swap(true, Ordering::AcqRel) {
            return false;
        }

        let state = &self.state;
        dispatcher.register(
            Response::RPL_NAMREPLY.as_command(),
            Box::new(NamesHandler::new(Arc::clone(state))),
        );
        dispatcher.register("JOIN", Box::new(JoinHandler::new(Arc::clone(state))));
        dispatcher.register("PART", Box::new(PartHandler::new(Arc::clone(state))));
        dispatcher.register("KICK", Box::new(KickHandler::new(Arc::clone(state))));
        dispatcher.register("QUIT", Box::new(QuitHandler::new(Arc::clone(state))));
        dispatcher.register("NICK", Box::new(NickHandler::new(Arc::clone(state))));
        dispatcher.register("MODE", Box::new(ModeHandler::new(Arc::clone(state))));
        info!("Nick tracking enabled");
        true
    }

    /// Enable whatever the configuration asks for.
    pub fn setup(&self, dispatcher: &mut dyn Dispatcher) {
        if self.config.track_members {
            self.setup_nick_track(dispatcher);
        } else if self.config.features_enabled() {
            self.setup_feature_detect(dispatcher);
        }
    }
}
