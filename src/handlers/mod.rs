//! Inbound event handlers.
//!
//! Each tracked event has an explicit handler value holding the connection's
//! [`ConnectionState`]. Handlers are registered by event name into a
//! [`Dispatcher`] (the connection layer's subscription table, or the in-crate
//! [`Registry`]) and can be driven directly with synthetic events in tests.
//!
//! Handlers never fail. Events whose argument shape they cannot interpret are
//! reported to the state's diagnostic sink and otherwise ignored.

mod channel;
mod connection;
mod core;
mod isupport;

pub use self::channel::{JoinHandler, KickHandler, ModeHandler, NamesHandler, PartHandler};
pub use self::connection::{NickHandler, QuitHandler};
pub use self::core::registry::{Dispatcher, Registry};
pub use self::isupport::IsupportHandler;

use slirc_proto::Event;

use crate::error::StateError;
use crate::state::ConnectionState;

/// A subscriber for one event name.
pub trait Handler: Send + Sync {
    fn handle(&self, event: &Event);
}

/// Report `event` as malformed unless `ok`. Returns `ok`.
pub(crate) fn guard_args(
    state: &ConnectionState,
    event: &Event,
    expected: &'static str,
    ok: bool,
) -> bool {
    if !ok {
        state.diagnostics().report(&StateError::UnexpectedArgs {
            command: event.command.clone(),
            expected,
            got: event.args.len(),
        });
    }
    ok
}

/// The source nickname, reporting events that arrived without one.
pub(crate) fn source_nick<'a>(state: &ConnectionState, event: &'a Event) -> Option<&'a str> {
    match event.nick() {
        Some(nick) if !nick.is_empty() => Some(nick),
        _ => {
            state
                .diagnostics()
                .report(&StateError::MissingSource(event.command.clone()));
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::config::TrackerConfig;
    use crate::error::StateError;
    use crate::state::ConnectionState;
    use crate::telemetry::DiagnosticSink;

    #[derive(Default)]
    pub(crate) struct Collect(Mutex<Vec<StateError>>);

    impl Collect {
        pub(crate) fn errors(&self) -> Vec<StateError> {
            self.0.lock().clone()
        }
    }

    impl DiagnosticSink for Collect {
        fn report(&self, err: &StateError) {
            self.0.lock().push(err.clone());
        }
    }

    pub(crate) fn state_with_sink() -> (Arc<ConnectionState>, Arc<Collect>) {
        let sink = Arc::new(Collect::default());
        let state = ConnectionState::with_sink(&TrackerConfig::default(), sink.clone());
        (Arc::new(state), sink)
    }
}
