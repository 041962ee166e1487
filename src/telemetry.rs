//! Telemetry: tracing setup, dispatch spans and the diagnostic sink.

use crate::error::StateError;

/// Receiver for anomalies absorbed by state operations.
///
/// Operations never surface these to callers; a sink is the only place they
/// become visible. Reports may arrive while state locks are held, so a sink
/// must not call back into the [`ConnectionState`](crate::state::ConnectionState).
pub trait DiagnosticSink: Send + Sync {
    /// Called once per absorbed anomaly.
    fn report(&self, err: &StateError);
}

impl std::fmt::Debug for dyn DiagnosticSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DiagnosticSink")
    }
}

/// Default sink: logs every anomaly at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, err: &StateError) {
        tracing::warn!(code = err.error_code(), error = %err, "Ignored malformed input");
    }
}

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (e.g. `"info"` or `"slirc_track=debug"`).
pub fn init_tracing(
    default_directive: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span};

    /// Create a span for one dispatched event.
    pub fn event(command: &str, source: Option<&str>) -> Span {
        if let Some(source) = source {
            debug_span!("event", command = %command, source = %source)
        } else {
            debug_span!("event", command = %command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_installs_once() {
        assert!(init_tracing("slirc_track=debug", false).is_ok());
        assert!(init_tracing("info", true).is_err());

        let span = spans::event("JOIN", Some("alice!a@h"));
        let _enter = span.enter();
        TracingSink.report(&StateError::MissingSource("JOIN".into()));
    }
}
