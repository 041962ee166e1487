//! Diagnostics taxonomy for slirc-track.
//!
//! State operations never fail: malformed input is absorbed and the tracked
//! view stays best-effort. Each absorbed anomaly is described by a
//! [`StateError`] and handed to the connection's
//! [`DiagnosticSink`](crate::telemetry::DiagnosticSink).

use thiserror::Error;

/// Anomalies absorbed while applying inbound events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// ISUPPORT token with embedded whitespace; only that token is skipped.
    #[error("malformed ISUPPORT token: {0:?}")]
    MalformedToken(String),

    /// ISUPPORT batch abandoned at a malformed token.
    #[error("ISUPPORT batch aborted at {token:?}, {dropped} token(s) dropped")]
    BatchAborted { token: String, dropped: usize },

    /// Numeric feature value that does not parse; the previous value is kept.
    #[error("invalid {feature} value: {value:?}")]
    InvalidNumber { feature: String, value: String },

    /// `PREFIX` value whose segments do not pair up one to one.
    #[error("PREFIX value {0:?} has mismatched segments")]
    PrefixMismatch(String),

    /// Event with an argument count the handler cannot interpret.
    #[error("{command}: expected {expected} argument(s), got {got}")]
    UnexpectedArgs {
        command: String,
        expected: &'static str,
        got: usize,
    },

    /// Event that needs a user source but arrived without one.
    #[error("{0}: missing source nickname")]
    MissingSource(String),

    /// MODE naming several targets at once.
    #[error("MODE {channel} {modes}: multi-target mode changes are not tracked")]
    UnsupportedModeBatch { channel: String, modes: String },
}

impl StateError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedToken(_) => "malformed_token",
            Self::BatchAborted { .. } => "batch_aborted",
            Self::InvalidNumber { .. } => "invalid_number",
            Self::PrefixMismatch(_) => "prefix_mismatch",
            Self::UnexpectedArgs { .. } => "unexpected_args",
            Self::MissingSource(_) => "missing_source",
            Self::UnsupportedModeBatch { .. } => "unsupported_mode_batch",
        }
    }
}
