//! Error types for event parsing.

use thiserror::Error;

/// Errors encountered when parsing a raw line into an [`Event`](crate::Event).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EventParseError {
    /// Line was empty (or only CR/LF).
    #[error("empty message")]
    EmptyMessage,

    /// Tags or source were present but no command followed.
    #[error("missing command")]
    MissingCommand,

    /// Source prefix marker with nothing after it.
    #[error("invalid source: {0}")]
    InvalidSource(String),
}
