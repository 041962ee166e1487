//! Inbound event records.
//!
//! An [`Event`] is what the connection layer hands to subscribed handlers: the
//! command (or three-digit numeric), the parsed source, and the ordered
//! argument list. The trailing parameter, when present, is the last argument.
//!
//! # Example
//!
//! ```
//! use slirc_proto::Event;
//!
//! let ev = Event::parse(":irc.example.com 353 me = #rust :@alice +bob carol").unwrap();
//! assert_eq!(ev.command, "353");
//! assert_eq!(ev.arg(2), Some("#rust"));
//! assert_eq!(ev.message(), Some("@alice +bob carol"));
//! ```

use std::fmt;

use crate::error::EventParseError;
use crate::source::Source;

/// A single inbound protocol event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Command name (uppercased) or numeric code, e.g. `JOIN` or `005`.
    pub command: String,
    /// Origin of the event, if the line carried one.
    pub source: Option<Source>,
    /// Ordered arguments, including the trailing parameter as the last one.
    pub args: Vec<String>,
    /// Whether the last argument was sent as a `:` trailing parameter.
    pub trailing: bool,
}

impl Event {
    /// Create an event with no source and the given middle arguments.
    pub fn new<I, S>(command: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.to_ascii_uppercase(),
            source: None,
            args: args.into_iter().map(Into::into).collect(),
            trailing: false,
        }
    }

    /// Set the event source.
    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Append a trailing parameter.
    #[must_use]
    pub fn with_trailing(mut self, text: impl Into<String>) -> Self {
        self.args.push(text.into());
        self.trailing = true;
        self
    }

    /// Parse a raw protocol line.
    ///
    /// Lenient: tags are skipped, runs of spaces between parameters are
    /// collapsed, and CR/LF terminators are ignored.
    pub fn parse(line: &str) -> Result<Self, EventParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Err(EventParseError::EmptyMessage);
        }

        let mut rest = line;
        if rest.starts_with('@') {
            rest = rest.split_once(' ').map_or("", |(_, tail)| tail);
        }
        rest = rest.trim_start_matches(' ');

        let mut source = None;
        if let Some(stripped) = rest.strip_prefix(':') {
            let (src, tail) = stripped.split_once(' ').unwrap_or((stripped, ""));
            if src.is_empty() {
                return Err(EventParseError::InvalidSource(rest.to_string()));
            }
            source = Some(Source::parse(src));
            rest = tail.trim_start_matches(' ');
        }

        let (command, mut params) = rest.split_once(' ').unwrap_or((rest, ""));
        if command.is_empty() {
            return Err(EventParseError::MissingCommand);
        }

        let mut args = Vec::new();
        let mut trailing = false;
        loop {
            params = params.trim_start_matches(' ');
            if params.is_empty() {
                break;
            }
            if let Some(text) = params.strip_prefix(':') {
                args.push(text.to_string());
                trailing = true;
                break;
            }
            let (arg, tail) = params.split_once(' ').unwrap_or((params, ""));
            args.push(arg.to_string());
            params = tail;
        }

        Ok(Self {
            command: command.to_ascii_uppercase(),
            source,
            args,
            trailing,
        })
    }

    /// Get a specific argument by index.
    #[inline]
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// The last argument (the trailing message, for most commands).
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }

    /// Source nickname, if the event came from a user.
    #[inline]
    pub fn nick(&self) -> Option<&str> {
        self.source.as_ref().and_then(Source::nick)
    }

    /// Source hostname, if the event came from a user with a host part.
    #[inline]
    pub fn host(&self) -> Option<&str> {
        self.source.as_ref().and_then(Source::host)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, ":{} ", source)?;
        }
        f.write_str(&self.command)?;
        let last = self.args.len().saturating_sub(1);
        for (i, arg) in self.args.iter().enumerate() {
            if i == last && (self.trailing || arg.is_empty() || arg.contains(' ')) {
                write!(f, " :{}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Event {
    type Err = EventParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
