//! # slirc-proto
//!
//! Protocol-level building blocks for client-side IRC state tracking.
//!
//! ## Features
//!
//! - Inbound [`Event`] records with a lenient line parser
//! - `nick!user@host` [`Source`] parsing
//! - ISUPPORT (RPL_ISUPPORT) token classification
//! - `PREFIX` decoding into a bidirectional [`PrefixModes`] table
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_proto::{Event, PrefixModes};
//!
//! let event = Event::parse(":alice!a@example.com JOIN #rust").unwrap();
//! assert_eq!(event.command, "JOIN");
//! assert_eq!(event.nick(), Some("alice"));
//! assert_eq!(event.arg(0), Some("#rust"));
//!
//! let table = PrefixModes::parse("(qaohv)~&@%+");
//! assert_eq!(table.glyph_for('o'), Some('@'));
//! assert_eq!(table.letter_for('~'), Some('q'));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod isupport;
pub mod response;
pub mod source;

pub use self::error::EventParseError;
pub use self::event::Event;
pub use self::isupport::{classify, parse_params, response_tokens, IsupportToken, PrefixModes};
pub use self::response::Response;
pub use self::source::Source;
