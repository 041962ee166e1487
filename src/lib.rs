//! slirc-track - Straylight IRC client state tracking
//!
//! Keeps a per-connection view of what the server announced in RPL_ISUPPORT
//! and who is in which channel with which privilege modes, built from the
//! inbound event stream.
//!
//! ```
//! use slirc_track::{Event, Registry, Tracker, TrackerConfig};
//!
//! let tracker = Tracker::new(TrackerConfig::default());
//! let mut registry = Registry::new();
//! tracker.setup(&mut registry);
//!
//! for line in [
//!     ":irc.example.net 005 me PREFIX=(qov)~@+ NICKLEN=30 :are supported by this server",
//!     ":irc.example.net 353 me = #rust :~ferris @alice bob",
//!     ":bob!b@example.org NICK robert",
//! ] {
//!     registry.dispatch(&Event::parse(line).unwrap());
//! }
//!
//! let state = tracker.state();
//! assert_eq!(state.nick_len(), Some(30));
//! let ferris = state.members().member("#rust", "ferris").unwrap();
//! assert_eq!(ferris.modes.to_string(), "+q");
//! assert!(state.members().member("#rust", "robert").is_some());
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
pub mod telemetry;
pub mod tracker;

pub use crate::config::{ConfigError, MalformedTokenPolicy, TrackerConfig};
pub use crate::error::StateError;
pub use crate::handlers::{Dispatcher, Handler, Registry};
pub use crate::state::{Channel, ConnectionState, MemberModes, Membership};
pub use crate::telemetry::{DiagnosticSink, TracingSink};
pub use crate::tracker::Tracker;
pub use slirc_proto::{Event, PrefixModes};
