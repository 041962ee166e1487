//! Event source (`nick!user@host` or server name).
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

use std::fmt;

/// Origin of an inbound event.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Source {
    /// Server name (e.g., "irc.example.com")
    Server(String),
    /// User source: nickname plus optional user and host parts.
    User {
        /// Nickname.
        nick: String,
        /// Username (ident), empty when not sent.
        user: String,
        /// Hostname, empty when not sent.
        host: String,
    },
}

impl Source {
    /// Parse a source string (without the leading `:`).
    ///
    /// This is a lenient parser that does not validate the components. A dot in
    /// the name part with no `!` or `@` marks a server name.
    pub fn parse(s: &str) -> Self {
        #[derive(Copy, Clone, Eq, PartialEq)]
        enum Part {
            Name,
            User,
            Host,
        }

        let mut name = String::new();
        let mut user = String::new();
        let mut host = String::new();
        let mut part = Part::Name;
        let mut is_server = false;

        for c in s.chars() {
            if c == '.' && part == Part::Name {
                is_server = true;
            }

            match c {
                '!' if part == Part::Name => {
                    is_server = false;
                    part = Part::User;
                }
                '@' if part != Part::Host => {
                    is_server = false;
                    part = Part::Host;
                }
                _ => {
                    match part {
                        Part::Name => &mut name,
                        Part::User => &mut user,
                        Part::Host => &mut host,
                    }
                    .push(c);
                }
            }
        }

        if is_server {
            Source::Server(name)
        } else {
            Source::User { nick: name, user, host }
        }
    }

    /// Create a user source from its components.
    pub fn user(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Source::User {
            nick: nick.into(),
            user: user.into(),
            host: host.into(),
        }
    }

    /// The nickname, for user sources.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Source::User { nick, .. } => Some(nick),
            Source::Server(_) => None,
        }
    }

    /// The hostname, for user sources that carried one.
    pub fn host(&self) -> Option<&str> {
        match self {
            Source::User { host, .. } if !host.is_empty() => Some(host),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Server(name) => f.write_str(name),
            Source::User { nick, user, host } => {
                f.write_str(nick)?;
                if !user.is_empty() {
                    write!(f, "!{}", user)?;
                }
                if !host.is_empty() {
                    write!(f, "@{}", host)?;
                }
                Ok(())
            }
        }
    }
}
