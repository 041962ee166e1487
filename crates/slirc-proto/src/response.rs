//! IRC numerics consumed by client-side state tracking.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

#![allow(non_camel_case_types)]

use std::fmt;
use std::str::FromStr;

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 005 - Server supported features (ISUPPORT)
    RPL_ISUPPORT = 5,
    /// 353 - Names list (`<client> <symbol> <channel> :[prefix]<nick>{ [prefix]<nick>}`)
    RPL_NAMREPLY = 353,
    /// 366 - End of names list
    RPL_ENDOFNAMES = 366,
}

impl Response {
    /// Returns the numeric code as u16
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Creates a Response from a numeric code
    pub fn from_code(code: u16) -> Option<Response> {
        match code {
            5 => Some(Response::RPL_ISUPPORT),
            353 => Some(Response::RPL_NAMREPLY),
            366 => Some(Response::RPL_ENDOFNAMES),
            _ => None,
        }
    }

    /// The zero-padded wire form, as it appears in the command position.
    pub fn as_command(&self) -> &'static str {
        match self {
            Response::RPL_ISUPPORT => "005",
            Response::RPL_NAMREPLY => "353",
            Response::RPL_ENDOFNAMES => "366",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_command())
    }
}

/// Error returned when a command is not a known numeric.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseResponseError;

impl fmt::Display for ParseResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown or non-numeric response code")
    }
}

impl std::error::Error for ParseResponseError {}

impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseResponseError);
        }
        s.parse::<u16>()
            .ok()
            .and_then(Response::from_code)
            .ok_or(ParseResponseError)
    }
}
