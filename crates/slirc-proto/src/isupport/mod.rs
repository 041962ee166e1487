//! ISUPPORT (RPL_ISUPPORT / 005) token grammar.
//!
//! This module classifies the tokens sent in `RPL_ISUPPORT` replies and
//! decodes the `PREFIX` token into a bidirectional mode table.
//!
//! # Reference
//! - Modern IRC documentation: <https://modern.ircdocs.horse/isupport.html>

mod parser;
mod prefix_modes;

pub use parser::{classify, parse_params, response_tokens, IsupportToken};
pub use prefix_modes::PrefixModes;
