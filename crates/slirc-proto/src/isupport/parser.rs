//! ISUPPORT token classification.

/// One classified token from an ISUPPORT line.
///
/// A token is either:
/// - A bare key (e.g., `EXCEPTS`) indicating a feature is supported
/// - A key=value pair (e.g., `NETWORK=Libera.Chat`)
/// - A negated key (e.g., `-EXCEPTS`) withdrawing a previously announced feature
/// - Malformed (embedded whitespace), which callers should skip
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IsupportToken<'a> {
    /// `KEY=VALUE`. The value may be empty (`KEY=`).
    Set {
        /// The token key (e.g., `NETWORK`, `CHANTYPES`).
        key: &'a str,
        /// Everything after the first `=`.
        value: &'a str,
    },
    /// Bare `KEY`.
    Flag(&'a str),
    /// `-KEY`, carrying the key without the marker.
    Negated(&'a str),
    /// Token containing whitespace; carries the raw token.
    Malformed(&'a str),
}

impl<'a> IsupportToken<'a> {
    /// The feature name this token refers to, if well-formed.
    pub fn key(&self) -> Option<&'a str> {
        match *self {
            IsupportToken::Set { key, .. } => Some(key),
            IsupportToken::Flag(key) | IsupportToken::Negated(key) => Some(key),
            IsupportToken::Malformed(_) => None,
        }
    }
}

/// Classify a single ISUPPORT token.
///
/// Returns `None` for empty tokens. A `-` prefix only negates when the token
/// has no `=`; `-KEY=VALUE` is a plain assignment to the key `-KEY`.
///
/// # Example
///
/// ```
/// use slirc_proto::isupport::{classify, IsupportToken};
///
/// assert_eq!(classify("NICKLEN=30"), Some(IsupportToken::Set { key: "NICKLEN", value: "30" }));
/// assert_eq!(classify("-EXCEPTS"), Some(IsupportToken::Negated("EXCEPTS")));
/// assert_eq!(classify("SAFELIST"), Some(IsupportToken::Flag("SAFELIST")));
/// ```
pub fn classify(token: &str) -> Option<IsupportToken<'_>> {
    if token.is_empty() {
        return None;
    }
    if token.contains(char::is_whitespace) {
        return Some(IsupportToken::Malformed(token));
    }
    if let Some((key, value)) = token.split_once('=') {
        return Some(IsupportToken::Set { key, value });
    }
    match token.strip_prefix('-') {
        Some(key) if !key.is_empty() => Some(IsupportToken::Negated(key)),
        _ => Some(IsupportToken::Flag(token)),
    }
}

/// Classify every token of a batch, in order, dropping empty tokens.
pub fn parse_params<'a, S: AsRef<str>>(params: &'a [S]) -> Vec<IsupportToken<'a>> {
    params
        .iter()
        .filter_map(|p| classify(p.as_ref()))
        .collect()
}

/// Slice the feature tokens out of raw `RPL_ISUPPORT` arguments.
///
/// Skips the first argument (target nickname) and the human-readable
/// trailing text (`are supported by this server`). The last argument counts
/// as that text when it was sent as a trailing parameter or contains a space.
pub fn response_tokens<S: AsRef<str>>(args: &[S], trailing: bool) -> &[S] {
    if args.is_empty() {
        return args;
    }

    let mut tokens = &args[1..];

    if let Some(last) = tokens.last() {
        if trailing || last.as_ref().contains(' ') {
            tokens = &tokens[..tokens.len() - 1];
        }
    }
    tokens
}
