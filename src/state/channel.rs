//! Channel-related types and state.

use std::collections::HashMap;
use std::fmt;

use slirc_proto::PrefixModes;
use smallvec::SmallVec;

/// Member modes (op, voice, ...) as privilege letters.
///
/// Letters are kept ordered by their rank in the server's `PREFIX` table
/// (highest privilege first) with no duplicates, and render as `+ov`. No
/// letters renders as the empty string.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct MemberModes {
    letters: SmallVec<[char; 4]>,
}

impl MemberModes {
    /// Build from decoded letters, normalizing order against `table`.
    pub fn from_letters<I: IntoIterator<Item = char>>(letters: I, table: &PrefixModes) -> Self {
        let mut modes = Self::default();
        for letter in letters {
            modes.add(letter, table);
        }
        modes
    }

    /// Add a letter in rank order. Returns false if it was already present.
    pub fn add(&mut self, letter: char, table: &PrefixModes) -> bool {
        if self.contains(letter) {
            return false;
        }
        let rank = table.rank(letter).unwrap_or(usize::MAX);
        let pos = self
            .letters
            .iter()
            .position(|&l| table.rank(l).unwrap_or(usize::MAX) > rank)
            .unwrap_or(self.letters.len());
        self.letters.insert(pos, letter);
        true
    }

    /// Remove a letter. Returns false if it was not present.
    pub fn remove(&mut self, letter: char) -> bool {
        match self.letters.iter().position(|&l| l == letter) {
            Some(pos) => {
                self.letters.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Apply a mode token such as `+o`, `-v` or `+o-v`.
    ///
    /// Only membership modes known to `table` are applied; other letters
    /// (channel modes like `m` or `b`) are skipped. A token without a leading
    /// sign adds. Returns true if the token named at least one membership mode.
    pub fn apply(&mut self, token: &str, table: &PrefixModes) -> bool {
        let mut adding = true;
        let mut touched = false;
        for c in token.chars() {
            match c {
                '+' => adding = true,
                '-' => adding = false,
                _ if table.is_mode(c) => {
                    touched = true;
                    if adding {
                        self.add(c, table);
                    } else {
                        self.remove(c);
                    }
                }
                _ => {}
            }
        }
        touched
    }

    /// Whether `letter` is set.
    #[inline]
    pub fn contains(&self, letter: char) -> bool {
        self.letters.contains(&letter)
    }

    /// The letters, highest privilege first.
    #[inline]
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// True when no membership mode is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Highest display glyph for this member (e.g. `@` for an op who is
    /// also voiced).
    pub fn highest_glyph(&self, table: &PrefixModes) -> Option<char> {
        self.letters.iter().find_map(|&l| table.glyph_for(l))
    }

    /// All display glyphs, highest first (as with `multi-prefix`).
    pub fn glyphs(&self, table: &PrefixModes) -> String {
        self.letters
            .iter()
            .filter_map(|&l| table.glyph_for(l))
            .collect()
    }
}

impl fmt::Display for MemberModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.letters.is_empty() {
            return Ok(());
        }
        f.write_str("+")?;
        for l in &self.letters {
            write!(f, "{}", l)?;
        }
        Ok(())
    }
}

/// One user's membership in one channel.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Membership {
    /// Host from the last JOIN or NICK seen for this user; `None` when the
    /// user was only seen in a names listing.
    pub host: Option<String>,
    pub modes: MemberModes,
}

/// A tracked channel and its roster, keyed by bare nickname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    name: String,
    members: HashMap<String, Membership>,
}

impl Channel {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: HashMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member(&self, nick: &str) -> Option<&Membership> {
        self.members.get(nick)
    }

    pub fn contains(&self, nick: &str) -> bool {
        self.members.contains_key(nick)
    }

    /// Iterate `(nick, membership)` pairs in no particular order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Membership)> {
        self.members.iter().map(|(n, m)| (n.as_str(), m))
    }

    /// Nicknames sorted, for stable output.
    pub fn nicks(&self) -> Vec<&str> {
        let mut nicks: Vec<&str> = self.members.keys().map(String::as_str).collect();
        nicks.sort_unstable();
        nicks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn insert(&mut self, nick: String, membership: Membership) -> Option<Membership> {
        self.members.insert(nick, membership)
    }

    pub(crate) fn remove(&mut self, nick: &str) -> Option<Membership> {
        self.members.remove(nick)
    }

    pub(crate) fn member_mut(&mut self, nick: &str) -> Option<&mut Membership> {
        self.members.get_mut(nick)
    }
}
