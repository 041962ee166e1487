//! `PREFIX` decoding into a bidirectional mode table.

use std::collections::HashMap;

use smallvec::SmallVec;

/// Decoded `PREFIX` ISUPPORT token.
///
/// Maps channel membership modes (like `o`, `v`) to their display glyphs
/// (`@`, `+`) and back. The table is always rebuilt from a whole `PREFIX`
/// value; `display` is kept as the exact inverse of `modes`.
///
/// # Example
///
/// ```
/// use slirc_proto::isupport::PrefixModes;
///
/// let table = PrefixModes::parse("(ov)@+");
/// assert_eq!(table.glyph_for('o'), Some('@'));
/// assert_eq!(table.letter_for('+'), Some('v'));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixModes {
    /// Mode letters in announced order (highest privilege first).
    order: SmallVec<[char; 8]>,
    /// Mode letter to display glyph.
    modes: HashMap<char, char>,
    /// Display glyph to mode letter.
    display: HashMap<char, char>,
    /// Both segments were present and had equal length.
    complete: bool,
}

impl PrefixModes {
    /// The value assumed before a server announces its own `PREFIX`.
    pub const DEFAULT: &'static str = "(ov)@+";

    /// Decode a `PREFIX` value like `(qaohv)~&@%+`.
    ///
    /// Never fails. When the glyph segment is shorter or longer than the
    /// letter segment, pairing stops at the shorter one; with no `)` at all
    /// the table is empty. Use [`is_complete`](Self::is_complete) to detect
    /// either case.
    pub fn parse(value: &str) -> Self {
        let mut letters: SmallVec<[char; 8]> = SmallVec::new();
        let mut table = PrefixModes::default();
        let mut in_glyphs = false;
        let mut pos = 0usize;

        for c in value.chars() {
            if !in_glyphs {
                match c {
                    '(' => continue,
                    ')' => {
                        in_glyphs = true;
                        pos = 0;
                    }
                    _ => letters.push(c),
                }
                continue;
            }

            if let Some(&letter) = letters.get(pos) {
                table.insert(letter, c);
            }
            pos += 1;
        }

        table.complete = in_glyphs && !letters.is_empty() && pos == letters.len();
        table.order = letters
            .into_iter()
            .filter(|l| table.modes.contains_key(l))
            .fold(SmallVec::new(), |mut acc, l| {
                if !acc.contains(&l) {
                    acc.push(l);
                }
                acc
            });
        table
    }

    /// Pair a letter with a glyph, evicting any earlier pairing of either so
    /// the two maps stay inverse.
    fn insert(&mut self, letter: char, glyph: char) {
        if let Some(old_glyph) = self.modes.insert(letter, glyph) {
            self.display.remove(&old_glyph);
        }
        if let Some(old_letter) = self.display.insert(glyph, letter) {
            if old_letter != letter {
                self.modes.remove(&old_letter);
            }
        }
    }

    /// Whether the value decoded cleanly: both segments present, equal length.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns the display glyph for a mode letter.
    ///
    /// For example, with `PREFIX=(qaohv)~&@%+`:
    /// - `glyph_for('o')` returns `Some('@')`
    /// - `glyph_for('x')` returns `None`
    #[inline]
    pub fn glyph_for(&self, letter: char) -> Option<char> {
        self.modes.get(&letter).copied()
    }

    /// Returns the mode letter for a display glyph.
    #[inline]
    pub fn letter_for(&self, glyph: char) -> Option<char> {
        self.display.get(&glyph).copied()
    }

    /// Returns true if `c` is a display glyph on this server.
    ///
    /// This checks glyphs, not mode letters: `o` is a valid nickname
    /// character, `@` is not.
    #[inline]
    pub fn is_glyph(&self, c: char) -> bool {
        self.display.contains_key(&c)
    }

    /// Returns true if `letter` is a membership mode on this server.
    ///
    /// Useful for disambiguating modes like `q`, which is a list mode on some
    /// networks and founder status on others.
    #[inline]
    pub fn is_mode(&self, letter: char) -> bool {
        self.modes.contains_key(&letter)
    }

    /// Position of `letter` in the announced order (0 = highest privilege).
    #[inline]
    pub fn rank(&self, letter: char) -> Option<usize> {
        self.order.iter().position(|&l| l == letter)
    }

    /// Number of letter/glyph pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no pair decoded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate `(letter, glyph)` pairs in announced order.
    pub fn iter(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.order
            .iter()
            .filter_map(move |&l| self.modes.get(&l).map(|&g| (l, g)))
    }

    /// Split a names-listing token into its decoded mode letters and the bare
    /// nickname.
    ///
    /// The leading run of display glyphs is decoded (several glyphs appear
    /// when `multi-prefix` is enabled); the remaining suffix is the nickname.
    pub fn strip_glyphs<'a>(&self, token: &'a str) -> (SmallVec<[char; 4]>, &'a str) {
        let mut letters = SmallVec::new();
        let mut split = token.len();
        for (idx, c) in token.char_indices() {
            match self.letter_for(c) {
                Some(letter) => letters.push(letter),
                None => {
                    split = idx;
                    break;
                }
            }
        }
        (letters, &token[split..])
    }
}
