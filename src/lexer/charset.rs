// src/lexer/charset.rs
//! Fixed lexer alphabet and the named character sets behind the regex
//! shorthand escapes.

use std::fmt;

/// Transition label reserved for empty (epsilon) moves.
pub const EPSILON: u8 = 0;

/// Number of byte values a `CharSet` can hold (ASCII).
pub const CHAR_SPACE: usize = 128;

/// A set of ASCII bytes, packed as a 128-bit mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CharSet(u128);

impl CharSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every byte in `lo..=hi` (clamped to ASCII).
    pub const fn range(lo: u8, hi: u8) -> Self {
        let mut bits = 0u128;
        let mut b = lo;
        while b <= hi && (b as usize) < CHAR_SPACE {
            bits |= 1u128 << b;
            if b == u8::MAX {
                break;
            }
            b += 1;
        }
        Self(bits)
    }

    pub const fn single(b: u8) -> Self {
        if (b as usize) < CHAR_SPACE {
            Self(1u128 << b)
        } else {
            Self(0)
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut s = Self::empty();
        for &b in bytes {
            s.insert(b);
        }
        s
    }

    #[inline]
    pub fn contains(self, b: u8) -> bool {
        (b as usize) < CHAR_SPACE && (self.0 >> b) & 1 == 1
    }

    /// Returns false for bytes outside ASCII; they can never be members.
    #[inline]
    pub fn insert(&mut self, b: u8) -> bool {
        if (b as usize) >= CHAR_SPACE {
            return false;
        }
        let had = self.contains(b);
        self.0 |= 1u128 << b;
        !had
    }

    #[inline]
    pub fn remove(&mut self, b: u8) -> bool {
        let had = self.contains(b);
        if had {
            self.0 &= !(1u128 << b);
        }
        had
    }

    pub fn insert_all(&mut self, other: CharSet) {
        self.0 |= other.0;
    }

    pub fn remove_all(&mut self, other: CharSet) {
        self.0 &= !other.0;
    }

    pub const fn union(self, other: CharSet) -> CharSet {
        CharSet(self.0 | other.0)
    }

    pub const fn difference(self, other: CharSet) -> CharSet {
        CharSet(self.0 & !other.0)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in ascending byte order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let b = bits.trailing_zeros() as u8;
            bits &= bits - 1;
            Some(b)
        })
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharSet[")?;
        write_members(f, *self)?;
        write!(f, "]")
    }
}

/// Writes members, escaping control bytes, collapsing the full alphabet.
pub(crate) fn write_members(f: &mut impl fmt::Write, set: CharSet) -> fmt::Result {
    if set == ALPHABET {
        return f.write_str("<any>");
    }
    for b in set.iter() {
        match b {
            b'\n' => f.write_str("\\n")?,
            b'\t' => f.write_str("\\t")?,
            b'\r' => f.write_str("\\r")?,
            b' '..=b'~' => f.write_char(b as char)?,
            _ => write!(f, "\\x{b:02X}")?,
        }
    }
    Ok(())
}

/// The full lexer alphabet: ASCII without NUL (NUL is `EPSILON`).
pub const ALPHABET: CharSet = CharSet::range(0x01, 0x7F);

pub const fn digits() -> CharSet {
    CharSet::range(b'0', b'9')
}

pub const fn letters() -> CharSet {
    CharSet::range(b'a', b'z').union(CharSet::range(b'A', b'Z'))
}

pub const fn word_chars() -> CharSet {
    letters().union(digits()).union(CharSet::single(b'_'))
}

pub const fn space_chars() -> CharSet {
    CharSet::single(b' ')
        .union(CharSet::single(b'\t'))
        .union(CharSet::single(b'\n'))
        .union(CharSet::single(b'\r'))
        .union(CharSet::single(0x0B))
        .union(CharSet::single(0x0C))
}

/// Expands the byte after a `\`. Unknown escapes denote the byte itself.
pub fn chars_for_escape(escaped: u8) -> CharSet {
    match escaped {
        b'w' => word_chars(),
        b'l' => letters(),
        b'd' => digits(),
        b's' => space_chars(),
        b'n' => CharSet::single(b'\n'),
        b't' => CharSet::single(b'\t'),
        other => CharSet::single(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_excludes_epsilon() {
        assert!(!ALPHABET.contains(EPSILON));
        assert_eq!(ALPHABET.len(), 127);
    }

    #[test]
    fn word_chars_cover_letters_digits_underscore() {
        let w = word_chars();
        assert_eq!(w.len(), 26 * 2 + 10 + 1);
        assert!(w.contains(b'_') && w.contains(b'Q') && w.contains(b'7'));
        assert!(!w.contains(b'-'));
    }

    #[test]
    fn iter_is_ascending() {
        let s = CharSet::from_bytes(b"zam");
        assert_eq!(s.iter().collect::<Vec<_>>(), b"amz".to_vec());
    }

    #[test]
    fn non_ascii_is_never_a_member() {
        let mut s = CharSet::empty();
        assert!(!s.insert(0xC3));
        assert!(s.is_empty());
    }

    #[test]
    fn unknown_escape_is_literal() {
        assert_eq!(chars_for_escape(b'.'), CharSet::single(b'.'));
        assert_eq!(chars_for_escape(b'n'), CharSet::single(b'\n'));
    }
}
