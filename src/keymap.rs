// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::input::PhysicalKey;

/// A fixed, ordered list of physical keys. The position of a key in the list is
/// its offset: a scale-degree offset for pitched instruments, or a pad index
/// for the drum pad.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyMap {
    keys: &'static str,
}
impl KeyMap {
    /// The home-row layout familiar from most software synths: white keys on
    /// the home row and black keys on the row above, starting at C.
    pub const PIANO_KEYS: &'static str = "awsedftgyhujkolp;']";

    /// Two rows of eight pads.
    pub const DRUM_KEYS: &'static str = "qwertyuiasdfghjk";

    #[allow(missing_docs)]
    pub const fn piano() -> Self {
        Self {
            keys: Self::PIANO_KEYS,
        }
    }

    #[allow(missing_docs)]
    pub const fn drums() -> Self {
        Self {
            keys: Self::DRUM_KEYS,
        }
    }

    /// Number of mapped keys.
    pub fn len(&self) -> usize {
        self.keys.chars().count()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The offset of the given character, if it's mapped.
    pub fn offset(&self, c: char) -> Option<usize> {
        let c = c.to_ascii_lowercase();
        self.keys.chars().position(|k| k == c)
    }

    /// The offset of the given key, if it's a mapped character.
    pub fn offset_of_key(&self, key: &PhysicalKey) -> Option<usize> {
        match key {
            PhysicalKey::Char(c) => self.offset(*c),
            _ => None,
        }
    }

    /// The character at the given offset.
    pub fn key_at(&self, offset: usize) -> Option<char> {
        self.keys.chars().nth(offset)
    }

    /// All the characters, in offset order.
    pub fn chars(&self) -> impl Iterator<Item = char> + 'static {
        self.keys.chars()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piano_layout() {
        let map = KeyMap::piano();
        assert_eq!(map.len(), 19);
        assert_eq!(map.offset('a'), Some(0));
        assert_eq!(map.offset('w'), Some(1));
        assert_eq!(map.offset('k'), Some(12));
        assert_eq!(map.offset(']'), Some(18));
        assert_eq!(map.offset('A'), Some(0), "lookups ignore case");
        assert_eq!(map.offset('z'), None);
        assert_eq!(map.key_at(16), Some(';'));
        assert_eq!(map.key_at(19), None);
    }

    #[test]
    fn every_key_round_trips() {
        for map in [KeyMap::piano(), KeyMap::drums()] {
            for (i, c) in map.chars().enumerate() {
                assert_eq!(map.offset(c), Some(i));
                assert_eq!(map.key_at(i), Some(c));
            }
        }
    }

    #[test]
    fn drums_layout() {
        let map = KeyMap::drums();
        assert_eq!(map.len(), 16);
        assert_eq!(map.offset_of_key(&PhysicalKey::Char('q')), Some(0));
        assert_eq!(map.offset_of_key(&PhysicalKey::Char('k')), Some(15));
        assert_eq!(map.offset_of_key(&PhysicalKey::ArrowUp), None);
    }
}
