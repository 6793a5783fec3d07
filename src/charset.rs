//! Character set algebra over the printable ASCII base alphabet.
//!
//! Character classes in the syntax tree are resolved against a fixed base
//! alphabet (`' '..='~'`). Anything outside it never takes part in generated
//! sequences or class membership tests.

use std::collections::BTreeSet;

use crate::syntax::ast::{CharClass, ClassMember};

/// First code point of the base alphabet.
pub const BASE_FIRST: char = ' ';
/// Last code point of the base alphabet.
pub const BASE_LAST: char = '~';

/// An ordered set of code points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Charset {
    chars: BTreeSet<char>,
}

impl Charset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The whole base alphabet.
    pub fn base() -> Self {
        (BASE_FIRST..=BASE_LAST).collect()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn insert(&mut self, ch: char) {
        self.chars.insert(ch);
    }

    /// Add every code point of `lo..=hi`. An inverted range adds nothing.
    pub fn insert_range(&mut self, lo: char, hi: char) {
        self.chars.extend(lo..=hi);
    }

    pub fn union(&self, other: &Charset) -> Charset {
        self.chars.union(&other.chars).copied().collect()
    }

    pub fn difference(&self, other: &Charset) -> Charset {
        self.chars.difference(&other.chars).copied().collect()
    }

    pub fn intersection(&self, other: &Charset) -> Charset {
        self.chars.intersection(&other.chars).copied().collect()
    }

    /// Code points in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }
}

impl FromIterator<char> for Charset {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}

/// Resolve a character class to the concrete set of base-alphabet code points
/// it denotes.
///
/// Nested classes (e.g. `\d` inside `[...]`) are first resolved against the
/// base alphabet on their own and then merged into the running set.
pub fn resolve(class: &CharClass) -> Charset {
    let base = Charset::base();
    let mut set = Charset::empty();
    for member in &class.members {
        match member {
            ClassMember::Char(c) => set.insert(*c),
            ClassMember::Range(lo, hi) => set.insert_range(*lo, *hi),
            ClassMember::Class(nested) => set = set.union(&resolve(nested)),
        }
    }
    if class.negated {
        base.difference(&set)
    } else {
        base.intersection(&set)
    }
}
