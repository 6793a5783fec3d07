//! Conversion between dot-joined symbol sequences and the flat character
//! stream the regex machinery works on.
//!
//! `Open.Close` is encoded as `OpenClose`; decoding puts a separator back in
//! front of every upper case letter, since symbols start with one.

use std::cmp::Ordering;

pub const SEPARATOR: char = '.';

/// Strip every separator from `sequence`.
pub fn encode(sequence: &str) -> String {
    sequence.chars().filter(|&c| c != SEPARATOR).collect()
}

/// Re-insert a separator before every upper case letter except a leading one.
pub fn decode(flat: &str) -> String {
    let mut out = String::with_capacity(flat.len() * 2);
    for (i, c) in flat.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push(SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Number of symbols in a dot-joined sequence. The empty sequence has none.
pub fn count_symbols(sequence: &str) -> usize {
    if sequence.is_empty() {
        0
    } else {
        sequence.split(SEPARATOR).count()
    }
}

/// Canonical order: fewer symbols first, then lexicographic.
pub fn canonical_cmp(a: &str, b: &str) -> Ordering {
    count_symbols(a)
        .cmp(&count_symbols(b))
        .then_with(|| a.cmp(b))
}
