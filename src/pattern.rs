//! Compiled SCI patterns and the sequence enumerators built on them.

use itertools::Itertools;
use tracing::{debug, trace};

use crate::codec::{self, canonical_cmp, count_symbols};
use crate::count::{self, Cardinality};
use crate::error::SciError;
use crate::matcher;
use crate::sequence;
use crate::syntax::{RegexParser, SyntaxParser, SyntaxTree};

/// Default coverage for [`Pattern::valid_sequences`].
pub const DEFAULT_VALID_COVERAGE: usize = 0;
/// Default coverage for [`Pattern::invalid_sequences`].
pub const DEFAULT_INVALID_COVERAGE: usize = 1;

/// Characters that separate symbols in a raw pattern.
pub const OPERATORS: [char; 6] = ['.', '|', '+', '*', '(', ')'];

const LOOKBEHIND: &str = "(?<";

/// A compiled Sequence Constraint on the Interactions.
///
/// Built once from the raw pattern string and immutable afterwards. The
/// pattern `O.(S|M).C` accepts `O.S.C` and `O.M.C`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    symbols: Vec<String>,
    /// Tree of the dot-stripped pattern.
    valid: SyntaxTree,
    /// Tree of `(sym1|sym2|...)+` over the pattern's symbols.
    combinator: SyntaxTree,
}

impl Pattern {
    /// Compile `source` with the bundled regex parser.
    pub fn compile(source: &str) -> Result<Self, SciError> {
        Self::compile_with(source, &RegexParser)
    }

    /// Compile `source`, delegating regex syntax to `parser`.
    pub fn compile_with(source: &str, parser: &impl SyntaxParser) -> Result<Self, SciError> {
        if source.contains(LOOKBEHIND) {
            return Err(SciError::UnsupportedSyntax);
        }
        let symbols = extract_symbols(source);
        let valid = parser.parse(&codec::encode(source))?;
        let combinator = parser.parse(&format!("({})+", symbols.join("|")))?;
        debug!(
            source,
            symbols = symbols.len(),
            captures = valid.captures,
            "compiled pattern"
        );
        Ok(Self {
            source: source.to_string(),
            symbols,
            valid,
            combinator,
        })
    }

    /// The raw pattern string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct symbols named in the pattern, canonically sorted.
    pub fn interaction_symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn syntax_tree(&self) -> &SyntaxTree {
        &self.valid
    }

    /// Lazily generate dot-joined sequences, in generation order and possibly
    /// with repeats. Unbounded repetitions repeat at most `cap` times beyond
    /// their minimum.
    pub fn sequences(
        &self,
        cap: usize,
    ) -> Result<impl Iterator<Item = String> + use<>, SciError> {
        Ok(sequence::build(&self.valid, cap)?.map(|flat| codec::decode(&flat)))
    }

    /// Accepted sequences with between `m` and `m + n` symbols, where `m` is
    /// the length of the shortest accepted one, in canonical order.
    pub fn valid_sequences(&self, n: usize) -> Result<Vec<String>, SciError> {
        let shortest = self.filter_by_membership(self.sequences(0)?, true)?;
        let Some(min_len) = shortest.first().map(|s| count_symbols(s)) else {
            debug!(source = self.source.as_str(), "pattern accepts no generated sequence");
            return Ok(Vec::new());
        };
        let max_len = min_len + n;
        let candidates = self
            .sequences(n)?
            .filter(|s| count_symbols(s) <= max_len);
        let sequences = self.filter_by_membership(candidates, true)?;
        debug!(
            source = self.source.as_str(),
            n,
            min_len,
            count = sequences.len(),
            "valid sequences"
        );
        Ok(sequences)
    }

    /// Combinations of at most `n` symbols that the pattern rejects, in
    /// canonical order.
    pub fn invalid_sequences(&self, n: usize) -> Result<Vec<String>, SciError> {
        // `(...)+` repeats at least once, so `n - 1` extra repeats reach `n` symbols.
        let cap = n.saturating_sub(1);
        let candidates = sequence::build(&self.combinator, cap)?
            .map(|flat| codec::decode(&flat))
            .filter(|s| count_symbols(s) <= n);
        let sequences = self.filter_by_membership(candidates, false)?;
        debug!(
            source = self.source.as_str(),
            n,
            count = sequences.len(),
            "invalid sequences"
        );
        Ok(sequences)
    }

    /// Whether the pattern accepts `sequence`, with or without separators.
    ///
    /// A sequence too expensive to decide counts as rejected; use
    /// [`Pattern::check_sequence`] to tell the two apart.
    pub fn is_valid_sequence(&self, sequence: &str) -> bool {
        self.check_sequence(sequence).unwrap_or(false)
    }

    /// Like [`Pattern::is_valid_sequence`], but fails with
    /// [`SciError::MatchBudgetExhausted`] when membership cannot be decided.
    pub fn check_sequence(&self, sequence: &str) -> Result<bool, SciError> {
        matcher::full_match(&self.valid, &codec::encode(sequence))
    }

    /// Distinct candidates whose membership equals `accepted`, canonically sorted.
    fn filter_by_membership(
        &self,
        candidates: impl Iterator<Item = String>,
        accepted: bool,
    ) -> Result<Vec<String>, SciError> {
        let mut kept = Vec::new();
        for candidate in candidates.unique() {
            trace!(candidate = candidate.as_str());
            if self.check_sequence(&candidate)? == accepted {
                kept.push(candidate);
            }
        }
        Ok(kept
            .into_iter()
            .sorted_by(|a, b| canonical_cmp(a, b))
            .collect_vec())
    }

    /// Number of sequences the pattern denotes (see [`count::language_size`]).
    pub fn language_size(&self) -> Result<Cardinality, SciError> {
        count::language_size(&self.valid)
    }
}

/// Split on the operators, drop empty fragments, dedup and sort.
fn extract_symbols(source: &str) -> Vec<String> {
    source
        .split(OPERATORS)
        .filter(|s| !s.is_empty())
        .unique()
        .sorted_by(|a, b| canonical_cmp(a, b))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests;
