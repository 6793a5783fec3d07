use thiserror::Error;

use crate::syntax::ParseError;

/// Errors raised while compiling a pattern or generating its sequences.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SciError {
    /// The pattern contains a lookbehind assertion (`(?<`).
    #[error("Unsupported lookbehind assertion.")]
    UnsupportedSyntax,
    /// The regex parser rejected the pattern; its message is kept verbatim.
    #[error(transparent)]
    MalformedPattern(#[from] ParseError),
    /// A backreference names a capture group that has not been seen yet.
    #[error("Reference to non-existent capture group \\{0}.")]
    DanglingBackreference(usize),
    /// Membership could not be decided within the matcher's step budget.
    #[error("Match step budget exhausted.")]
    MatchBudgetExhausted,
}
