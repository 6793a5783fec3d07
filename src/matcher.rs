//! Set-based matcher: test whether a whole string matches a [`SyntaxTree`].
//!
//! Every node maps a set of states to the set of distinct states it can end
//! in, so alternatives that reach the same position with the same captures
//! are only followed once.
//!
//! All positions are **character** (not byte) indices into the input.

use itertools::Itertools;
use tracing::warn;

use crate::charset;
use crate::error::SciError;
use crate::syntax::ast::*;

/// Maximum number of node evaluations before giving up.
const MAX_STEPS: usize = 1_000_000;

/// Match position plus the span captured by each group so far.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct State {
    pos: usize,
    captures: Vec<Option<(usize, usize)>>,
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Test whether `input` matches `tree` from its first to its last character.
///
/// Every call starts from a clean state; nothing carries over between calls.
/// Fails with [`SciError::MatchBudgetExhausted`] instead of guessing when the
/// input is too expensive to decide.
pub fn full_match(tree: &SyntaxTree, input: &str) -> Result<bool, SciError> {
    let text: Vec<char> = input.chars().collect();
    let mut matcher = Matcher {
        text: &text,
        steps: 0,
    };
    let start = State {
        pos: 0,
        captures: vec![None; tree.captures + 1],
    };
    match matcher.alternation_states(&tree.branches, &[start]) {
        Ok(ends) => Ok(ends.iter().any(|s| s.pos == text.len())),
        Err(err) => {
            warn!(input, steps = matcher.steps, "match step budget exhausted");
            Err(err)
        }
    }
}

struct Matcher<'a> {
    text: &'a [char],
    steps: usize,
}

// ─── Core matching functions ─────────────────────────────────────────────────

impl Matcher<'_> {
    /// Distinct end states of any branch, started from any of `from`.
    fn alternation_states(
        &mut self,
        branches: &[Branch],
        from: &[State],
    ) -> Result<Vec<State>, SciError> {
        let mut ends = Vec::new();
        for branch in branches {
            ends.extend(self.sequence_states(branch, from.to_vec())?);
        }
        Ok(ends.into_iter().unique().collect())
    }

    /// Distinct end states of matching `nodes` in order.
    fn sequence_states(
        &mut self,
        nodes: &[Node],
        mut frontier: Vec<State>,
    ) -> Result<Vec<State>, SciError> {
        for node in nodes {
            if frontier.is_empty() {
                break;
            }
            let mut next = Vec::new();
            for state in &frontier {
                next.extend(self.node_states(node, state)?);
            }
            frontier = next.into_iter().unique().collect();
        }
        Ok(frontier)
    }

    /// End states for `node` starting at `state`.
    fn node_states(&mut self, node: &Node, state: &State) -> Result<Vec<State>, SciError> {
        self.steps += 1;
        if self.steps > MAX_STEPS {
            return Err(SciError::MatchBudgetExhausted);
        }
        Ok(match node {
            Node::Char(c) => self.consume_if(state, |ch| ch == *c),
            Node::Class(class) => {
                let set = charset::resolve(class);
                self.consume_if(state, |ch| set.contains(ch))
            }
            Node::Anchor(anchor) => {
                if self.anchor_holds(*anchor, state.pos) {
                    vec![state.clone()]
                } else {
                    vec![]
                }
            }
            Node::Backreference(index) => {
                let captured = state.captures.get(*index).copied().flatten();
                let Some((start, end)) = captured else {
                    // An unset group matches the empty string.
                    return Ok(vec![state.clone()]);
                };
                let len = end - start;
                let here = self.text.get(state.pos..state.pos + len);
                if here == Some(&self.text[start..end]) {
                    vec![State {
                        pos: state.pos + len,
                        captures: state.captures.clone(),
                    }]
                } else {
                    vec![]
                }
            }
            Node::Group(group) => self.group_states(group, state)?,
            Node::Repetition(rep) => self.repetition_states(rep.flattened(), state)?,
        })
    }

    fn consume_if(&self, state: &State, pred: impl Fn(char) -> bool) -> Vec<State> {
        match self.text.get(state.pos) {
            Some(&ch) if pred(ch) => vec![State {
                pos: state.pos + 1,
                captures: state.captures.clone(),
            }],
            _ => vec![],
        }
    }

    fn group_states(&mut self, group: &Group, state: &State) -> Result<Vec<State>, SciError> {
        let from = std::slice::from_ref(state);
        Ok(match group.kind {
            GroupKind::Capture(index) => self
                .alternation_states(&group.branches, from)?
                .into_iter()
                .map(|mut end| {
                    if let Some(slot) = end.captures.get_mut(index) {
                        *slot = Some((state.pos, end.pos));
                    }
                    end
                })
                .unique()
                .collect(),
            GroupKind::NonCapture => self.alternation_states(&group.branches, from)?,
            GroupKind::Lookahead | GroupKind::NegativeLookahead => {
                let found = !self.alternation_states(&group.branches, from)?.is_empty();
                if found == (group.kind == GroupKind::Lookahead) {
                    vec![state.clone()]
                } else {
                    vec![]
                }
            }
        })
    }

    /// End states for `min..=max` repetitions, one frontier per repeat count.
    fn repetition_states(
        &mut self,
        rep: &Repetition,
        state: &State,
    ) -> Result<Vec<State>, SciError> {
        let max = rep.max.unwrap_or(self.text.len() + 1);
        let mut ends = Vec::new();
        let mut frontier = vec![state.clone()];
        let mut count = 0usize;

        loop {
            if count >= rep.min {
                ends.extend(frontier.iter().cloned());
            }
            if count >= max || frontier.is_empty() {
                break;
            }
            let mut next = Vec::new();
            for from in &frontier {
                for to in self.node_states(&rep.node, from)? {
                    // zero-width infinite loop guard once the minimum is met
                    if to.pos != from.pos || count < rep.min {
                        next.push(to);
                    }
                }
            }
            frontier = next.into_iter().unique().collect();
            count += 1;
        }
        Ok(ends.into_iter().unique().collect())
    }

    fn anchor_holds(&self, anchor: Anchor, pos: usize) -> bool {
        match anchor {
            Anchor::Start => pos == 0,
            Anchor::End => pos == self.text.len(),
            Anchor::WordBoundary => self.at_word_boundary(pos),
            Anchor::NonWordBoundary => !self.at_word_boundary(pos),
        }
    }

    fn at_word_boundary(&self, pos: usize) -> bool {
        let before = pos > 0 && self.text.get(pos - 1).is_some_and(|&c| is_word(c));
        let after = self.text.get(pos).is_some_and(|&c| is_word(c));
        before != after
    }
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse;

    fn full(pattern: &str, input: &str) -> bool {
        full_match(&parse(pattern).unwrap(), input).unwrap()
    }

    // --- Literals ---

    #[test]
    fn literal_whole_string() {
        assert!(full("OC", "OC"));
        assert!(!full("OC", "O"));
        assert!(!full("OC", "OCC"));
        assert!(!full("OC", "XOC"));
    }

    #[test]
    fn empty_pattern_matches_empty_input() {
        assert!(full("", ""));
        assert!(!full("", "A"));
    }

    // --- Alternation ---

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        assert!(full("S|M", "S"));
        assert!(full("S|M", "M"));
        assert!(!full("S|M", "SM"));
        assert!(!full("S|M", "MS"));
    }

    #[test]
    fn alternation_backtracks_into_later_branch() {
        assert!(full("(A|AB)C", "ABC"));
    }

    // --- Quantifiers ---

    #[test]
    fn star_and_plus() {
        assert!(full("A*", ""));
        assert!(full("A*", "AAAA"));
        assert!(!full("A+", ""));
        assert!(full("A+B", "AAB"));
    }

    #[test]
    fn greedy_then_backtrack() {
        // A* must give back one A for the trailing A
        assert!(full("A*A", "AAA"));
    }

    #[test]
    fn counted_repetition() {
        assert!(full("A{2,3}", "AA"));
        assert!(full("A{2,3}", "AAA"));
        assert!(!full("A{2,3}", "A"));
        assert!(!full("A{2,3}", "AAAA"));
    }

    #[test]
    fn nested_empty_repetition_terminates() {
        assert!(full("(A*)*B", "AAB"));
        assert!(!full("(A*)*B", "AAC"));
    }

    // --- Classes ---

    #[test]
    fn class_membership() {
        assert!(full("[A-C]+", "CAB"));
        assert!(!full("[A-C]+", "CAD"));
        assert!(full("[^A]", "B"));
        assert!(full("\\d\\w", "7x"));
    }

    // --- Groups and backreferences ---

    #[test]
    fn backreference_must_repeat_text() {
        assert!(full("(A|B)C\\1", "ACA"));
        assert!(!full("(A|B)C\\1", "ACB"));
    }

    #[test]
    fn backreference_to_last_iteration() {
        assert!(full("(A|B)+\\1", "ABB"));
        assert!(!full("(A|B)+\\1", "ABA"));
    }

    #[test]
    fn unset_group_reference_is_empty() {
        assert!(full("(?:(A)|B)\\1", "B"));
        assert!(full("(?:(A)|B)\\1", "AA"));
    }

    // --- Lookahead and anchors ---

    #[test]
    fn lookahead() {
        assert!(full("(?=A)[A-Z]", "A"));
        assert!(!full("(?=A)[A-Z]", "B"));
        assert!(full("(?!A)[A-Z]", "B"));
        assert!(!full("(?!A)[A-Z]", "A"));
    }

    #[test]
    fn anchors() {
        assert!(full("^AB$", "AB"));
        assert!(!full("A^B", "AB"));
        assert!(full("A\\BB", "AB"));
        assert!(!full("A\\bB", "AB"));
    }

    // --- Repeated calls ---

    #[test]
    fn calls_are_independent() {
        let tree = parse("(A|B)C").unwrap();
        assert_eq!(full_match(&tree, "AC"), Ok(true));
        assert_eq!(full_match(&tree, "CC"), Ok(false));
        assert_eq!(full_match(&tree, "BC"), Ok(true));
        assert_eq!(full_match(&tree, "AC"), Ok(true));
    }

    // --- Cost ---

    #[test]
    fn stacked_stars_in_group_stay_cheap() {
        let input = format!("{}B", "A".repeat(20));
        assert!(full("(A*A*A*A*A*A*)B", &input));
        assert!(full("(A*A*A*A*A*A*A*A*)B", &input));
        assert!(!full("(A*A*A*A*A*A*A*A*)B", &"A".repeat(20)));
    }

    #[test]
    fn exhausted_budget_is_an_error() {
        let tree = parse("(?:A*)*B").unwrap();
        assert_eq!(
            full_match(&tree, &"A".repeat(3000)),
            Err(SciError::MatchBudgetExhausted)
        );
    }
}
