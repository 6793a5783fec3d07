//! Size of the language a syntax tree denotes.

use itertools::Itertools;

use crate::charset;
use crate::error::SciError;
use crate::syntax::ast::{Branch, GroupKind, Node, SyntaxTree};

/// How many sequences a pattern produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Finite(u128),
    Infinite,
}

impl Cardinality {
    fn add(self, other: Cardinality) -> Cardinality {
        match (self, other) {
            (Cardinality::Finite(a), Cardinality::Finite(b)) => a
                .checked_add(b)
                .map_or(Cardinality::Infinite, Cardinality::Finite),
            _ => Cardinality::Infinite,
        }
    }

    fn mul(self, other: Cardinality) -> Cardinality {
        match (self, other) {
            (Cardinality::Finite(0), _) | (_, Cardinality::Finite(0)) => Cardinality::Finite(0),
            (Cardinality::Finite(a), Cardinality::Finite(b)) => a
                .checked_mul(b)
                .map_or(Cardinality::Infinite, Cardinality::Finite),
            _ => Cardinality::Infinite,
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cardinality::Finite(n) => write!(f, "{n}"),
            Cardinality::Infinite => write!(f, "infinite"),
        }
    }
}

/// Count the sequences the generator would produce for `tree` with no cap
/// on unbounded repetition.
///
/// Alternatives are counted with multiplicity: `(A|AB)B?` counts four even
/// though it only denotes three distinct strings.
pub fn language_size(tree: &SyntaxTree) -> Result<Cardinality, SciError> {
    let mut counter = Counter {
        captured: vec![false; tree.captures + 1],
    };
    counter.branches(&tree.branches)
}

struct Counter {
    captured: Vec<bool>,
}

impl Counter {
    fn branches(&mut self, branches: &[Branch]) -> Result<Cardinality, SciError> {
        let distinct = branches
            .iter()
            .map(|branch| {
                branch
                    .iter()
                    .filter(|n| !matches!(n, Node::Group(g) if g.kind.is_lookahead()))
                    .collect::<Vec<_>>()
            })
            .unique()
            .collect::<Vec<_>>();
        let mut total = Cardinality::Finite(0);
        for nodes in distinct {
            let mut product = Cardinality::Finite(1);
            for node in nodes {
                product = product.mul(self.node(node)?);
            }
            total = total.add(product);
        }
        Ok(total)
    }

    fn node(&mut self, node: &Node) -> Result<Cardinality, SciError> {
        Ok(match node {
            Node::Group(group) => {
                let count = self.branches(&group.branches)?;
                if let GroupKind::Capture(index) = group.kind
                    && let Some(slot) = self.captured.get_mut(index)
                {
                    *slot = true;
                }
                count
            }
            Node::Anchor(_) | Node::Char(_) => Cardinality::Finite(1),
            Node::Class(class) => Cardinality::Finite(charset::resolve(class).len() as u128),
            Node::Backreference(index) => {
                if !self.captured.get(*index).copied().unwrap_or(false) {
                    return Err(SciError::DanglingBackreference(*index));
                }
                Cardinality::Finite(1)
            }
            Node::Repetition(rep) => {
                let rep = rep.flattened();
                let child = self.node(&rep.node)?;
                match (child, rep.max) {
                    // Only the empty repeat is possible.
                    (Cardinality::Finite(0), _) if rep.min == 0 => Cardinality::Finite(1),
                    (Cardinality::Finite(0), _) => Cardinality::Finite(0),
                    (_, None) | (Cardinality::Infinite, _) => Cardinality::Infinite,
                    (Cardinality::Finite(c), Some(max)) => repeat_sum(c, rep.min, max),
                }
            }
        })
    }
}

/// `c^min + c^(min+1) + ... + c^max`, or `Infinite` on overflow.
///
/// For `c >= 2` the powers overflow within 128 steps, so the loop never runs
/// longer than that whatever `max` is.
fn repeat_sum(c: u128, min: usize, max: usize) -> Cardinality {
    if min > max {
        return Cardinality::Finite(0);
    }
    match c {
        0 => return Cardinality::Finite(u128::from(min == 0)),
        1 => return Cardinality::Finite((max - min) as u128 + 1),
        _ => {}
    }
    let mut total = Cardinality::Finite(0);
    let mut power = Cardinality::Finite(1);
    for k in 0..=max {
        if power == Cardinality::Infinite {
            // c^k overflowed and some term at or beyond k is still in range.
            return Cardinality::Infinite;
        }
        if k >= min {
            total = total.add(power);
        }
        power = power.mul(Cardinality::Finite(c));
    }
    total
}
