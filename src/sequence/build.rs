//! Conversion of a [`SyntaxTree`] into an iterator arena.

use itertools::Itertools;

use crate::charset;
use crate::error::SciError;
use crate::syntax::ast::{Branch, Group, GroupKind, Node, SyntaxTree};

use super::{IterId, Kernel, Sequences};

/// Build the sequence iterator for `tree`.
///
/// `cap` bounds unbounded repetitions: `x{n,}` repeats at most `n + cap` times.
pub fn build(tree: &SyntaxTree, cap: usize) -> Result<Sequences, SciError> {
    let mut builder = Builder {
        kernel: Kernel::default(),
        captures: vec![None; tree.captures + 1],
        cap,
    };
    let root = builder.convert_branches(&tree.branches)?;
    Ok(Sequences::new(builder.kernel, root))
}

struct Builder {
    kernel: Kernel,
    /// Iterator recorded for each capture index, once its group is converted.
    captures: Vec<Option<IterId>>,
    cap: usize,
}

impl Builder {
    /// Convert an alternation. Lookahead groups are dropped from every branch
    /// and identical branches are kept once.
    fn convert_branches(&mut self, branches: &[Branch]) -> Result<IterId, SciError> {
        let first = self.kernel.next_id();
        let mut stacks = branches
            .iter()
            .map(|branch| {
                branch
                    .iter()
                    .filter(|node| !is_lookahead(node))
                    .collect::<Vec<_>>()
            })
            .unique()
            .map(|nodes| self.convert_stack(&nodes))
            .collect::<Result<Vec<_>, _>>()?;
        if stacks.len() == 1 {
            return Ok(stacks.remove(0));
        }
        Ok(self.kernel.option(stacks, first))
    }

    fn convert_stack(&mut self, nodes: &[&Node]) -> Result<IterId, SciError> {
        let first = self.kernel.next_id();
        let parts = nodes
            .iter()
            .map(|node| self.convert_node(node))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.kernel.stack(parts, first))
    }

    fn convert_node(&mut self, node: &Node) -> Result<IterId, SciError> {
        match node {
            Node::Group(Group { kind, branches }) => {
                let id = self.convert_branches(branches)?;
                if let GroupKind::Capture(index) = kind
                    && let Some(slot) = self.captures.get_mut(*index)
                {
                    *slot = Some(id);
                }
                Ok(id)
            }
            Node::Anchor(_) => Ok(self.kernel.literal(vec![String::new()])),
            Node::Class(class) => {
                let values = charset::resolve(class).iter().map(String::from).collect();
                Ok(self.kernel.literal(values))
            }
            Node::Repetition(rep) => {
                let rep = rep.flattened();
                let first = self.kernel.next_id();
                let child = self.convert_node(&rep.node)?;
                let max = rep.max.unwrap_or_else(|| rep.min.saturating_add(self.cap));
                Ok(self.kernel.repetition(child, rep.min, max, first))
            }
            Node::Backreference(index) => {
                let target = self
                    .captures
                    .get(*index)
                    .copied()
                    .flatten()
                    .ok_or(SciError::DanglingBackreference(*index))?;
                Ok(self.kernel.reference(target))
            }
            Node::Char(c) => Ok(self.kernel.literal(vec![c.to_string()])),
        }
    }
}

fn is_lookahead(node: &Node) -> bool {
    matches!(node, Node::Group(group) if group.kind.is_lookahead())
}
