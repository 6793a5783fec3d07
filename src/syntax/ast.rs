//! Syntax tree types for regex-syntax patterns.

/// A fully parsed pattern: the root alternation plus the number of
/// capturing groups it declares.
///
/// A pattern like `A|B` has two branches; `AB` has one branch of two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxTree {
    pub branches: Vec<Branch>,
    pub captures: usize,
}

/// A concatenation of nodes.
pub type Branch = Vec<Node>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Group(Group),
    Anchor(Anchor),
    Class(CharClass),
    Repetition(Repetition),
    /// `\N`, with a 1-based capture index.
    Backreference(usize),
    Char(char),
}

/// A parenthesized alternation of one or more branches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Group {
    pub kind: GroupKind,
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// `(...)` with its 1-based index in opening-parenthesis order.
    Capture(usize),
    /// `(?:...)`
    NonCapture,
    /// `(?=...)`
    Lookahead,
    /// `(?!...)`
    NegativeLookahead,
}

impl GroupKind {
    pub fn is_lookahead(self) -> bool {
        matches!(self, GroupKind::Lookahead | GroupKind::NegativeLookahead)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Start,           // ^
    End,             // $
    WordBoundary,    // \b
    NonWordBoundary, // \B
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharClass {
    pub negated: bool,
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassMember {
    Char(char),
    Range(char, char),
    Class(CharClass),
}

/// `node{min,max}`; `max = None` is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repetition {
    pub min: usize,
    pub max: Option<usize>,
    pub node: Box<Node>,
}

impl Repetition {
    /// Collapse `(x{a,b})?` to `x{a,b}`.
    ///
    /// Lazy quantifiers (`*?`, `+?`) are produced as an optional repetition
    /// wrapped around the real one.
    pub fn flattened(&self) -> &Repetition {
        match (self.min, self.max, self.node.as_ref()) {
            (0, Some(1), Node::Repetition(inner)) => inner,
            _ => self,
        }
    }
}
