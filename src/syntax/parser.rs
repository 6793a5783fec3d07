//! Recursive descent parser for regex-syntax pattern strings.

use std::iter::Peekable;
use std::str::Chars;

use phf::{Map, phf_map};

use super::ast::*;

/// Why a pattern failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnterminatedGroup,
    UnmatchedParen,
    NothingToRepeat,
    UnterminatedClass,
    TrailingBackslash,
    InvalidGroup,
    QuantifierOutOfOrder,
    RangeOutOfOrder,
    TooDeep,
    /// Reported by parsers other than the bundled one.
    Other(String),
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedGroup => write!(f, "Unterminated group"),
            Self::UnmatchedParen => write!(f, "Unmatched ')'"),
            Self::NothingToRepeat => write!(f, "Nothing to repeat"),
            Self::UnterminatedClass => write!(f, "Unterminated character class"),
            Self::TrailingBackslash => write!(f, "\\ at end of pattern"),
            Self::InvalidGroup => write!(f, "Invalid group"),
            Self::QuantifierOutOfOrder => write!(f, "numbers out of order in {{}} quantifier"),
            Self::RangeOutOfOrder => write!(f, "Range out of order in character class"),
            Self::TooDeep => write!(f, "Groups nested too deeply"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

/// A pattern that could not be turned into a [`SyntaxTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub pattern: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(pattern: &str, kind: ParseErrorKind) -> Self {
        Self {
            pattern: pattern.to_string(),
            kind,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid regular expression: /{}/: {}",
            self.pattern, self.kind
        )
    }
}

impl std::error::Error for ParseError {}

const DIGIT: &[(char, char)] = &[('0', '9')];
const WORD: &[(char, char)] = &[('0', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')];
const SPACE: &[(char, char)] = &[
    ('\t', '\r'),
    (' ', ' '),
    ('\u{a0}', '\u{a0}'),
    ('\u{1680}', '\u{1680}'),
    ('\u{2000}', '\u{200a}'),
    ('\u{2028}', '\u{2029}'),
    ('\u{202f}', '\u{202f}'),
    ('\u{205f}', '\u{205f}'),
    ('\u{3000}', '\u{3000}'),
    ('\u{feff}', '\u{feff}'),
];

/// Shorthand class escapes: letter → (negated, ranges).
static CLASS_ESCAPES: Map<char, (bool, &'static [(char, char)])> = phf_map! {
    'd' => (false, DIGIT),
    'D' => (true, DIGIT),
    'w' => (false, WORD),
    'W' => (true, WORD),
    's' => (false, SPACE),
    'S' => (true, SPACE),
};

/// Deepest group nesting accepted. Every later pass over the tree recurses
/// once per level.
const MAX_DEPTH: usize = 128;

/// Parse a regex-syntax string into a [`SyntaxTree`].
pub fn parse(input: &str) -> Result<SyntaxTree, ParseError> {
    let mut parser = Parser {
        chars: input.chars().peekable(),
        captures: 0,
        depth: 0,
    };
    parser
        .parse_root()
        .map_err(|kind| ParseError::new(input, kind))
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    captures: usize,
    /// Groups currently open.
    depth: usize,
}

impl Parser<'_> {
    fn parse_root(&mut self) -> Result<SyntaxTree, ParseErrorKind> {
        let branches = self.parse_alternation()?;
        if self.chars.peek().is_some() {
            // parse_alternation only stops early at ')'
            return Err(ParseErrorKind::UnmatchedParen);
        }
        Ok(SyntaxTree {
            branches,
            captures: self.captures,
        })
    }

    fn parse_alternation(&mut self) -> Result<Vec<Branch>, ParseErrorKind> {
        let mut branches = Vec::new();
        loop {
            branches.push(self.parse_branch()?);
            if self.chars.peek() == Some(&'|') {
                self.chars.next();
            } else {
                break;
            }
        }
        Ok(branches)
    }

    /// Parse nodes up to `|`, `)` or end of input.
    fn parse_branch(&mut self) -> Result<Branch, ParseErrorKind> {
        let mut nodes = Vec::new();
        let mut last = Quantified::No;
        loop {
            match self.chars.peek() {
                None | Some('|') | Some(')') => break,
                Some('*') | Some('+') | Some('?') => {
                    let (min, max) = match self.chars.next() {
                        Some('*') => (0, None),
                        Some('+') => (1, None),
                        _ => (0, Some(1)),
                    };
                    last = last.then(max == Some(1) && min == 0)?;
                    Self::repeat_last(&mut nodes, min, max)?;
                }
                Some('{') => match self.try_parse_braces()? {
                    Some((min, max)) => {
                        last = last.then(false)?;
                        Self::repeat_last(&mut nodes, min, max)?;
                    }
                    None => {
                        self.chars.next();
                        nodes.push(Node::Char('{'));
                        last = Quantified::No;
                    }
                },
                Some(_) => {
                    let node = self.parse_atom()?;
                    nodes.push(node);
                    last = Quantified::No;
                }
            }
        }
        Ok(nodes)
    }

    /// Wrap the last node of `nodes` in a repetition.
    ///
    /// A `?` directly after another quantifier makes it lazy and wraps the
    /// previous repetition, so `A*?` becomes `(A*){0,1}`.
    fn repeat_last(
        nodes: &mut Branch,
        min: usize,
        max: Option<usize>,
    ) -> Result<(), ParseErrorKind> {
        match nodes.pop() {
            None | Some(Node::Anchor(_)) => Err(ParseErrorKind::NothingToRepeat),
            Some(node) => {
                nodes.push(Node::Repetition(Repetition {
                    min,
                    max,
                    node: Box::new(node),
                }));
                Ok(())
            }
        }
    }

    /// Try to read `{n}`, `{n,}` or `{n,m}`. On anything else the input is
    /// left untouched and `None` is returned so `{` reads as a literal.
    fn try_parse_braces(&mut self) -> Result<Option<(usize, Option<usize>)>, ParseErrorKind> {
        let mut ahead = self.chars.clone();
        ahead.next(); // '{'
        let Some(min) = parse_number(&mut ahead) else {
            return Ok(None);
        };
        let max = match ahead.next() {
            Some('}') => Some(min),
            Some(',') => {
                if ahead.peek() == Some(&'}') {
                    ahead.next();
                    None
                } else {
                    let Some(max) = parse_number(&mut ahead) else {
                        return Ok(None);
                    };
                    if ahead.next() != Some('}') {
                        return Ok(None);
                    }
                    Some(max)
                }
            }
            _ => return Ok(None),
        };
        if max.is_some_and(|max| max < min) {
            return Err(ParseErrorKind::QuantifierOutOfOrder);
        }
        self.chars = ahead;
        Ok(Some((min, max)))
    }

    fn parse_atom(&mut self) -> Result<Node, ParseErrorKind> {
        match self.chars.next() {
            Some('(') => self.parse_group(),
            Some('[') => self.parse_class().map(Node::Class),
            Some('.') => Ok(Node::Class(CharClass {
                negated: true,
                members: ['\n', '\r', '\u{2028}', '\u{2029}']
                    .into_iter()
                    .map(ClassMember::Char)
                    .collect(),
            })),
            Some('^') => Ok(Node::Anchor(Anchor::Start)),
            Some('$') => Ok(Node::Anchor(Anchor::End)),
            Some('\\') => self.parse_escape(),
            Some(c) => Ok(Node::Char(c)),
            None => Err(ParseErrorKind::NothingToRepeat),
        }
    }

    /// Parse a group body (the opening `(` has already been consumed).
    fn parse_group(&mut self) -> Result<Node, ParseErrorKind> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseErrorKind::TooDeep);
        }
        let kind = if self.chars.peek() == Some(&'?') {
            self.chars.next();
            match self.chars.next() {
                Some(':') => GroupKind::NonCapture,
                Some('=') => GroupKind::Lookahead,
                Some('!') => GroupKind::NegativeLookahead,
                _ => return Err(ParseErrorKind::InvalidGroup),
            }
        } else {
            // Numbered at the opening parenthesis, before any nested group.
            self.captures += 1;
            GroupKind::Capture(self.captures)
        };
        self.depth += 1;
        let branches = self.parse_alternation()?;
        self.depth -= 1;
        match self.chars.next() {
            Some(')') => Ok(Node::Group(Group { kind, branches })),
            _ => Err(ParseErrorKind::UnterminatedGroup),
        }
    }

    /// Parse an escape outside a class (the `\` has already been consumed).
    fn parse_escape(&mut self) -> Result<Node, ParseErrorKind> {
        match self.chars.peek().copied() {
            None => Err(ParseErrorKind::TrailingBackslash),
            Some('b') => {
                self.chars.next();
                Ok(Node::Anchor(Anchor::WordBoundary))
            }
            Some('B') => {
                self.chars.next();
                Ok(Node::Anchor(Anchor::NonWordBoundary))
            }
            Some(c) if ('1'..='9').contains(&c) => {
                let index = parse_number(&mut self.chars).unwrap_or(usize::MAX);
                Ok(Node::Backreference(index))
            }
            Some(_) => Ok(match self.parse_escaped_member()? {
                ClassMember::Class(class) => Node::Class(class),
                ClassMember::Char(c) => Node::Char(c),
                ClassMember::Range(lo, _) => Node::Char(lo),
            }),
        }
    }

    /// Parse the escape body shared by classes and plain atoms.
    fn parse_escaped_member(&mut self) -> Result<ClassMember, ParseErrorKind> {
        let c = self.chars.next().ok_or(ParseErrorKind::TrailingBackslash)?;
        if let Some((negated, ranges)) = CLASS_ESCAPES.get(&c) {
            return Ok(ClassMember::Class(CharClass {
                negated: *negated,
                members: ranges
                    .iter()
                    .map(|&(lo, hi)| {
                        if lo == hi {
                            ClassMember::Char(lo)
                        } else {
                            ClassMember::Range(lo, hi)
                        }
                    })
                    .collect(),
            }));
        }
        let ch = match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'f' => '\x0c',
            'v' => '\x0b',
            '0' => '\0',
            'x' => self.parse_hex(2).unwrap_or('x'),
            'u' => self.parse_hex(4).unwrap_or('u'),
            other => other,
        };
        Ok(ClassMember::Char(ch))
    }

    /// Read exactly `digits` hex digits as a code point; consumes nothing on failure.
    fn parse_hex(&mut self, digits: usize) -> Option<char> {
        let mut ahead = self.chars.clone();
        let mut value = 0u32;
        for _ in 0..digits {
            value = value * 16 + ahead.next()?.to_digit(16)?;
        }
        let ch = char::from_u32(value)?;
        self.chars = ahead;
        Some(ch)
    }

    /// Parse a bracketed class (the opening `[` has already been consumed).
    fn parse_class(&mut self) -> Result<CharClass, ParseErrorKind> {
        let negated = self.chars.peek() == Some(&'^');
        if negated {
            self.chars.next();
        }
        let mut members = Vec::new();
        loop {
            let member = match self.chars.next() {
                None => return Err(ParseErrorKind::UnterminatedClass),
                Some(']') => break,
                Some('\\') => self.parse_class_escape()?,
                Some(c) => ClassMember::Char(c),
            };
            let ClassMember::Char(lo) = member else {
                members.push(member);
                continue;
            };
            if !self.at_range_dash() {
                members.push(member);
                continue;
            }
            self.chars.next(); // '-'
            let hi = match self.chars.next() {
                Some('\\') => self.parse_class_escape()?,
                Some(c) => ClassMember::Char(c),
                None => return Err(ParseErrorKind::UnterminatedClass),
            };
            match hi {
                ClassMember::Char(hi) if hi < lo => return Err(ParseErrorKind::RangeOutOfOrder),
                ClassMember::Char(hi) => members.push(ClassMember::Range(lo, hi)),
                other => {
                    // `[a-\d]`: the dash is literal.
                    members.push(ClassMember::Char(lo));
                    members.push(ClassMember::Char('-'));
                    members.push(other);
                }
            }
        }
        Ok(CharClass { negated, members })
    }

    fn parse_class_escape(&mut self) -> Result<ClassMember, ParseErrorKind> {
        match self.chars.peek() {
            Some('b') => {
                self.chars.next();
                Ok(ClassMember::Char('\x08'))
            }
            _ => self.parse_escaped_member(),
        }
    }

    /// True when the next two chars are `-` followed by something other than `]`.
    fn at_range_dash(&mut self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next() == Some('-') && !matches!(ahead.next(), None | Some(']'))
    }
}

/// What the last node of a branch has been quantified with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantified {
    No,
    Greedy,
    Lazy,
}

impl Quantified {
    /// State after one more quantifier; only a `?` may follow a greedy one.
    fn then(self, question_mark: bool) -> Result<Quantified, ParseErrorKind> {
        match (self, question_mark) {
            (Quantified::No, _) => Ok(Quantified::Greedy),
            (Quantified::Greedy, true) => Ok(Quantified::Lazy),
            _ => Err(ParseErrorKind::NothingToRepeat),
        }
    }
}

fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut s = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            s.push(c);
            chars.next();
        } else {
            break;
        }
    }
    s.parse::<usize>().ok()
}
