//! Regex-syntax front end.
//!
//! The sequence generator and the membership matcher only ever see a
//! [`SyntaxTree`]. Turning text into that tree is the job of a
//! [`SyntaxParser`]; [`RegexParser`] is the bundled implementation.
//!
//! # Supported syntax
//!
//! | Token              | Meaning                                  |
//! |--------------------|------------------------------------------|
//! | `x`                | Literal character                        |
//! | `.`                | Any character except line terminators    |
//! | `[…]`, `[^…]`      | Character class, with `a-z` ranges       |
//! | `\d \w \s`         | Digit, word, space (upper case negates)  |
//! | `(…)`              | Capturing group                          |
//! | `(?:…)`            | Non-capturing group                      |
//! | `(?=…)`, `(?!…)`   | Lookahead, negative lookahead            |
//! | `X\|Y`             | Alternation                              |
//! | `* + ?`            | Zero or more, one or more, optional      |
//! | `{n} {n,} {n,m}`   | Counted repetition                       |
//! | `^ $ \b \B`        | Anchors                                  |
//! | `\1`…              | Backreference                            |

pub mod ast;
pub mod parser;

pub use ast::SyntaxTree;
pub use parser::{ParseError, ParseErrorKind};

/// Something that turns a regex-syntax string into a [`SyntaxTree`].
pub trait SyntaxParser {
    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError>;
}

/// The bundled recursive descent parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexParser;

impl SyntaxParser for RegexParser {
    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
        parser::parse(source)
    }
}
