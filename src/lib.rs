//! Compiler and sequence generator for SCI (Sequence Constraint on the
//! Interactions) patterns.
//!
//! An SCI pattern is a regular expression over capitalized symbol names,
//! with `.` as separator: `O.(S|M).C` accepts `O.S.C` and `O.M.C`. A compiled
//! [`Pattern`] can enumerate the sequences it accepts, enumerate symbol
//! combinations it rejects, and test arbitrary sequences.
//!
//! # Example
//!
//! ```rust
//! use sci::Pattern;
//!
//! let pattern = Pattern::compile("O.(S|M).C").unwrap();
//!
//! assert_eq!(pattern.interaction_symbols(), ["C", "M", "O", "S"]);
//! assert_eq!(pattern.valid_sequences(0).unwrap(), ["O.M.C", "O.S.C"]);
//! assert!(pattern.is_valid_sequence("O.S.C"));
//! assert!(!pattern.is_valid_sequence("O.C"));
//!
//! let invalid = pattern.invalid_sequences(2).unwrap();
//! assert!(invalid.contains(&"C.O".to_string()));
//! ```

pub mod charset;
pub mod codec;
mod count;
mod error;
mod facade;
mod matcher;
mod pattern;
pub mod sequence;
pub mod syntax;


pub use count::Cardinality;
pub use error::SciError;
pub use facade::{is_valid, parse, syntax_error_message};
pub use pattern::{DEFAULT_INVALID_COVERAGE, DEFAULT_VALID_COVERAGE, OPERATORS, Pattern};
pub use syntax::{ParseError, RegexParser, SyntaxParser, SyntaxTree};
