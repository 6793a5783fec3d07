use super::*;
use crate::syntax::ParseError;
use crate::syntax::ast::{Node, SyntaxTree};

fn compile(source: &str) -> Pattern {
    Pattern::compile(source).expect("pattern should compile")
}

fn valid(source: &str, n: usize) -> Vec<String> {
    compile(source).valid_sequences(n).unwrap()
}

fn invalid(source: &str, n: usize) -> Vec<String> {
    compile(source).invalid_sequences(n).unwrap()
}

// --- Construction ---

#[test]
fn test_lookbehind_is_rejected() {
    assert_eq!(
        Pattern::compile("(?<=O).C"),
        Err(SciError::UnsupportedSyntax)
    );
    assert_eq!(
        Pattern::compile("O.(?<!C)S"),
        Err(SciError::UnsupportedSyntax)
    );
}

#[test]
fn test_unterminated_group_message() {
    let err = Pattern::compile("A(").unwrap_err();
    assert!(matches!(err, SciError::MalformedPattern(_)));
    assert!(err.to_string().contains("Unterminated group"), "{err}");
}

#[test]
fn test_parser_message_is_verbatim() {
    let err = Pattern::compile("O.C)").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid regular expression: /OC)/: Unmatched ')'"
    );
}

#[test]
fn test_source_is_kept() {
    assert_eq!(compile("O.(S|M).C").source(), "O.(S|M).C");
}

#[test]
fn test_custom_parser() {
    struct Fixed;
    impl SyntaxParser for Fixed {
        fn parse(&self, _source: &str) -> Result<SyntaxTree, ParseError> {
            Ok(SyntaxTree {
                branches: vec![vec![Node::Char('X'), Node::Char('Y')]],
                captures: 0,
            })
        }
    }
    let pattern = Pattern::compile_with("Anything", &Fixed).unwrap();
    assert_eq!(pattern.valid_sequences(0).unwrap(), vec!["X.Y"]);
    assert!(pattern.is_valid_sequence("XY"));
}

#[test]
fn test_custom_parser_error_is_propagated() {
    struct Failing;
    impl SyntaxParser for Failing {
        fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
            Err(ParseError::new(
                source,
                crate::syntax::ParseErrorKind::Other("nope".to_string()),
            ))
        }
    }
    let err = Pattern::compile_with("A", &Failing).unwrap_err();
    assert_eq!(err.to_string(), "Invalid regular expression: /A/: nope");
}

// --- Symbols ---

#[test]
fn test_symbols_are_sorted_and_distinct() {
    assert_eq!(
        compile("Op.(Sel|Mov).Clo").interaction_symbols(),
        ["Clo", "Mov", "Op", "Sel"]
    );
    assert_eq!(compile("A.B.A|B").interaction_symbols(), ["A", "B"]);
}

#[test]
fn test_symbols_ignore_operator_placement() {
    assert_eq!(
        compile("(A.B)*").interaction_symbols(),
        compile("B|A+").interaction_symbols()
    );
}

#[test]
fn test_no_symbols() {
    assert!(compile("()").interaction_symbols().is_empty());
}

// --- Valid sequences ---

#[test]
fn test_valid_concatenation() {
    assert_eq!(valid("O.C", 0), ["O.C"]);
}

#[test]
fn test_valid_alternation_is_canonical() {
    assert_eq!(valid("S|M", 0), ["M", "S"]);
    assert_eq!(valid("Select|Move", 0), ["Move", "Select"]);
}

#[test]
fn test_valid_grouped_alternation() {
    assert_eq!(valid("O.(S|M).C", 0), ["O.M.C", "O.S.C"]);
    assert_eq!(valid("Op.(Sel|Mov).Clo", 0), ["Op.Mov.Clo", "Op.Sel.Clo"]);
}

#[test]
fn test_valid_multi_letter_symbols() {
    assert_eq!(valid("Open.Close", 0), ["Open.Close"]);
}

#[test]
fn test_valid_coverage_extends_repetition() {
    assert_eq!(valid("O.C*", 0), ["O"]);
    assert_eq!(valid("O.C*", 2), ["O", "O.C", "O.C.C"]);
    assert_eq!(
        valid("O.(S|M)+.C", 1),
        ["O.M.C", "O.S.C", "O.M.M.C", "O.M.S.C", "O.S.M.C", "O.S.S.C"]
    );
}

#[test]
fn test_valid_lengths_stay_within_coverage() {
    // shortest is one symbol, longer alternatives need coverage
    assert_eq!(valid("A|B.C.D", 0), ["A"]);
    assert_eq!(valid("A|B.C.D", 2), ["A", "B.C.D"]);
}

#[test]
fn test_valid_is_idempotent() {
    let pattern = compile("O.(S|M)*.C");
    assert_eq!(pattern.valid_sequences(2), pattern.valid_sequences(2));
}

#[test]
fn test_valid_skips_lookahead_rejects() {
    // lookaheads generate nothing but still constrain membership
    assert_eq!(valid("(?!A)(A|B)", 0), ["B"]);
}

#[test]
fn test_valid_shortest_is_shortest_accepted() {
    // `A` is generated but rejected, so the window starts at two symbols
    assert_eq!(valid("(?!A)A|B.C", 0), ["B.C"]);
    assert_eq!(valid("(?!A)A|B.C", 1), ["B.C"]);
}

#[test]
fn test_valid_backreference() {
    assert_eq!(valid("(S|M).C.\\1", 0), ["M.C.M", "S.C.S"]);
}

#[test]
fn test_valid_dangling_backreference_fails() {
    assert_eq!(
        compile("(S).\\2").valid_sequences(0),
        Err(SciError::DanglingBackreference(2))
    );
}

#[test]
fn test_valid_empty_language() {
    assert!(valid("A[^ -~]", 3).is_empty());
}

#[test]
fn test_valid_empty_sequence() {
    assert_eq!(valid("A*", 0), [""]);
    assert_eq!(valid("A*", 1), ["", "A"]);
}

// --- Invalid sequences ---

#[test]
fn test_invalid_concatenation() {
    assert_eq!(invalid("O.C", 2), ["C", "O", "C.C", "C.O", "O.O"]);
}

#[test]
fn test_invalid_default_coverage() {
    assert_eq!(invalid("O.C", DEFAULT_INVALID_COVERAGE), ["C", "O"]);
}

#[test]
fn test_invalid_all_accepted() {
    assert!(invalid("S|M", 1).is_empty());
}

#[test]
fn test_invalid_multi_letter_symbols() {
    let out = invalid("Open.Close", 2);
    assert!(out.contains(&"Close.Open".to_string()));
    assert!(!out.contains(&"Open.Close".to_string()));
    assert_eq!(
        out,
        ["Close", "Open", "Close.Close", "Close.Open", "Open.Open"]
    );
}

#[test]
fn test_invalid_zero_coverage() {
    assert!(invalid("O.C", 0).is_empty());
}

#[test]
fn test_invalid_grouped_alternation() {
    let out = invalid("O.(S|M).C", 3);
    assert!(!out.contains(&"O.S.C".to_string()));
    assert!(!out.contains(&"O.M.C".to_string()));
    assert!(out.contains(&"C.S.O".to_string()));
    assert_eq!(out.len(), 4 + 16 + 64 - 2);
}

#[test]
fn test_invalid_never_contains_accepted_sequences() {
    let pattern = compile("(A*A*A*A*A*A*A*A*)B");
    let out = pattern.invalid_sequences(12).unwrap();
    assert!(!out.contains(&"A.A.A.A.A.A.A.A.A.A.A.B".to_string()));
    assert!(out.contains(&"B.A".to_string()));
    for sequence in &out {
        assert_eq!(pattern.check_sequence(sequence), Ok(false), "{sequence}");
    }
}

// --- Membership ---

#[test]
fn test_membership_with_and_without_separators() {
    let pattern = compile("O.(S|M).C");
    assert!(pattern.is_valid_sequence("O.S.C"));
    assert!(pattern.is_valid_sequence("OSC"));
    assert!(pattern.is_valid_sequence("O.SC"));
    assert!(!pattern.is_valid_sequence("O.C"));
    assert!(!pattern.is_valid_sequence("O.S.C.C"));
}

#[test]
fn test_membership_with_stacked_stars() {
    let pattern = compile("(A*A*A*A*A*A*)B");
    let sequence = format!("{}B", "A.".repeat(20));
    assert!(pattern.is_valid_sequence(&sequence));
    assert_eq!(pattern.check_sequence(&sequence), Ok(true));
}

#[test]
fn test_membership_budget_is_reported() {
    let pattern = compile("(A*)*B");
    let sequence = "A".repeat(3000);
    assert_eq!(
        pattern.check_sequence(&sequence),
        Err(SciError::MatchBudgetExhausted)
    );
    assert!(!pattern.is_valid_sequence(&sequence));
}

#[test]
fn test_membership_is_anchored() {
    let pattern = compile("S|M");
    assert!(pattern.is_valid_sequence("S"));
    assert!(!pattern.is_valid_sequence("S.M"));
    assert!(!pattern.is_valid_sequence("M.S"));
}

#[test]
fn test_membership_order_independent() {
    let pattern = compile("Open.Close");
    let inputs = ["Open.Close", "Close.Open", "Open.Close", "Open", "Open.Close"];
    let first: Vec<bool> = inputs
        .iter()
        .map(|s| pattern.is_valid_sequence(s))
        .collect();
    let second: Vec<bool> = inputs
        .iter()
        .rev()
        .map(|s| pattern.is_valid_sequence(s))
        .collect();
    assert_eq!(first, [true, false, true, false, true]);
    assert_eq!(first.into_iter().rev().collect::<Vec<_>>(), second);
}

// --- Lazy stream and size ---

#[test]
fn test_sequences_stream() {
    let mut seq = compile("O.(S|M).C").sequences(0).unwrap();
    assert_eq!(seq.next().as_deref(), Some("O.S.C"));
    assert_eq!(seq.next().as_deref(), Some("O.M.C"));
    assert_eq!(seq.next(), None);
}

#[test]
fn test_language_size() {
    assert_eq!(
        compile("O.(S|M).C").language_size(),
        Ok(Cardinality::Finite(2))
    );
    assert_eq!(compile("O.C+").language_size(), Ok(Cardinality::Infinite));
}
