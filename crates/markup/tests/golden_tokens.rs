//! Fixture-driven end-to-end cases: each entry feeds its chunks in order
//! and compares the trimmed token sequence against the expected lines.

use markup::Lexer;
use markup_test_support::snapshot::{GoldenCase, snapshot_lines};

#[test]
fn golden_cases_match() {
    let cases = GoldenCase::load_all(include_str!("fixtures/golden.json"));
    assert!(!cases.is_empty());
    for case in &cases {
        let mut lexer = Lexer::<String>::new();
        for chunk in &case.chunks {
            lexer.feed(chunk);
        }
        let actual = snapshot_lines(lexer.finish());
        assert_eq!(actual, case.expected_lines(), "case {}", case.name);
    }
}
