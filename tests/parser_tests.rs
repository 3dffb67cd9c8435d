// tests/parser_tests.rs

use objfilter::ast::{BasicExpression, Expression};
use objfilter::error::ParseErrorKind;
use objfilter::value::Value;
use objfilter::{Parser, parse};
use rstest::rstest;

fn parse_str(query: &str) -> String {
    parse(query).unwrap().to_string()
}

fn parse_err(query: &str) -> ParseErrorKind {
    parse(query).unwrap_err().kind
}

fn single_arg(query: &str) -> Value {
    match parse(query).unwrap() {
        Expression::Basic(BasicExpression { mut args, .. }) => args.remove(0),
        other => panic!("expected basic expression, got {other}"),
    }
}

// ============================================================================
// Empty Queries
// ============================================================================

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\t")]
fn test_empty_query_is_identity(#[case] query: &str) {
    assert_eq!(parse(query).unwrap(), Expression::Identity);
}

// ============================================================================
// Basic Expressions
// ============================================================================

#[test]
fn test_basic_expression() {
    let ast = Parser::new("color is 'grey'").parse().unwrap();
    assert_eq!(
        ast,
        Expression::Basic(BasicExpression::new("color", "is", Value::from("grey")))
    );
}

#[rstest]
#[case("a is 3", Value::Integer(3))]
#[case("a is 0x10", Value::Integer(16))]
#[case("a is 0XfF", Value::Integer(255))]
#[case("a is 2.5", Value::Float(2.5))]
#[case("a is \"x\"", Value::from("x"))]
#[case("a is 'x'", Value::from("x"))]
#[case("a is ''", Value::from(""))]
#[case("a is 0xffffffffffffffff", Value::from(u64::MAX))]
#[case("a is 18446744073709551615", Value::from(u64::MAX))]
#[case("a > 99999999999999999999", Value::Integer(99_999_999_999_999_999_999))]
fn test_literals(#[case] query: &str, #[case] expected: Value) {
    assert_eq!(single_arg(query), expected);
}

#[rstest]
#[case(r#"a is "x\ny""#, "x\ny")]
#[case(r#"a is "tab\there""#, "tab\there")]
#[case(r#"a is "\x41\x42""#, "AB")]
#[case(r#"a is "say \"hi\"""#, "say \"hi\"")]
#[case(r"a is 'back\\slash'", "back\\slash")]
#[case(r#"a regexp "foo\.txt""#, "foo\\.txt")]
#[case(r#"a regexp "\w+\s""#, "\\w+\\s")]
fn test_string_escapes(#[case] query: &str, #[case] expected: &str) {
    assert_eq!(single_arg(query), Value::from(expected));
}

#[test]
fn test_quoted_attribute() {
    let ast = parse(r#""file name" is 1"#).unwrap();
    assert_eq!(
        ast,
        Expression::Basic(BasicExpression::new("file name", "is", Value::from(1)))
    );
}

#[rstest]
#[case("a not is 1")]
#[case("a is not 1")]
#[case("a NOT contains 'x'")]
#[case("a inset not 'abc'")]
fn test_negation(#[case] query: &str) {
    match parse(query).unwrap() {
        Expression::Basic(basic) => assert!(basic.negated),
        other => panic!("expected basic expression, got {other}"),
    }
}

// ============================================================================
// Precedence and Grouping
// ============================================================================

#[rstest]
#[case("a is 1 and b is 2 or c is 3", "((a is 1 and b is 2) or c is 3)")]
#[case("a is 1 or b is 2 and c is 3", "(a is 1 or (b is 2 and c is 3))")]
#[case("a is 1 && b is 2 || c is 3", "((a is 1 && b is 2) || c is 3)")]
#[case("a is 1 and (b is 2 or c is 3)", "(a is 1 and (b is 2 or c is 3))")]
#[case("a is 1 and b is 2 and c is 3", "((a is 1 and b is 2) and c is 3)")]
#[case("((a is 1))", "a is 1")]
#[case("a is 1 AND b is 2", "(a is 1 AND b is 2)")]
#[case("a is 1 and(b is 2)", "(a is 1 and b is 2)")]
#[case("a is 1 and android is 2", "(a is 1 and android is 2)")]
#[case("a is 1 or order is 2", "(a is 1 or order is 2)")]
fn test_precedence(#[case] query: &str, #[case] expected: &str) {
    assert_eq!(parse_str(query), expected);
}

// ============================================================================
// Contexts
// ============================================================================

#[test]
fn test_context() {
    assert_eq!(
        parse_str(r#"@imported_dlls(name is "x" and num_functions is 1)"#),
        r#"@imported_dlls((name is "x" and num_functions is 1))"#
    );
}

#[test]
fn test_context_scopes_only_its_group() {
    assert_eq!(
        parse_str("@a(x is 1) and y is 2"),
        "(@a(x is 1) and y is 2)"
    );
}

#[test]
fn test_nested_context() {
    assert_eq!(
        parse_str("@a(@b(x is 1) or y is 2)"),
        "@a((@b(x is 1) or y is 2))"
    );
}

// ============================================================================
// Errors
// ============================================================================

#[rstest]
#[case("(a is 1", ParseErrorKind::IllegalExpression)]
#[case("a is 1)", ParseErrorKind::IllegalExpression)]
#[case("a is 1 and", ParseErrorKind::IllegalExpression)]
#[case("a is 1 android is 2", ParseErrorKind::IllegalExpression)]
#[case("a is 1 order is 2", ParseErrorKind::IllegalExpression)]
#[case("a is", ParseErrorKind::PrematureEnd)]
#[case("a", ParseErrorKind::PrematureEnd)]
#[case("a is 1))", ParseErrorKind::StateUnderflow)]
#[case("a not not is 1", ParseErrorKind::RepeatedNot)]
#[case("size not > 5", ParseErrorKind::NotUnsupported(">".to_string()))]
#[case("size < not 5", ParseErrorKind::NotUnsupported("<".to_string()))]
#[case(r#"a is "\q""#, ParseErrorKind::InvalidEscape(r"\q".to_string()))]
#[case(r#"a is "\xzz""#, ParseErrorKind::InvalidHexEscape(r"\xzz".to_string()))]
#[case(r#"a is "\xff""#, ParseErrorKind::InvalidHexEscape(r"\xff".to_string()))]
fn test_parse_errors(#[case] query: &str, #[case] expected: ParseErrorKind) {
    assert_eq!(parse_err(query), expected);
}

#[test]
fn test_lexical_error_is_flagged() {
    let error = parse("a is ?").unwrap_err();
    assert!(error.is_lexical());
    assert_eq!(
        error.to_string(),
        "expected ARG at position 5: a is  <----> ?"
    );
}

#[test]
fn test_error_reports_consumed_input() {
    let error = parse("a is").unwrap_err();
    assert!(!error.is_lexical());
    assert_eq!(error.position, 4);
    assert_eq!(error.processed, "a is");
    assert_eq!(error.remaining, "");
}
