//! Tests of error selection and rendering across whole parses.

use descent::parser::{self, ParserRef};
use descent::scan;
use descent::ErrorDetails;

#[test]
fn furthest_failure_wins_across_alternatives() {
    // The first branch gets two characters in before dying; the second
    // branch dies after one. The report points past `ab`.
    let abc = scan::string("a").then(&scan::string("b")).then(&scan::string("c"));
    let ax = scan::string("a").then(&scan::string("x"));
    let err = abc.or(&ax).parse("ab").unwrap_err();
    assert_eq!(err.offset, 2);
    assert_eq!(err.details, ErrorDetails::Expected(vec!["c".to_owned()]));
    assert_eq!(err.to_string(), "line 1, column 3:\nc expected, EOF encountered.");
}

#[test]
fn same_position_expectations_merge() {
    let p = parser::or(vec![
        scan::integer().map(|_| ()),
        scan::is_char('('),
        scan::is_char('-'),
    ]);
    let err = p.parse(";").unwrap_err();
    assert_eq!(
        err.details,
        ErrorDetails::Expected(vec!["integer".to_owned(), "(".to_owned(), "-".to_owned()])
    );
    assert_eq!(
        err.to_string(),
        "line 1, column 1:\ninteger, ( or - expected, ; encountered."
    );
}

#[test]
fn duplicate_expectations_render_once() {
    let p = parser::or(vec![
        scan::is_char('a').then(&scan::is_char('!')),
        scan::is_char('a').then(&scan::is_char('?')),
        scan::is_char('b'),
    ]);
    let err = p.parse("c").unwrap_err();
    assert_eq!(
        err.details,
        ErrorDetails::Expected(vec!["a".to_owned(), "b".to_owned()])
    );
}

#[test]
fn line_and_column_are_one_based() {
    let line = scan::identifier().followed_by(&scan::is_char('\n'));
    let err = line.many().parse("foo\nbar\n12\n").unwrap_err();
    assert_eq!(err.location.line, 3);
    assert_eq!(err.location.column, 1);
    assert_eq!(err.offset, 8);
}

#[test]
fn label_names_the_failed_production() {
    let number = scan::integer().label("number");
    let err = number.parse("x").unwrap_err();
    assert_eq!(err.details, ErrorDetails::Expected(vec!["number".to_owned()]));
}

#[test]
fn label_keeps_a_deeper_failure() {
    // The body consumed input before failing, so the label must not mask
    // the real error with its own name.
    let pair = scan::is_char('a').then(&scan::is_char('b')).label("pair");
    let err = pair.parse("ax").unwrap_err();
    assert_eq!(err.offset, 1);
    assert_eq!(err.details, ErrorDetails::Expected(vec!["b".to_owned()]));
}

#[test]
fn explicit_failure_is_reported_verbatim() {
    let p = scan::identifier().then(&parser::fail::<()>("reserved words cannot be assigned"));
    let err = p.parse("while").unwrap_err();
    assert_eq!(
        err.details,
        ErrorDetails::Failure("reserved words cannot be assigned".to_owned())
    );
    assert_eq!(
        err.to_string(),
        "line 1, column 6:\nreserved words cannot be assigned"
    );
}

#[test]
fn never_does_not_displace_real_errors() {
    let p = parser::or(vec![scan::integer().map(|_| ()), parser::never()]);
    let err = p.parse("x").unwrap_err();
    assert_eq!(err.details, ErrorDetails::Expected(vec!["integer".to_owned()]));
}

#[test]
fn bare_never_reports_incomplete() {
    let err = parser::never::<()>().parse("x").unwrap_err();
    assert_eq!(err.details, ErrorDetails::Incomplete);
}

#[test]
fn eof_expected_on_short_input() {
    let p = scan::identifier().followed_by(&parser::eof());
    assert!(p.parse("foo").is_ok());
    let err = scan::string("foo").then(&scan::string("bar")).parse("foo").unwrap_err();
    assert_eq!(err.offset, 3);
    assert_eq!(err.encountered, "EOF");
}

#[test]
fn token_level_errors_locate_the_offending_token() {
    let tokenizer = parser::or(vec![
        descent::lexicon::integer_tokenizer(),
        descent::lexicon::identifier_tokenizer(),
    ]);
    let lexer = tokenizer.token().lexer(&scan::whitespaces());
    let grammar = descent::lexicon::integer_literal().many1();
    let err = grammar.from_lexer(&lexer).parse("1 2 three 4").unwrap_err();
    // The grammar failed on the third token; the error points at its
    // character offset and names what was found there.
    assert_eq!(err.offset, 4);
    assert_eq!(err.location.column, 5);
    assert_eq!(err.encountered, "three");
}

#[test]
fn token_errors_override_the_lexers_scan_position() {
    // While scanning, the lexer always runs its word scanner once past the
    // last token before rolling back, leaving an expectation at character
    // EOF. The token grammar's own failure must win regardless.
    let lexer = descent::lexicon::identifier_tokenizer()
        .token()
        .lexer(&scan::whitespaces());
    let err = descent::lexicon::integer_literal()
        .from_lexer(&lexer)
        .parse("abc def")
        .unwrap_err();
    assert_eq!(err.offset, 0);
    assert_eq!(err.encountered, "abc");
    assert_eq!(err.details, ErrorDetails::Expected(vec!["integer".to_owned()]));
}

#[test]
fn label_does_not_mask_an_explicit_failure() {
    let p = parser::fail::<()>("boom").label("thing");
    let err = p.parse("x").unwrap_err();
    assert_eq!(err.details, ErrorDetails::Failure("boom".to_owned()));
}

#[test]
fn sibling_labels_merge_their_names() {
    let a = scan::is_char('a').label("alpha");
    let b = scan::is_char('b').label("beta");
    let err = a.or(&b).parse("c").unwrap_err();
    assert_eq!(
        err.details,
        ErrorDetails::Expected(vec!["alpha".to_owned(), "beta".to_owned()])
    );
}

#[test]
fn later_failures_refresh_the_encountered_text() {
    // The first branch fails inside the token bridge, stamping a token
    // description. The second branch fails further into the input; the
    // report must describe that position, not the stale one.
    let lexer = descent::lexicon::identifier_tokenizer()
        .token()
        .lexer(&scan::whitespaces());
    let first = descent::lexicon::identifier().from_lexer(&lexer).map(|_| ());
    let second = scan::integer().then(&scan::is_char('x'));
    let err = first.or(&second).parse("12 34").unwrap_err();
    assert_eq!(err.offset, 2);
    assert_eq!(err.encountered, " ");
    assert_eq!(err.details, ErrorDetails::Expected(vec!["x".to_owned()]));
}

#[test]
fn recursive_grammar_reports_the_unclosed_paren() {
    let expr: ParserRef<()> = ParserRef::new();
    let atom = scan::integer().map(|_| ());
    let parens = expr
        .parser()
        .between(&scan::is_char('('), &scan::is_char(')'));
    expr.set(atom.or(&parens));

    let err = expr.parser().parse("((1)").unwrap_err();
    assert_eq!(err.offset, 4);
    assert_eq!(err.details, ErrorDetails::Expected(vec![")".to_owned()]));
}
