//! Integration tests for lexing, fusion, and form splitting.

use makeshift_language::{FormKind, Lexer, fuse, split_forms};

fn texts(source: &str) -> Vec<String> {
    fuse(Lexer::tokenize_all(source).expect("lexing failed"))
        .into_iter()
        .map(|t| t.text)
        .collect()
}

// =============================================================================
// Lexing
// =============================================================================

#[test]
fn tokenize_binding_statement() {
    assert_eq!(
        texts("let cxx = 'g++' ."),
        vec!["let", "cxx", "=", "'g++'", "."]
    );
}

#[test]
fn tokenize_full_target() {
    assert_eq!(
        texts("do ('a', ['b']) -> (t, d) -> 'cp' d t ."),
        vec![
            "do", "(", "'a'", ",", "[", "'b'", "]", ")", "->", "(", "t", ",", "d", ")", "->",
            "'cp'", "d", "t", "."
        ]
    );
}

#[test]
fn strings_may_use_either_quote() {
    assert_eq!(texts(r#"'a' "b""#), vec!["'a'", "\"b\""]);
}

#[test]
fn escaped_quote_stays_inside_string() {
    assert_eq!(texts(r"'it\'s'"), vec![r"'it\'s'"]);
}

#[test]
fn comments_are_invisible_between_tokens() {
    assert_eq!(
        texts("let /* compiler */ cxx = 'g++' ."),
        vec!["let", "cxx", "=", "'g++'", "."]
    );
}

#[test]
fn lex_round_trip_modulo_whitespace() {
    let source = "macro c (s) -> 'g++' s ; c (t, s) -> 'g++' '-o' t s .";
    let tokens = Lexer::tokenize_all(source).unwrap();
    let rejoined = tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let relexed = Lexer::tokenize_all(&rejoined).unwrap();
    assert_eq!(
        tokens.iter().map(|t| &t.text).collect::<Vec<_>>(),
        relexed.iter().map(|t| &t.text).collect::<Vec<_>>()
    );
}

#[test]
fn unterminated_string_reports_opening_quote() {
    let err = Lexer::tokenize_all("let s = 'oops").unwrap_err();
    let ctx = err.context.expect("position");
    assert_eq!((ctx.line, ctx.column), (0, 8));
}

// =============================================================================
// Fusion
// =============================================================================

#[test]
fn arrow_and_spread_fuse() {
    assert_eq!(texts("- > . . ."), vec!["->", "..."]);
}

#[test]
fn spread_requires_three_dots() {
    assert_eq!(texts(". ."), vec![".", "."]);
}

#[test]
fn fused_positions_point_at_first_component() {
    let tokens = fuse(Lexer::tokenize_all("x ... y").unwrap());
    let spread = tokens.iter().find(|t| t.is("...")).unwrap();
    assert_eq!(spread.span.column, 2);
    assert_eq!(spread.span.line, 0);
}

// =============================================================================
// Form splitting
// =============================================================================

#[test]
fn split_into_three_form_kinds() {
    let source = "\
        let cxx = 'g++' . \
        macro c (s) -> cxx s . \
        do ('a', []) -> (t, d) -> c(t) .";
    let tokens = fuse(Lexer::tokenize_all(source).unwrap());
    let forms = split_forms(&tokens).unwrap();
    assert_eq!(
        forms.iter().map(|f| f.kind).collect::<Vec<_>>(),
        vec![FormKind::Binding, FormKind::MacroGroup, FormKind::Target]
    );
}

#[test]
fn splitting_an_empty_stream_yields_nothing() {
    let tokens = fuse(Lexer::tokenize_all("/* nothing here */").unwrap());
    assert!(split_forms(&tokens).unwrap().is_empty());
}
