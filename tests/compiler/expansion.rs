//! Expansion laws checked through the whole-program compiler.

use makeshift_foundation::ErrorKind;
use makeshift_language::{Program, compile};

fn recipe_of(source: &str) -> Vec<Vec<String>> {
    let rules = compile(source).expect("compilation failed");
    assert_eq!(rules.len(), 1, "expected a single rule");
    rules.into_iter().next().unwrap().recipe
}

fn line(terms: &[&str]) -> Vec<String> {
    terms.iter().map(ToString::to_string).collect()
}

// =============================================================================
// Arity dispatch
// =============================================================================

#[test]
fn first_matching_clause_wins() {
    let source = "\
        macro m (a) -> 'one' a ; \
              m (...xs) -> 'many' ...xs . \
        do ('x', []) -> (t, d) -> m('p') .";
    assert_eq!(recipe_of(source), vec![line(&["one", "p"])]);
}

#[test]
fn variadic_clause_catches_everything_else() {
    let source = "\
        macro m (a) -> 'one' a ; \
              m (...xs) -> 'many' ...xs . \
        do ('x', []) -> (t, d) -> m('p', 'q', 'r') .";
    assert_eq!(recipe_of(source), vec![line(&["many", "p", "q", "r"])]);
}

#[test]
fn zero_parameter_clause_before_variadic_wins_at_zero() {
    let source = "\
        macro m () -> 'none' ; \
              m (...xs) -> 'many' ...xs . \
        do ('x', []) -> (t, d) -> m() .";
    assert_eq!(recipe_of(source), vec![line(&["none"])]);
}

#[test]
fn unmatched_arity_is_rejected() {
    let source = "\
        macro m (a, b) -> a b . \
        do ('x', []) -> (t, d) -> m('p') .";
    let err = compile(source).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoMatchingClause { .. }));
}

// =============================================================================
// Spread
// =============================================================================

#[test]
fn spread_identity_with_explicit_arguments() {
    // f(...xs) with xs of length 2 behaves exactly like f(xs[0], xs[1]).
    let spread = "\
        let xs = ['p', 'q'] . \
        macro f (a, b) -> 'got' a b . \
        do ('x', []) -> (t, d) -> f(...xs) .";
    let explicit = "\
        macro f (a, b) -> 'got' a b . \
        do ('x', []) -> (t, d) -> f('p', 'q') .";
    assert_eq!(recipe_of(spread), recipe_of(explicit));
}

#[test]
fn body_spread_contributes_terms_to_the_same_line() {
    let source = "do ('x', []) -> (t, d) -> 'run' ...['a', 'b', 'c'] 'end' .";
    assert_eq!(recipe_of(source), vec![line(&["run", "a", "b", "c", "end"])]);
}

#[test]
fn unspread_list_argument_stays_one_argument() {
    // `d` resolves to a one-element list and selects the one-parameter
    // clause; only an explicit `...` would splice it.
    let source = "\
        macro f (a) -> 'one' a ; \
              f (a, b) -> 'two' a b . \
        do ('x', ['y']) -> (t, d) -> f(d) .";
    assert_eq!(recipe_of(source), vec![line(&["one", "y"])]);
}

#[test]
fn spread_of_a_non_sequence_is_rejected() {
    let err = compile("do ('x', []) -> (t, d) -> ...t .").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ShapeError(_)));
}

// =============================================================================
// Step markers
// =============================================================================

#[test]
fn each_top_level_comma_is_one_line_break() {
    let source = "do ('x', []) -> (t, d) -> 'a', 'b', 'c' .";
    assert_eq!(
        recipe_of(source),
        vec![line(&["a"]), line(&["b"]), line(&["c"])]
    );
}

#[test]
fn commas_inside_calls_and_collections_do_not_break() {
    let source = "\
        macro f (a, b) -> a b . \
        do ('x', []) -> (t, d) -> f('p', 'q') ...['r', 's'] .";
    assert_eq!(recipe_of(source), vec![line(&["p", "q", "r", "s"])]);
}

#[test]
fn commas_inside_macro_bodies_do_break() {
    let source = "\
        macro steps (t) -> 'first' t, 'second' t . \
        do ('x', []) -> (t, d) -> steps(t) .";
    assert_eq!(
        recipe_of(source),
        vec![line(&["first", "x"]), line(&["second", "x"])]
    );
}

// =============================================================================
// Conditionals
// =============================================================================

#[test]
fn if_dispatches_on_the_true_atom() {
    let source = "do ('x', []) -> (t, d) -> if boolean t -> 'have' else 'none' .";
    assert_eq!(recipe_of(source), vec![line(&["have"])]);
}

#[test]
fn boolean_normalizes_strings() {
    let source = "do ('x', []) -> (t, d) -> boolean 'anything', boolean 'false' .";
    assert_eq!(recipe_of(source), vec![line(&["true"]), line(&["false"])]);
}

// =============================================================================
// Immutability
// =============================================================================

#[test]
fn compiling_targets_together_or_alone_is_identical() {
    let source = "\
        let cc = 'gcc' . \
        macro c (t, s) -> cc '-o' t ...s . \
        do ('a.o', ['a.c']) -> (t, d) -> c(t, d) . \
        do ('b.o', ['b.c']) -> (t, d) -> c(t, d) .";
    let program = Program::parse(source).unwrap();
    let together = program.compile_all().unwrap();
    let alone: Vec<_> = program
        .targets()
        .iter()
        .map(|t| program.compile_target(t).unwrap())
        .collect();
    assert_eq!(together, alone);
}

#[test]
fn expansion_depth_guard_is_reported() {
    let source = "\
        macro f (x) -> f(x) . \
        do ('x', []) -> (t, d) -> f('a') .";
    let err = compile(source).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ExpansionDepthExceeded { .. }));
}
