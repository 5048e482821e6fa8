//! End-to-end scenarios: source text in, Makefile rules out.

use makeshift_language::compile;
use makeshift_runtime::{compile_source, emit_all};

fn emitted(source: &str) -> String {
    emit_all(&compile(source).expect("compilation failed"))
}

#[test]
fn trivial_target() {
    assert_eq!(
        emitted("do ('a', ['b']) -> (t, d) -> 'cp' d t ."),
        "a: b\n\tcp b a\n"
    );
}

#[test]
fn global_binding_and_reference() {
    let source = "\
let cxx = 'g++' .
do ('o', ['s']) -> (t, d) -> cxx '-o' t d .
";
    assert_eq!(emitted(source), "o: s\n\tg++ -o o s\n");
}

#[test]
fn macro_with_clause_dispatch_on_arity() {
    let source = "\
macro c (s) -> 'g++' s ;
      c (t, s) -> 'g++' '-o' t s .
do ('x', ['y.c']) -> (t, d) -> c(t, d) .
";
    // `d` is one list argument, selecting the two-argument clause.
    assert_eq!(emitted(source), "x: y.c\n\tg++ -o x y.c\n");
}

#[test]
fn variadic_with_spread() {
    let source = "\
macro echo (...xs) -> 'echo' ...xs .
do ('e', []) -> (t, d) -> echo('hi', 'there') .
";
    assert_eq!(emitted(source), "e:\n\techo hi there\n");
}

#[test]
fn multi_step_body_via_comma() {
    let source = "\
macro rm (t) -> 'rm' '-f' t .
macro cp (t, s) -> 'cp' s t .
do ('z', ['q']) -> (t, d) -> rm(t), cp(t, d) .
";
    assert_eq!(emitted(source), "z: q\n\trm -f z\n\tcp q z\n");
}

#[test]
fn delegated_target() {
    let source = "\
macro build (name, deps) -> 'mk' '-o' name ...deps .
do ('p', ['a', 'b']) -> build .
";
    assert_eq!(emitted(source), "p: a b\n\tmk -o p a b\n");
}

#[test]
fn several_rules_are_blank_line_separated() {
    let source = "\
do ('a', []) -> (t, d) -> 'one' .
do ('b', ['a']) -> (t, d) -> 'two' .
";
    assert_eq!(emitted(source), "a:\n\tone\n\nb: a\n\ttwo\n");
}

#[test]
fn comments_may_appear_anywhere_whitespace_may() {
    let source = "\
/* toolchain */ let cxx = 'g++' .
do /* rule */ ('o', ['s']) -> (t, d) -> cxx '-o' t ...d .
";
    assert_eq!(emitted(source), "o: s\n\tg++ -o o s\n");
}

#[test]
fn target_filter_selects_by_lhs() {
    let source = "\
do ('a', []) -> (t, d) -> 'one' .
do ('b', []) -> (t, d) -> 'two' .
";
    let rules = compile_source(source, "build.mk", Some("b")).unwrap();
    assert_eq!(emit_all(&rules), "b:\n\ttwo\n");
}

#[test]
fn diagnostics_use_file_line_column_and_token() {
    let source = "do ('a', []) -> (t, d) ->\n  missing .";
    let err = compile_source(source, "build.mk", None).unwrap_err();
    assert_eq!(
        format!("{err}"),
        "build.mk:1:2: missing: undefined name: missing"
    );
}

#[test]
fn no_partial_output_on_failure() {
    // The second target fails, so compilation as a whole fails.
    let source = "\
do ('a', []) -> (t, d) -> 'one' .
do ('b', []) -> (t, d) -> broken .
";
    assert!(compile_source(source, "build.mk", None).is_err());
}
