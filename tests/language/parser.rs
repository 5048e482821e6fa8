//! Integration tests for the structural parser.

use makeshift_foundation::Value;
use makeshift_language::{
    Lexer, Param, TargetBody, fuse, parse_binding, parse_macro_group, parse_target, split_forms,
};
use makeshift_language::{Form, Token};

fn forms_of(source: &str) -> (Vec<Token>, Vec<Form>) {
    let tokens = fuse(Lexer::tokenize_all(source).expect("lexing failed"));
    let forms = split_forms(&tokens).expect("splitting failed");
    (tokens, forms)
}

#[test]
fn binding_shapes() {
    let (tokens, forms) = forms_of(
        "let cxx = 'g++' . \
         let flags = ['-Wall', '-O2'] . \
         let pair = ('a', 'b') .",
    );
    let bindings: Vec<_> = forms
        .iter()
        .map(|f| parse_binding(&tokens, f).unwrap())
        .collect();

    assert_eq!(bindings[0].value, Value::Str("g++".into()));
    assert_eq!(
        bindings[1].value,
        Value::List(vec![Value::Str("-Wall".into()), Value::Str("-O2".into())])
    );
    assert_eq!(
        bindings[2].value,
        Value::Tuple(vec![Value::Str("a".into()), Value::Str("b".into())])
    );
}

#[test]
fn binding_values_unescape_strings() {
    let (tokens, forms) = forms_of(r"let msg = 'it\'s fine' .");
    let binding = parse_binding(&tokens, &forms[0]).unwrap();
    assert_eq!(binding.value, Value::Str("it's fine".into()));
}

#[test]
fn binding_may_nest_collections() {
    let (tokens, forms) = forms_of("let m = [['a', 'b'], ('c', d)] .");
    let binding = parse_binding(&tokens, &forms[0]).unwrap();
    let Value::List(outer) = binding.value else {
        panic!("expected list");
    };
    assert!(matches!(outer[0], Value::List(_)));
    assert!(matches!(outer[1], Value::Tuple(_)));
}

#[test]
fn missing_comma_in_collection_is_rejected() {
    let (tokens, forms) = forms_of("let xs = ['a' 'b'] .");
    assert!(parse_binding(&tokens, &forms[0]).is_err());
}

#[test]
fn macro_group_clause_shapes() {
    let (tokens, forms) = forms_of(
        "macro c (s) -> 'g++' s ; \
               c (t, s) -> 'g++' '-o' t s ; \
               c (...xs) -> 'g++' ...xs .",
    );
    let group = parse_macro_group(&tokens, &forms[0]).unwrap();
    assert_eq!(group.name, "c");
    assert_eq!(group.clauses.len(), 3);
    assert_eq!(group.clauses[0].params, vec![Param::Regular("s".into())]);
    assert_eq!(
        group.clauses[1].params,
        vec![Param::Regular("t".into()), Param::Regular("s".into())]
    );
    assert_eq!(group.clauses[2].params, vec![Param::Variadic("xs".into())]);
}

#[test]
fn macro_bodies_are_slices_of_the_shared_array() {
    let (tokens, forms) = forms_of("macro rm (t) -> 'rm' '-f' t .");
    let group = parse_macro_group(&tokens, &forms[0]).unwrap();
    let body = &tokens[group.clauses[0].body.clone()];
    assert_eq!(
        body.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
        vec!["'rm'", "'-f'", "t"]
    );
}

#[test]
fn variadic_not_last_is_rejected() {
    let (tokens, forms) = forms_of("macro bad (...xs, y) -> y .");
    assert!(parse_macro_group(&tokens, &forms[0]).is_err());
}

#[test]
fn target_canonical_and_delegated() {
    let (tokens, forms) = forms_of(
        "do ('a', ['b']) -> (t, d) -> 'cp' d t . \
         do ('p', ['a', 'b']) -> build .",
    );
    let first = parse_target(&tokens, &forms[0]).unwrap();
    assert!(matches!(first.body, TargetBody::Direct { .. }));

    let second = parse_target(&tokens, &forms[1]).unwrap();
    assert_eq!(second.head, Value::Str("p".into()));
    assert!(matches!(second.body, TargetBody::Delegate { ref name } if name == "build"));
}

#[test]
fn target_deps_default_to_empty() {
    let (tokens, forms) = forms_of("do ('a') -> (t, d) -> 'touch' t .");
    let target = parse_target(&tokens, &forms[0]).unwrap();
    assert_eq!(target.deps, Value::List(vec![]));
}
