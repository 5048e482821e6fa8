//! Macro expansion engine.
//!
//! The expander consumes body token slices left to right under a layered
//! environment and produces evaluated sequences: flat runs of string
//! terms interleaved with step markers that later become recipe-line
//! breaks. It performs clause selection by structural arity, implements
//! the spread operator in both argument and body position, and guards
//! against unbounded recursion with a depth limit.

use std::ops::Range;

use makeshift_foundation::{Env, Error, ErrorContext, Result, Value};

use crate::ast::{MacroClause, Param};
use crate::macro_registry::MacroRegistry;
use crate::parser::parse_value_at;
use crate::token::Token;

/// Default cap on nested macro calls per target.
///
/// The language has no base-case construct other than arity dispatch, so
/// a runaway recursion would otherwise expand forever.
pub const MAX_EXPANSION_DEPTH: usize = 100;

/// One element of an evaluated sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    /// A fully evaluated term destined for a recipe line.
    Term(String),
    /// A recipe-line boundary, emitted for each top-level `,` in a body.
    Break,
}

/// Splits an evaluated sequence into recipe lines at the step markers.
///
/// Lines left empty by stray markers are dropped.
#[must_use]
pub fn split_at_breaks(fragments: Vec<Fragment>) -> Vec<Vec<String>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    for fragment in fragments {
        match fragment {
            Fragment::Term(term) => current.push(term),
            Fragment::Break => lines.push(std::mem::take(&mut current)),
        }
    }
    lines.push(current);
    lines.retain(|line| !line.is_empty());
    lines
}

/// The expansion engine.
///
/// Borrows the shared token array and the frozen macro registry; all
/// call-local state lives in environments passed through the recursion.
pub struct Expander<'a> {
    /// The shared token array; body ranges index into it.
    tokens: &'a [Token],
    /// Macro groups, frozen after parsing.
    registry: &'a MacroRegistry,
    /// Current nesting depth of macro calls.
    depth: usize,
    /// Configured recursion limit.
    max_depth: usize,
}

impl<'a> Expander<'a> {
    /// Creates an expander over the shared token array.
    #[must_use]
    pub fn new(tokens: &'a [Token], registry: &'a MacroRegistry) -> Self {
        Self {
            tokens,
            registry,
            depth: 0,
            max_depth: MAX_EXPANSION_DEPTH,
        }
    }

    /// Overrides the recursion limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expands a body token range into an evaluated sequence.
    pub fn expand_body(&mut self, range: Range<usize>, env: &Env) -> Result<Vec<Fragment>> {
        let mut out = Vec::new();
        let mut pos = range.start;
        while pos < range.end {
            if self.tokens[pos].is(",") {
                out.push(Fragment::Break);
                pos += 1;
            } else {
                self.expand_expr_into(&mut pos, range.end, env, &mut out)?;
            }
        }
        Ok(out)
    }

    /// Selects a clause of `name` for the given arguments and expands it.
    ///
    /// This is the entry point for delegated targets, where the target
    /// header supplies the arguments and no call site exists in the
    /// token stream. A failed lookup or selection is reported at `at`.
    pub fn expand_group_call(
        &mut self,
        name: &str,
        args: Vec<Value>,
        env: &Env,
        at: ErrorContext,
    ) -> Result<Vec<Fragment>> {
        let group = self
            .registry
            .get(name)
            .ok_or_else(|| Error::undefined_macro(name).with_context(at.clone()))?;
        let clause = group
            .select(args.len())
            .ok_or_else(|| Error::arity(name, args.len()).with_context(at.clone()))?;
        let frame = bind_clause(clause, args);
        let call_env = env.with_frame(frame);
        self.enter_call(&at)?;
        let result = self.expand_body(clause.body.clone(), &call_env);
        self.depth -= 1;
        result
    }

    /// Expands one expression in body position, splicing its terms (and
    /// any step markers from nested macro bodies) into `out`.
    fn expand_expr_into(
        &mut self,
        pos: &mut usize,
        end: usize,
        env: &Env,
        out: &mut Vec<Fragment>,
    ) -> Result<()> {
        let token = self.expr_token(pos, end)?;
        match token.text.as_str() {
            "..." => {
                *pos += 1;
                let operand = self.expr_token(pos, end)?;
                let value = self.eval_expr(pos, end, env)?;
                let items = value.into_items().ok_or_else(|| {
                    Error::shape("cannot spread a non-sequence value")
                        .with_context(ErrorContext::from(operand))
                })?;
                let at = ErrorContext::from(operand);
                for item in items {
                    self.emit_value(item, &at, out)?;
                }
                Ok(())
            }
            "if" => {
                *pos += 1;
                let condition = self.eval_expr(pos, end, env)?;
                self.expect(pos, end, "->")?;
                let chosen = condition == Value::Str("true".to_string());
                if chosen {
                    self.expand_expr_into(pos, end, env, out)?;
                } else {
                    self.skip_expr(pos, end)?;
                }
                self.expect(pos, end, "else")?;
                if chosen {
                    self.skip_expr(pos, end)
                } else {
                    self.expand_expr_into(pos, end, env, out)
                }
            }
            "boolean" => {
                *pos += 1;
                let value = self.eval_expr(pos, end, env)?;
                out.push(Fragment::Term(truth_of(&value).to_string()));
                Ok(())
            }
            "true" | "false" => {
                *pos += 1;
                out.push(Fragment::Term(token.text.clone()));
                Ok(())
            }
            "[" | "(" => {
                let value = parse_value_at(self.tokens, pos, end)?;
                let resolved = self.resolve(&value, env, &ErrorContext::from(token))?;
                self.emit_value(resolved, &ErrorContext::from(token), out)
            }
            _ if token.is_string_literal() => {
                *pos += 1;
                out.push(Fragment::Term(token.unquoted()));
                Ok(())
            }
            _ if token.is_identifier() => {
                if self.token_at(*pos + 1, end).is_some_and(|t| t.is("(")) {
                    let fragments = self.expand_call(pos, end, env)?;
                    out.extend(fragments);
                    return Ok(());
                }
                *pos += 1;
                if let Some(value) = env.lookup(&token.text) {
                    let resolved = self.resolve(&value.clone(), env, &ErrorContext::from(token))?;
                    self.emit_value(resolved, &ErrorContext::from(token), out)
                } else if self.registry.is_macro(&token.text) {
                    // A macro named without arguments stands for itself.
                    out.push(Fragment::Term(token.text.clone()));
                    Ok(())
                } else {
                    Err(Error::undefined_name(&token.text)
                        .with_context(ErrorContext::from(token)))
                }
            }
            _ => Err(Error::invalid_syntax(format!(
                "unexpected '{}' in body",
                token.text
            ))
            .with_context(ErrorContext::from(token))),
        }
    }

    /// Evaluates one expression to a value.
    ///
    /// Used for macro arguments, spread operands, and condition
    /// operands. Step markers never escape this position: a macro call
    /// expanding to several terms collapses into a list.
    fn eval_expr(&mut self, pos: &mut usize, end: usize, env: &Env) -> Result<Value> {
        let token = self.expr_token(pos, end)?;
        match token.text.as_str() {
            "if" => {
                *pos += 1;
                let condition = self.eval_expr(pos, end, env)?;
                self.expect(pos, end, "->")?;
                if condition == Value::Str("true".to_string()) {
                    let value = self.eval_expr(pos, end, env)?;
                    self.expect(pos, end, "else")?;
                    self.skip_expr(pos, end)?;
                    Ok(value)
                } else {
                    self.skip_expr(pos, end)?;
                    self.expect(pos, end, "else")?;
                    self.eval_expr(pos, end, env)
                }
            }
            "boolean" => {
                *pos += 1;
                let value = self.eval_expr(pos, end, env)?;
                Ok(Value::Str(truth_of(&value).to_string()))
            }
            "true" | "false" => {
                *pos += 1;
                Ok(Value::Str(token.text.clone()))
            }
            "[" | "(" => {
                let value = parse_value_at(self.tokens, pos, end)?;
                self.resolve(&value, env, &ErrorContext::from(token))
            }
            "..." => Err(Error::invalid_syntax(
                "'...' is only allowed in bodies and argument lists",
            )
            .with_context(ErrorContext::from(token))),
            _ if token.is_string_literal() => {
                *pos += 1;
                Ok(Value::Str(token.unquoted()))
            }
            _ if token.is_identifier() => {
                if self.token_at(*pos + 1, end).is_some_and(|t| t.is("(")) {
                    let fragments = self.expand_call(pos, end, env)?;
                    return Ok(collapse(fragments));
                }
                *pos += 1;
                if let Some(value) = env.lookup(&token.text) {
                    self.resolve(&value.clone(), env, &ErrorContext::from(token))
                } else if self.registry.is_macro(&token.text) {
                    Ok(Value::Str(token.text.clone()))
                } else {
                    Err(Error::undefined_name(&token.text)
                        .with_context(ErrorContext::from(token)))
                }
            }
            _ => Err(Error::invalid_syntax(format!(
                "expected an expression, found '{}'",
                token.text
            ))
            .with_context(ErrorContext::from(token))),
        }
    }

    /// Consumes one expression without evaluating it.
    ///
    /// The unchosen branch of an `if` is parsed but discarded, so it may
    /// reference anything without failing.
    fn skip_expr(&mut self, pos: &mut usize, end: usize) -> Result<()> {
        let token = self.expr_token(pos, end)?;
        match token.text.as_str() {
            "..." | "boolean" => {
                *pos += 1;
                self.skip_expr(pos, end)
            }
            "if" => {
                *pos += 1;
                self.skip_expr(pos, end)?;
                self.expect(pos, end, "->")?;
                self.skip_expr(pos, end)?;
                self.expect(pos, end, "else")?;
                self.skip_expr(pos, end)
            }
            "[" | "(" => self.skip_balanced(pos, end),
            _ => {
                *pos += 1;
                if token.is_identifier() && self.token_at(*pos, end).is_some_and(|t| t.is("(")) {
                    self.skip_balanced(pos, end)?;
                }
                Ok(())
            }
        }
    }

    /// Skips a balanced delimiter run starting at an opener.
    fn skip_balanced(&mut self, pos: &mut usize, end: usize) -> Result<()> {
        let opener = self.expr_token(pos, end)?;
        let mut nesting = 0usize;
        while *pos < end {
            match self.tokens[*pos].text.as_str() {
                "(" | "[" => nesting += 1,
                ")" | "]" => {
                    nesting -= 1;
                    if nesting == 0 {
                        *pos += 1;
                        return Ok(());
                    }
                }
                _ => {}
            }
            *pos += 1;
        }
        Err(Error::invalid_syntax("unbalanced delimiters")
            .with_context(ErrorContext::from(opener)))
    }

    /// Collects a call's arguments, dispatches on arity, and expands the
    /// selected clause under a fresh frame.
    fn expand_call(&mut self, pos: &mut usize, end: usize, env: &Env) -> Result<Vec<Fragment>> {
        let name = self.expr_token(pos, end)?;
        *pos += 1;
        self.expect(pos, end, "(")?;

        let mut args = Vec::new();
        if self.token_at(*pos, end).is_some_and(|t| t.is(")")) {
            *pos += 1;
        } else {
            loop {
                if self.token_at(*pos, end).is_some_and(|t| t.is("...")) {
                    // Argument-position spread: splice before arity
                    // matching.
                    *pos += 1;
                    let operand = self.expr_token(pos, end)?;
                    let value = self.eval_expr(pos, end, env)?;
                    let items = value.into_items().ok_or_else(|| {
                        Error::shape("cannot spread a non-sequence value")
                            .with_context(ErrorContext::from(operand))
                    })?;
                    args.extend(items);
                } else {
                    args.push(self.eval_expr(pos, end, env)?);
                }
                if self.token_at(*pos, end).is_some_and(|t| t.is(")")) {
                    *pos += 1;
                    break;
                }
                self.expect(pos, end, ",")?;
            }
        }

        let group = self
            .registry
            .get(&name.text)
            .ok_or_else(|| {
                Error::undefined_macro(&name.text).with_context(ErrorContext::from(name))
            })?;
        let clause = group.select(args.len()).ok_or_else(|| {
            Error::no_matching_clause(&name.text, args.len())
                .with_context(ErrorContext::from(name))
        })?;

        let frame = bind_clause(clause, args);
        let call_env = env.with_frame(frame);
        self.enter_call(&ErrorContext::from(name))?;
        let result = self.expand_body(clause.body.clone(), &call_env);
        self.depth -= 1;
        result
    }

    /// Bumps the call depth, failing once the guard trips.
    fn enter_call(&mut self, at: &ErrorContext) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            self.depth -= 1;
            return Err(Error::depth_exceeded(self.max_depth).with_context(at.clone()));
        }
        Ok(())
    }

    /// Resolves every atom inside a value through the environment.
    ///
    /// An atom naming a macro group resolves to its name as a string so
    /// higher-level contexts can dispatch on it. Failures are reported
    /// at `at`.
    pub fn resolve(&self, value: &Value, env: &Env, at: &ErrorContext) -> Result<Value> {
        self.resolve_value(value, env, at, 0)
    }

    /// Recursive worker for [`Expander::resolve`]; the depth parameter
    /// catches reference cycles among bindings.
    fn resolve_value(
        &self,
        value: &Value,
        env: &Env,
        at: &ErrorContext,
        depth: usize,
    ) -> Result<Value> {
        if depth > self.max_depth {
            return Err(Error::depth_exceeded(self.max_depth).with_context(at.clone()));
        }
        match value {
            Value::Str(_) => Ok(value.clone()),
            Value::Atom(name) => {
                if let Some(bound) = env.lookup(name) {
                    self.resolve_value(&bound.clone(), env, at, depth + 1)
                } else if self.registry.is_macro(name) {
                    Ok(Value::Str(name.clone()))
                } else {
                    Err(Error::undefined_name(name).with_context(at.clone()))
                }
            }
            Value::List(items) => Ok(Value::List(self.resolve_items(items, env, at, depth)?)),
            Value::Tuple(items) => Ok(Value::Tuple(self.resolve_items(items, env, at, depth)?)),
        }
    }

    fn resolve_items(
        &self,
        items: &[Value],
        env: &Env,
        at: &ErrorContext,
        depth: usize,
    ) -> Result<Vec<Value>> {
        items
            .iter()
            .map(|item| self.resolve_value(item, env, at, depth + 1))
            .collect()
    }

    /// Emits a resolved value into the output sequence.
    ///
    /// Strings become terms; sequences splice their elements into the
    /// current recipe line. Only strings may survive into a recipe, so a
    /// leftover atom is an unresolved identifier.
    fn emit_value(&self, value: Value, at: &ErrorContext, out: &mut Vec<Fragment>) -> Result<()> {
        match value {
            Value::Str(s) => {
                out.push(Fragment::Term(s));
                Ok(())
            }
            Value::List(items) | Value::Tuple(items) => {
                for item in items {
                    self.emit_value(item, at, out)?;
                }
                Ok(())
            }
            Value::Atom(name) => Err(Error::undefined_name(name).with_context(at.clone())),
        }
    }

    /// Returns the token at an absolute position, if still inside the
    /// current slice.
    fn token_at(&self, pos: usize, end: usize) -> Option<&'a Token> {
        if pos < end {
            Some(&self.tokens[pos])
        } else {
            None
        }
    }

    /// Returns the current token or an end-of-slice error.
    fn expr_token(&self, pos: &mut usize, end: usize) -> Result<&'a Token> {
        self.token_at(*pos, end).ok_or_else(|| {
            let err = Error::invalid_syntax("expected an expression");
            match self.tokens.get(end.saturating_sub(1)) {
                Some(last) => err.with_context(ErrorContext::from(last)),
                None => err,
            }
        })
    }

    /// Expects an exact token text, then advances.
    fn expect(&self, pos: &mut usize, end: usize, text: &str) -> Result<()> {
        match self.token_at(*pos, end) {
            Some(token) if token.is(text) => {
                *pos += 1;
                Ok(())
            }
            Some(token) => Err(Error::invalid_syntax(format!(
                "expected '{text}', found '{}'",
                token.text
            ))
            .with_context(ErrorContext::from(token))),
            None => Err(Error::invalid_syntax(format!("expected '{text}'"))),
        }
    }
}

/// Builds the parameter frame for a selected clause.
///
/// Regular parameters bind positionally; a variadic last parameter
/// captures the remaining arguments as a list, possibly empty. A single
/// list argument captured by a variadic parameter is preserved as-is,
/// not flattened.
#[must_use]
pub fn bind_clause(clause: &MacroClause, args: Vec<Value>) -> Vec<(String, Value)> {
    let mut frame = Vec::with_capacity(clause.params.len());
    for (i, param) in clause.params.iter().enumerate() {
        match param {
            Param::Regular(name) => {
                if let Some(arg) = args.get(i) {
                    frame.push((name.clone(), arg.clone()));
                }
            }
            Param::Variadic(name) => {
                let rest = args.get(i..).unwrap_or_default().to_vec();
                frame.push((name.clone(), Value::List(rest)));
                break;
            }
        }
    }
    frame
}

/// Reports whether a value counts as true: a non-empty string other than
/// the literal `false`.
fn truth_of(value: &Value) -> &'static str {
    match value {
        Value::Str(s) if !s.is_empty() && s != "false" => "true",
        _ => "false",
    }
}

/// Collapses an evaluated sequence into a single value for expression
/// position: one term stays a string, anything else becomes a list.
fn collapse(fragments: Vec<Fragment>) -> Value {
    let mut terms: Vec<Value> = fragments
        .into_iter()
        .filter_map(|fragment| match fragment {
            Fragment::Term(term) => Some(Value::Str(term)),
            Fragment::Break => None,
        })
        .collect();
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        Value::List(terms)
    }
}
