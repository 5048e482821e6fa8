//! Structural parser for top-level forms.
//!
//! Converts the token slices produced by the splitter into typed AST
//! nodes. A shared element sub-parser handles comma-separated,
//! bracket-nested collections and doubles as the value builder: string
//! literals become unquoted [`Value::Str`]s, bare identifiers become
//! unresolved [`Value::Atom`]s.

use makeshift_foundation::{Error, ErrorContext, Result, Value};

use crate::ast::{Binding, MacroClause, MacroGroup, Param, Target, TargetBody};
use crate::splitter::Form;
use crate::token::Token;

/// Cursor over one form's slice of the shared token array.
///
/// Positions are absolute indices into the shared array so body ranges
/// stay valid after the parser is dropped.
struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    fn for_form(tokens: &'a [Token], form: &Form) -> Self {
        Self {
            tokens,
            pos: form.start,
            end: form.end,
        }
    }

    fn current(&self) -> Option<&'a Token> {
        if self.pos < self.end {
            Some(&self.tokens[self.pos])
        } else {
            None
        }
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Expects the current token to have exactly this text, then advances.
    fn expect(&mut self, text: &str) -> Result<&'a Token> {
        match self.current() {
            Some(token) if token.is(text) => {
                self.advance();
                Ok(token)
            }
            Some(token) => Err(Error::invalid_syntax(format!(
                "expected '{text}', found '{}'",
                token.text
            ))
            .with_context(ErrorContext::from(token))),
            None => Err(self.eof_error(&format!("expected '{text}'"))),
        }
    }

    /// Expects a bare identifier, then advances.
    fn expect_identifier(&mut self) -> Result<&'a Token> {
        match self.current() {
            Some(token) if token.is_identifier() => {
                self.advance();
                Ok(token)
            }
            Some(token) => Err(Error::invalid_syntax(format!(
                "expected a name, found '{}'",
                token.text
            ))
            .with_context(ErrorContext::from(token))),
            None => Err(self.eof_error("expected a name")),
        }
    }

    fn eof_error(&self, message: &str) -> Error {
        let err = Error::invalid_syntax(message);
        match self.tokens.get(self.end.saturating_sub(1)) {
            Some(last) => err.with_context(ErrorContext::from(last)),
            None => err,
        }
    }

    /// Scans forward for the next token with one of the given texts,
    /// without moving the cursor.
    fn find_ahead(&self, texts: &[&str]) -> Option<usize> {
        (self.pos..self.end).find(|&i| texts.iter().any(|t| self.tokens[i].is(t)))
    }
}

/// Parses a `let NAME = VALUE .` slice.
pub fn parse_binding(tokens: &[Token], form: &Form) -> Result<Binding> {
    let mut cursor = Cursor::for_form(tokens, form);
    cursor.expect("let")?;
    let name = cursor.expect_identifier()?;
    cursor.expect("=")?;
    let value = parse_value(&mut cursor)?;
    cursor.expect(".")?;
    Ok(Binding {
        name: name.text.clone(),
        value,
        span: name.span,
    })
}

/// Parses a `macro NAME (PARAMS) -> BODY [; NAME (PARAMS) -> BODY]* .`
/// slice. Clause bodies are recorded as ranges into the shared array.
pub fn parse_macro_group(tokens: &[Token], form: &Form) -> Result<MacroGroup> {
    let mut cursor = Cursor::for_form(tokens, form);
    cursor.expect("macro")?;
    let name = cursor.expect_identifier()?;

    let mut clauses = Vec::new();
    loop {
        let params = parse_params(&mut cursor)?;
        cursor.expect("->")?;

        // Clause bodies contain no bare `;` or `.`, so the next one ends
        // the clause.
        let body_end = cursor
            .find_ahead(&[";", "."])
            .ok_or_else(|| cursor.eof_error("expected ';' or '.' after clause body"))?;
        let body = cursor.pos..body_end;
        cursor.pos = body_end;
        clauses.push(MacroClause { params, body });

        if cursor.current().is_some_and(|t| t.is(";")) {
            cursor.advance();
            let next_name = cursor.expect_identifier()?;
            if next_name.text != name.text {
                return Err(Error::invalid_syntax(format!(
                    "clause name '{}' does not match group '{}'",
                    next_name.text, name.text
                ))
                .with_context(ErrorContext::from(next_name)));
            }
        } else {
            cursor.expect(".")?;
            break;
        }
    }

    Ok(MacroGroup {
        name: name.text.clone(),
        clauses,
        span: name.span,
    })
}

/// Parses a `do (HEAD, DEPS) -> TAIL .` slice in canonical or delegated
/// form.
pub fn parse_target(tokens: &[Token], form: &Form) -> Result<Target> {
    let mut cursor = Cursor::for_form(tokens, form);
    let keyword = cursor.expect("do")?;
    cursor.expect("(")?;
    let head = parse_value(&mut cursor)?;
    let deps = if cursor.current().is_some_and(|t| t.is(",")) {
        cursor.advance();
        parse_value(&mut cursor)?
    } else {
        Value::List(Vec::new())
    };
    cursor.expect(")")?;
    cursor.expect("->")?;

    let body = if cursor.current().is_some_and(|t| t.is("(")) {
        cursor.advance();
        let mut binders = vec![cursor.expect_identifier()?.text.clone()];
        while cursor.current().is_some_and(|t| t.is(",")) {
            cursor.advance();
            binders.push(cursor.expect_identifier()?.text.clone());
        }
        cursor.expect(")")?;
        cursor.expect("->")?;
        // The body runs to the terminating `.`, which the splitter
        // guarantees is the slice's last token.
        let body = cursor.pos..form.end - 1;
        cursor.pos = form.end - 1;
        cursor.expect(".")?;
        TargetBody::Direct { binders, body }
    } else {
        let name = cursor.expect_identifier()?;
        cursor.expect(".")?;
        TargetBody::Delegate {
            name: name.text.clone(),
        }
    };

    Ok(Target {
        head,
        deps,
        body,
        span: keyword.span,
    })
}

/// Parses a single value at the cursor: a literal, an identifier, or a
/// bracketed/parenthesized collection.
fn parse_value(cursor: &mut Cursor<'_>) -> Result<Value> {
    match cursor.current() {
        Some(token) if token.is_string_literal() => {
            cursor.advance();
            Ok(Value::Str(token.unquoted()))
        }
        Some(token) if token.is("[") => {
            cursor.advance();
            Ok(Value::List(parse_elements(cursor, "]")?))
        }
        Some(token) if token.is("(") => {
            cursor.advance();
            Ok(Value::Tuple(parse_elements(cursor, ")")?))
        }
        Some(token) if token.is_identifier() => {
            cursor.advance();
            Ok(Value::Atom(token.text.clone()))
        }
        Some(token) => Err(Error::invalid_syntax(format!(
            "expected a value, found '{}'",
            token.text
        ))
        .with_context(ErrorContext::from(token))),
        None => Err(cursor.eof_error("expected a value")),
    }
}

/// Parses comma-separated elements up to the closing delimiter.
///
/// Elements may be literals, identifiers, or nested collections;
/// consecutive elements must be comma-separated.
fn parse_elements(cursor: &mut Cursor<'_>, close: &str) -> Result<Vec<Value>> {
    let mut items = Vec::new();
    if cursor.current().is_some_and(|t| t.is(close)) {
        cursor.advance();
        return Ok(items);
    }
    loop {
        items.push(parse_value(cursor)?);
        if cursor.current().is_some_and(|t| t.is(close)) {
            cursor.advance();
            return Ok(items);
        }
        cursor.expect(",")?;
    }
}

/// Parses a single value out of an arbitrary token range.
///
/// Used by the expansion engine for collection literals in expression
/// position; `pos` is advanced past the consumed tokens.
pub(crate) fn parse_value_at(tokens: &[Token], pos: &mut usize, end: usize) -> Result<Value> {
    let mut cursor = Cursor {
        tokens,
        pos: *pos,
        end,
    };
    let value = parse_value(&mut cursor)?;
    *pos = cursor.pos;
    Ok(value)
}

/// Parses a clause parameter list: `( PARAM [, PARAM]* )` where a
/// variadic `...`-marked parameter may only close the list.
fn parse_params(cursor: &mut Cursor<'_>) -> Result<Vec<Param>> {
    cursor.expect("(")?;
    let mut params = Vec::new();
    if cursor.current().is_some_and(|t| t.is(")")) {
        cursor.advance();
        return Ok(params);
    }
    loop {
        if cursor.current().is_some_and(|t| t.is("...")) {
            let marker = cursor.expect("...")?;
            let name = cursor.expect_identifier()?;
            params.push(Param::Variadic(name.text.clone()));
            if !cursor.current().is_some_and(|t| t.is(")")) {
                return Err(Error::invalid_syntax("variadic parameter must be last")
                    .with_context(ErrorContext::from(marker)));
            }
        } else {
            let name = cursor.expect_identifier()?;
            params.push(Param::Regular(name.text.clone()));
        }
        if cursor.current().is_some_and(|t| t.is(")")) {
            cursor.advance();
            return Ok(params);
        }
        cursor.expect(",")?;
    }
}
