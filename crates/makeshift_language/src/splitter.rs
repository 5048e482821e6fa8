//! Top-level form extraction.
//!
//! Scans the fused token stream and cuts out the three kinds of top-level
//! forms, each running from its leading keyword to the next `.` token
//! inclusive. Slices are produced in source order and never overlap; any
//! token outside a form is ignored.

use makeshift_foundation::{Error, ErrorContext, Result};

use crate::token::Token;

/// The three top-level form kinds, keyed by leading keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormKind {
    /// `let NAME = VALUE .`
    Binding,
    /// `macro NAME (PARAMS) -> BODY [; ...]* .`
    MacroGroup,
    /// `do (HEAD, DEPS) -> ... .`
    Target,
}

/// A half-open range of tokens making up one top-level form.
///
/// Indices refer into the shared token array so later stages can slice
/// bodies out of it without copying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Form {
    /// Which kind of form this slice holds.
    pub kind: FormKind,
    /// Index of the leading keyword token.
    pub start: usize,
    /// Index one past the terminating `.` token.
    pub end: usize,
}

impl Form {
    /// Returns this form's tokens from the shared array.
    #[must_use]
    pub fn tokens<'a>(&self, tokens: &'a [Token]) -> &'a [Token] {
        &tokens[self.start..self.end]
    }
}

/// Splits the fused token stream into top-level forms.
///
/// # Errors
/// Returns `InvalidSyntax` when a form's terminating `.` is missing.
pub fn split_forms(tokens: &[Token]) -> Result<Vec<Form>> {
    let mut forms = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let kind = match tokens[i].text.as_str() {
            "let" => FormKind::Binding,
            "macro" => FormKind::MacroGroup,
            "do" => FormKind::Target,
            _ => {
                i += 1;
                continue;
            }
        };

        let terminator = tokens[i..]
            .iter()
            .position(|t| t.is("."))
            .ok_or_else(|| {
                Error::invalid_syntax("missing terminating '.'")
                    .with_context(ErrorContext::from(&tokens[i]))
            })?;

        let end = i + terminator + 1;
        forms.push(Form {
            kind,
            start: i,
            end,
        });
        i = end;
    }

    Ok(forms)
}
