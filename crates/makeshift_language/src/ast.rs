//! Structural AST for top-level forms.
//!
//! Macro clause and target bodies are kept as half-open ranges into the
//! shared token array rather than copied out: expansion is token-driven,
//! and the array is immutable for the whole compilation.

use std::ops::Range;

use makeshift_foundation::Value;

use crate::span::Span;

/// A global, immutable name→value association introduced by `let`.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    /// The bound name.
    pub name: String,
    /// The bound value.
    pub value: Value,
    /// Position of the name token.
    pub span: Span,
}

/// A macro parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Param {
    /// A normal positional parameter.
    Regular(String),
    /// A `...`-marked parameter capturing the trailing arguments as a
    /// list. Only valid in the last position.
    Variadic(String),
}

impl Param {
    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Regular(name) | Self::Variadic(name) => name,
        }
    }

    /// Returns true if this is a variadic parameter.
    #[must_use]
    pub const fn is_variadic(&self) -> bool {
        matches!(self, Self::Variadic(_))
    }
}

/// One arity alternative within a macro group.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroClause {
    /// The clause's parameters, in declaration order.
    pub params: Vec<Param>,
    /// The clause body as a range into the shared token array.
    pub body: Range<usize>,
}

impl MacroClause {
    /// Returns true if this clause ends with a variadic parameter.
    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(Param::is_variadic)
    }

    /// Returns the number of required positional parameters.
    #[must_use]
    pub fn min_arity(&self) -> usize {
        if self.is_variadic() {
            self.params.len() - 1
        } else {
            self.params.len()
        }
    }

    /// Returns true if a call with `count` arguments selects this clause.
    ///
    /// Matching is purely structural: a fixed clause requires an exact
    /// count, a variadic clause accepts its minimum or more (the tail may
    /// be empty).
    #[must_use]
    pub fn matches_arity(&self, count: usize) -> bool {
        if self.is_variadic() {
            count >= self.min_arity()
        } else {
            count == self.params.len()
        }
    }
}

/// The ordered set of clauses sharing a macro name.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroGroup {
    /// The shared macro name.
    pub name: String,
    /// Clauses in source order. Dispatch tries them in this order and
    /// must never reorder them.
    pub clauses: Vec<MacroClause>,
    /// Position of the first name token.
    pub span: Span,
}

impl MacroGroup {
    /// Selects the first clause matching the given argument count.
    #[must_use]
    pub fn select(&self, count: usize) -> Option<&MacroClause> {
        self.clauses.iter().find(|c| c.matches_arity(count))
    }
}

/// How a target produces its recipe.
#[derive(Clone, Debug, PartialEq)]
pub enum TargetBody {
    /// Canonical form: binder names over an inline body.
    Direct {
        /// Names bound to the target and its dependency list, in order.
        binders: Vec<String>,
        /// The body as a range into the shared token array.
        body: Range<usize>,
    },
    /// Delegated form: a macro invoked with the target header as
    /// arguments.
    Delegate {
        /// The delegate macro's name.
        name: String,
    },
}

/// A `do` definition producing one Makefile rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    /// The rule's left-hand side, unresolved.
    pub head: Value,
    /// The rule's prerequisites, unresolved.
    pub deps: Value,
    /// The recipe source.
    pub body: TargetBody,
    /// Position of the `do` keyword.
    pub span: Span,
}
