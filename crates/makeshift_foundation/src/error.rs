//! Error types for the Makeshift compiler.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every error is fatal: the first one aborts compilation.

use std::fmt;

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Makeshift operations.
#[derive(Debug)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// The offending token and its position, when known.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds token context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid syntax error.
    #[must_use]
    pub fn invalid_syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSyntax(message.into()))
    }

    /// Creates an undefined name error.
    #[must_use]
    pub fn undefined_name(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UndefinedName(name.into()))
    }

    /// Creates an undefined macro error.
    #[must_use]
    pub fn undefined_macro(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UndefinedMacro(name.into()))
    }

    /// Creates a no-matching-clause error.
    #[must_use]
    pub fn no_matching_clause(name: impl Into<String>, args: usize) -> Self {
        Self::new(ErrorKind::NoMatchingClause {
            name: name.into(),
            args,
        })
    }

    /// Creates an arity error for a delegated target.
    #[must_use]
    pub fn arity(name: impl Into<String>, args: usize) -> Self {
        Self::new(ErrorKind::ArityError {
            name: name.into(),
            args,
        })
    }

    /// Creates a shape error.
    #[must_use]
    pub fn shape(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ShapeError(message.into()))
    }

    /// Creates an expansion depth error.
    #[must_use]
    pub fn depth_exceeded(limit: usize) -> Self {
        Self::new(ErrorKind::ExpansionDepthExceeded { limit })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{ctx}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ErrorKind {
    /// Lexing or structural parse failure.
    #[error("invalid syntax: {0}")]
    InvalidSyntax(String),

    /// Identifier resolves neither locally nor globally and is not a macro.
    #[error("undefined name: {0}")]
    UndefinedName(String),

    /// Macro call whose name has no registered group.
    #[error("undefined macro: {0}")]
    UndefinedMacro(String),

    /// Macro call whose argument count fits no clause.
    #[error("no clause of {name} matches {args} argument(s)")]
    NoMatchingClause {
        /// The macro group that was called.
        name: String,
        /// The number of arguments supplied.
        args: usize,
    },

    /// Delegated target whose header fits no clause of the delegate.
    #[error("target header with {args} argument(s) does not match any clause of {name}")]
    ArityError {
        /// The delegate macro group.
        name: String,
        /// The number of header arguments supplied.
        args: usize,
    },

    /// Spread applied to a non-sequence value.
    #[error("shape error: {0}")]
    ShapeError(String),

    /// Recursion guard tripped during expansion.
    #[error("macro expansion depth exceeded {limit}")]
    ExpansionDepthExceeded {
        /// The configured depth limit.
        limit: usize,
    },
}

/// The offending token and where it sits in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Literal text of the offending token.
    pub token: String,
    /// 0-based line number.
    pub line: u32,
    /// 0-based column number.
    pub column: u32,
}

impl ErrorContext {
    /// Creates a context from a token's text and position.
    #[must_use]
    pub fn new(token: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            token: token.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.token)
    }
}
