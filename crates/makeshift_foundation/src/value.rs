//! Core value type for Makeshift data.
//!
//! Values are produced by the structural parser and consumed by the
//! expansion engine. Only [`Value::Str`] may survive into an emitted
//! recipe; atoms, lists, and tuples must all be reduced away before
//! emission.

use std::fmt;

/// A compile-time value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// A literal string, unescaped and without its surrounding quotes.
    Str(String),
    /// A bare identifier that has not been resolved yet.
    Atom(String),
    /// An ordered sequence written with brackets.
    List(Vec<Value>),
    /// An ordered sequence written with parentheses.
    ///
    /// Semantically identical to [`Value::List`]; the authored shape is
    /// preserved so callers can tell the two apart.
    Tuple(Vec<Value>),
}

impl Value {
    /// Returns a human-readable name for this value's shape.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Atom(_) => "identifier",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
        }
    }

    /// Returns true if this value is a string.
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Self::Str(_))
    }

    /// Returns true if this value is a list or tuple.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::List(_) | Self::Tuple(_))
    }

    /// Attempts to extract the string contents.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract the atom name.
    #[must_use]
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(name) => Some(name),
            _ => None,
        }
    }

    /// Attempts to extract the items of a list or tuple.
    #[must_use]
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Consumes the value and returns the items of a list or tuple.
    #[must_use]
    pub fn into_items(self) -> Option<Vec<Value>> {
        match self {
            Self::List(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Atom(name) => write!(f, "{name}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}
