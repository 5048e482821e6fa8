//! Lexer, parser, and macro expansion engine for the Makeshift build
//! language.
//!
//! This crate provides the full front end and expansion pipeline:
//! - [`Span`], [`Token`] - Source positions and text tokens
//! - [`Lexer`] - Tokenization of Makeshift source
//! - [`fuse`] - Fusion of the `->` and `...` operators
//! - [`split_forms`] - Top-level form extraction
//! - [`parser`] - Structural parsing into [`ast`] nodes
//! - [`Expander`] - Macro expansion into evaluated sequences
//! - [`Program`] - Whole-program compilation into [`CompiledTarget`]s
//!
//! # Example
//!
//! ```
//! use makeshift_language::compile;
//!
//! let rules = compile("do ('a', ['b']) -> (t, d) -> 'cp' d t .").unwrap();
//! assert_eq!(rules[0].target, "a");
//! assert_eq!(rules[0].recipe, vec![vec!["cp", "b", "a"]]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod ast;
pub mod compiler;
pub mod expander;
pub mod fuse;
pub mod lexer;
pub mod macro_registry;
pub mod parser;
pub mod span;
pub mod splitter;
pub mod token;


// Re-exports for convenience
pub use ast::{Binding, MacroClause, MacroGroup, Param, Target, TargetBody};
pub use compiler::{CompiledTarget, Program, compile};
pub use expander::{Expander, Fragment, MAX_EXPANSION_DEPTH, bind_clause, split_at_breaks};
pub use fuse::fuse;
pub use lexer::Lexer;
pub use macro_registry::MacroRegistry;
pub use parser::{parse_binding, parse_macro_group, parse_target};
pub use span::Span;
pub use splitter::{Form, FormKind, split_forms};
pub use token::Token;
