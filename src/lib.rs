//! Makeshift - declarative build descriptions compiled to Makefile rules
//!
//! This crate re-exports all layers of the Makeshift system for
//! convenient access. For detailed documentation, see the individual
//! layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: makeshift_runtime    — emitter, compile driver, CLI
//! Layer 1: makeshift_language   — lexer, parser, macro expansion
//! Layer 0: makeshift_foundation — core types (Value, Env, Error)
//! ```

pub use makeshift_foundation as foundation;
pub use makeshift_language as language;
pub use makeshift_runtime as runtime;
