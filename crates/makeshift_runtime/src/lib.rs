//! Makefile emitter, compile driver, and CLI for Makeshift.
//!
//! This crate wraps the language pipeline into a batch compiler: it
//! loads a source file, compiles every requested target, and formats the
//! result as GNU Makefile rules on stdout.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod driver;
pub mod emitter;

pub use driver::{DriverError, compile_file, compile_source};
pub use emitter::{emit_all, emit_rule};
