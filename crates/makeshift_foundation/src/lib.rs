//! Core values, environments, and errors for Makeshift.
//!
//! This crate provides:
//! - [`Value`] - The compile-time value domain (strings, atoms, lists, tuples)
//! - [`Env`] - Immutable layered environments for expansion
//! - [`Error`] - Rich error types with token context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod env;
pub mod error;
pub mod value;

pub use env::Env;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use value::Value;
