//! Compile driver: file in, rules out.
//!
//! Wraps the language pipeline with file loading and diagnostics that
//! carry the source file name, in the shape `file:line:col: token:
//! message`.

use std::fs;
use std::path::Path;

use makeshift_language::{CompiledTarget, Program};
use thiserror::Error;

/// Errors surfaced by the driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The source file could not be read.
    #[error("{path}: {source}")]
    Io {
        /// The path that failed to open.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Compilation failed; the position inside the file is carried by
    /// the inner error.
    #[error("{file}:{source}")]
    Compile {
        /// The source file being compiled.
        file: String,
        /// The compile error with its token context.
        source: makeshift_foundation::Error,
    },
}

/// Compiles a source string, optionally restricted to one target name.
///
/// `file` is only used to label diagnostics.
pub fn compile_source(
    source: &str,
    file: &str,
    target: Option<&str>,
) -> Result<Vec<CompiledTarget>, DriverError> {
    let compiled = (|| {
        let program = Program::parse(source)?;
        match target {
            Some(name) => program.compile_matching(name),
            None => program.compile_all(),
        }
    })();
    compiled.map_err(|source| DriverError::Compile {
        file: file.to_string(),
        source,
    })
}

/// Reads and compiles a source file, optionally restricted to one
/// target name.
pub fn compile_file(
    path: &Path,
    target: Option<&str>,
) -> Result<Vec<CompiledTarget>, DriverError> {
    let source = fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.display().to_string(),
        source,
    })?;
    compile_source(&source, &path.display().to_string(), target)
}
