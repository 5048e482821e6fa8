//! Immutable layered environments.
//!
//! An [`Env`] layers a per-invocation local frame over the global binding
//! table. Frames are never mutated after construction: each macro call
//! forks a fresh environment, and the persistent maps make that fork O(1).

use im::HashMap;

use crate::value::Value;

/// An immutable mapping from identifiers to values.
///
/// Lookup order is the local frame first, then the globals.
#[derive(Clone, Debug, Default)]
pub struct Env {
    /// Global bindings, frozen before any expansion begins.
    globals: HashMap<String, Value>,
    /// Local frame for the current macro invocation.
    locals: HashMap<String, Value>,
}

impl Env {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a global binding.
    ///
    /// Returns false if the name was already defined; the existing binding
    /// is left untouched.
    pub fn define_global(&mut self, name: impl Into<String>, value: Value) -> bool {
        let name = name.into();
        if self.globals.contains_key(&name) {
            return false;
        }
        self.globals.insert(name, value);
        true
    }

    /// Looks up a name, checking the local frame before the globals.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.locals.get(name).or_else(|| self.globals.get(name))
    }

    /// Returns true if the name resolves locally or globally.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Forks this environment with a fresh local frame.
    ///
    /// The globals are shared structurally; the previous local frame is
    /// discarded, so macro bodies never see their caller's locals.
    #[must_use]
    pub fn with_frame(&self, frame: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            globals: self.globals.clone(),
            locals: frame.into_iter().collect(),
        }
    }

    /// Returns the number of global bindings.
    #[must_use]
    pub fn global_count(&self) -> usize {
        self.globals.len()
    }
}
