//! Registry for macro groups.
//!
//! Stores and retrieves macro groups by name. The registry is frozen
//! once parsing finishes; expansion only reads from it.

use std::collections::HashMap;

use makeshift_foundation::{Error, ErrorContext, Result};

use crate::ast::MacroGroup;

/// Registry for storing and looking up macro groups.
#[derive(Clone, Debug, Default)]
pub struct MacroRegistry {
    /// Map from macro name to its group of clauses.
    groups: HashMap<String, MacroGroup>,
}

impl MacroRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a macro group.
    ///
    /// # Errors
    /// Registering a second group under an existing name is a compile
    /// error; clauses belong to exactly one `macro` statement.
    pub fn register(&mut self, group: MacroGroup) -> Result<()> {
        if self.groups.contains_key(&group.name) {
            return Err(Error::invalid_syntax(format!(
                "macro '{}' is already defined",
                group.name
            ))
            .with_context(ErrorContext::new(
                group.name.clone(),
                group.span.line,
                group.span.column,
            )));
        }
        self.groups.insert(group.name.clone(), group);
        Ok(())
    }

    /// Looks up a macro group by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MacroGroup> {
        self.groups.get(name)
    }

    /// Returns true if a group is registered under the name.
    #[must_use]
    pub fn is_macro(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Returns the number of registered groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if no groups are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns all registered macro names.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }
}
