//! Makefile rule formatting.
//!
//! Each compiled target becomes `target: dep₀ dep₁ …` followed by one
//! tab-indented line per recipe step, terms joined with single spaces.
//! A blank line separates successive rules. No Make variables,
//! conditionals, or pattern rules are ever produced.

use makeshift_language::CompiledTarget;

/// Formats a single rule.
#[must_use]
pub fn emit_rule(rule: &CompiledTarget) -> String {
    let mut out = String::new();
    out.push_str(&rule.target);
    out.push(':');
    for dep in &rule.deps {
        out.push(' ');
        out.push_str(dep);
    }
    out.push('\n');
    for line in &rule.recipe {
        out.push('\t');
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Formats a sequence of rules, blank-line separated.
#[must_use]
pub fn emit_all(rules: &[CompiledTarget]) -> String {
    rules
        .iter()
        .map(emit_rule)
        .collect::<Vec<_>>()
        .join("\n")
}
