//! Program assembly and target compilation.
//!
//! [`Program::parse`] runs the front half of the pipeline (lex, fuse,
//! split, structural parse) and freezes the global environment and macro
//! table. Target compilation then runs independently per target: the
//! frozen state is only read, so compiling one target can never affect
//! another.

use makeshift_foundation::{Env, Error, ErrorContext, Result, Value};

use crate::ast::{Target, TargetBody};
use crate::expander::{Expander, MAX_EXPANSION_DEPTH, split_at_breaks};
use crate::fuse::fuse;
use crate::lexer::Lexer;
use crate::macro_registry::MacroRegistry;
use crate::parser::{parse_binding, parse_macro_group, parse_target};
use crate::splitter::{FormKind, split_forms};
use crate::token::Token;

/// A fully compiled Makefile rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledTarget {
    /// The rule's left-hand side.
    pub target: String,
    /// Prerequisites, in source order.
    pub deps: Vec<String>,
    /// Recipe lines; each line's terms are joined with single spaces at
    /// emission time.
    pub recipe: Vec<Vec<String>>,
}

/// A parsed program: the shared token array plus the frozen global
/// environment, macro table, and raw targets.
#[derive(Clone, Debug)]
pub struct Program {
    /// The fused token array; all body ranges index into it.
    tokens: Vec<Token>,
    /// Global bindings, frozen after parsing.
    env: Env,
    /// Macro groups, frozen after parsing.
    registry: MacroRegistry,
    /// Raw targets in source order.
    targets: Vec<Target>,
    /// Recursion limit for expansion.
    max_depth: usize,
}

impl Program {
    /// Parses source text into a program.
    ///
    /// All bindings and macro groups are collected before any target is
    /// compiled, so definitions may appear after their uses in the
    /// source.
    pub fn parse(source: &str) -> Result<Self> {
        let tokens = fuse(Lexer::tokenize_all(source)?);
        let forms = split_forms(&tokens)?;

        let mut env = Env::new();
        let mut registry = MacroRegistry::new();
        let mut targets = Vec::new();

        for form in &forms {
            match form.kind {
                FormKind::Binding => {
                    let binding = parse_binding(&tokens, form)?;
                    let span = binding.span;
                    let name = binding.name.clone();
                    if !env.define_global(binding.name, binding.value) {
                        return Err(Error::invalid_syntax(format!(
                            "'{name}' is already bound"
                        ))
                        .with_context(ErrorContext::new(name, span.line, span.column)));
                    }
                }
                FormKind::MacroGroup => {
                    registry.register(parse_macro_group(&tokens, form)?)?;
                }
                FormKind::Target => {
                    targets.push(parse_target(&tokens, form)?);
                }
            }
        }

        Ok(Self {
            tokens,
            env,
            registry,
            targets,
            max_depth: MAX_EXPANSION_DEPTH,
        })
    }

    /// Overrides the expansion recursion limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the raw targets in source order.
    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Compiles every target in source order.
    pub fn compile_all(&self) -> Result<Vec<CompiledTarget>> {
        self.targets
            .iter()
            .map(|target| self.compile_target(target))
            .collect()
    }

    /// Compiles only the targets whose resolved left-hand side equals
    /// `name`.
    pub fn compile_matching(&self, name: &str) -> Result<Vec<CompiledTarget>> {
        let mut compiled = Vec::new();
        for target in &self.targets {
            if self.resolve_head(target)? == name {
                compiled.push(self.compile_target(target)?);
            }
        }
        Ok(compiled)
    }

    /// Compiles a single target into a rule.
    pub fn compile_target(&self, target: &Target) -> Result<CompiledTarget> {
        let mut expander =
            Expander::new(&self.tokens, &self.registry).with_max_depth(self.max_depth);
        let at = target_context(target);

        let head = self.resolve_head(target)?;
        let deps = self.resolve_deps(target, &expander)?;

        let fragments = match &target.body {
            TargetBody::Direct { binders, body } => {
                let mut frame = Vec::new();
                if let Some(binder) = binders.first() {
                    frame.push((binder.clone(), Value::Str(head.clone())));
                }
                if let Some(binder) = binders.get(1) {
                    let items = deps.iter().cloned().map(Value::Str).collect();
                    frame.push((binder.clone(), Value::List(items)));
                }
                let call_env = self.env.with_frame(frame);
                expander.expand_body(body.clone(), &call_env)?
            }
            TargetBody::Delegate { name } => {
                let items = deps.iter().cloned().map(Value::Str).collect();
                let args = vec![Value::Str(head.clone()), Value::List(items)];
                expander.expand_group_call(name, args, &self.env, at)?
            }
        };

        Ok(CompiledTarget {
            target: head,
            deps,
            recipe: split_at_breaks(fragments),
        })
    }

    /// Resolves a target's head to the rule's left-hand side.
    fn resolve_head(&self, target: &Target) -> Result<String> {
        let at = target_context(target);
        let expander =
            Expander::new(&self.tokens, &self.registry).with_max_depth(self.max_depth);
        match expander.resolve(&target.head, &self.env, &at)? {
            Value::Str(s) => Ok(s),
            other => Err(Error::shape(format!(
                "target name must resolve to a string, got a {}",
                other.type_name()
            ))
            .with_context(at)),
        }
    }

    /// Resolves a target's dependency expression to prerequisite names.
    fn resolve_deps(&self, target: &Target, expander: &Expander<'_>) -> Result<Vec<String>> {
        let at = target_context(target);
        let resolved = expander.resolve(&target.deps, &self.env, &at)?;
        let mut deps = Vec::new();
        flatten_strings(&resolved, &at, &mut deps)?;
        Ok(deps)
    }
}

/// Collects every string inside a resolved value, in order.
fn flatten_strings(value: &Value, at: &ErrorContext, out: &mut Vec<String>) -> Result<()> {
    match value {
        Value::Str(s) => {
            out.push(s.clone());
            Ok(())
        }
        Value::List(items) | Value::Tuple(items) => {
            for item in items {
                flatten_strings(item, at, out)?;
            }
            Ok(())
        }
        Value::Atom(name) => {
            Err(Error::undefined_name(name.clone()).with_context(at.clone()))
        }
    }
}

/// Error context anchored at a target's `do` keyword.
fn target_context(target: &Target) -> ErrorContext {
    ErrorContext::new("do", target.span.line, target.span.column)
}

/// Parses and compiles every target of a source text.
///
/// Convenience entry point for callers that do not need the parsed
/// [`Program`].
pub fn compile(source: &str) -> Result<Vec<CompiledTarget>> {
    Program::parse(source)?.compile_all()
}
