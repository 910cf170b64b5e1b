//! Query translation.
//!
//! The traversal is written once in [`Translator`] and parameterized by a [`Target`], which
//! decides what a bound leaf becomes and how fragments combine. Two targets exist: the server
//! [`FilterTarget`] and the [`ExplainTarget`].

mod explain;
mod server;

use std::panic::{self, AssertUnwindSafe};

use deckq_query::{Expr, ExprKind, Operator, Separator, Span};
use regex::RegexBuilder;
use tracing::{debug, error};

pub use self::{
    explain::{ExplainTarget, Explanation},
    server::{FilterTarget, FilterTranslation},
};
use crate::{
    argument::{ArgValue, ParsedArgument},
    command::Command,
    error::TranslateError,
    registry::Registry,
};

/// A leaf expression bound to its command.
#[derive(Debug, Clone)]
pub struct Binding<'r> {
    /// The resolved command.
    pub command: &'r Command,
    /// The handler input.
    pub argument: ParsedArgument,
    /// Location of the expression.
    pub span: Span,
    /// Whether the expression is at the top level of the query.
    pub top_level: bool,
}

/// What a target produced for one leaf.
#[derive(Debug, Clone)]
pub enum Leaf<F, P> {
    /// A fragment composed into the result tree.
    Fragment(F),
    /// A deferred post-action.
    Deferred(P),
}

/// The result of translating an expression.
#[derive(Debug, Clone)]
pub struct Translation<F, P> {
    /// The composed fragment; `None` when every leaf was deferred.
    pub fragment: Option<F>,
    /// Deferred actions, in query order.
    pub post_actions: Vec<P>,
}

/// Output flavour for the shared traversal.
pub trait Target {
    /// Composable result of a leaf.
    type Fragment;
    /// Deferred result of a phase command.
    type PostAction;

    /// Produces the result for one validated leaf.
    fn leaf(
        &self,
        registry: &Registry,
        binding: &Binding<'_>,
    ) -> Result<Leaf<Self::Fragment, Self::PostAction>, TranslateError>;

    /// Conjunction of two or more fragments.
    fn all(&self, parts: Vec<Self::Fragment>) -> Self::Fragment;

    /// Disjunction of two or more fragments.
    fn any(&self, parts: Vec<Self::Fragment>) -> Self::Fragment;

    /// Negation of a fragment.
    fn negate(&self, fragment: Self::Fragment) -> Self::Fragment;

    /// A parenthesized fragment.
    fn group(&self, fragment: Self::Fragment) -> Self::Fragment {
        fragment
    }
}

/// Walks an expression tree, binding leaves to registry commands.
#[derive(Debug)]
pub struct Translator<'r, T> {
    /// Command source.
    registry: &'r Registry,
    /// Output flavour.
    target: T,
}

impl<'r, T: Target> Translator<'r, T> {
    /// Creates a translator.
    pub const fn new(registry: &'r Registry, target: T) -> Self {
        Self { registry, target }
    }

    /// The output flavour.
    pub const fn target(&self) -> &T {
        &self.target
    }

    /// Translates an expression.
    pub fn translate(
        &self,
        expr: &Expr,
    ) -> Result<Translation<T::Fragment, T::PostAction>, TranslateError> {
        match &expr.kind {
            ExprKind::Logic {
                separator,
                children,
            } => {
                let mut results = Vec::with_capacity(children.len());
                for child in children {
                    results.push(self.translate(child)?);
                }
                Ok(self.combine(*separator, results))
            }
            ExprKind::Not { inner } => {
                let result = self.translate(inner)?;
                Ok(Translation {
                    fragment: result.fragment.map(|f| self.target.negate(f)),
                    post_actions: result.post_actions,
                })
            }
            ExprKind::Paren { inner } => {
                let result = self.translate(inner)?;
                Ok(Translation {
                    fragment: result.fragment.map(|f| self.target.group(f)),
                    post_actions: result.post_actions,
                })
            }
            ExprKind::Simple {
                command,
                operator,
                qualifiers,
                arg_kind,
                raw_value,
            } => {
                let resolved =
                    self.registry
                        .lookup(command)
                        .ok_or_else(|| TranslateError::UnknownCommand {
                            name: command.clone(),
                            span: expr.span,
                        })?;
                let mut argument =
                    ParsedArgument::new(*operator, ArgValue::from_raw(*arg_kind, raw_value));
                argument.qualifiers = qualifiers.clone();
                argument.modifier = resolved.modifier.map(String::from);
                self.invoke(resolved.command, argument, expr)
            }
            ExprKind::Raw {
                arg_kind,
                raw_value,
            } => self.dispatch_raw(ArgValue::from_raw(*arg_kind, raw_value), expr),
            ExprKind::Hash { tag } => self.dispatch_raw(ArgValue::text(format!("#{tag}")), expr),
            ExprKind::Slash { parts } => self.translate_slash(parts, expr),
        }
    }

    /// Merges sibling results under one separator.
    fn combine(
        &self,
        separator: Separator,
        results: Vec<Translation<T::Fragment, T::PostAction>>,
    ) -> Translation<T::Fragment, T::PostAction> {
        let mut fragments = Vec::new();
        let mut post_actions = Vec::new();
        for result in results {
            fragments.extend(result.fragment);
            post_actions.extend(result.post_actions);
        }

        let fragment = match fragments.len() {
            0 => None,
            1 => fragments.pop(),
            _ => Some(match separator {
                Separator::And => self.target.all(fragments),
                Separator::Or => self.target.any(fragments),
            }),
        };
        Translation {
            fragment,
            post_actions,
        }
    }

    /// `a/b/c`: a pattern match on the joined text, or else an alternation of raw values.
    fn translate_slash(
        &self,
        parts: &[String],
        expr: &Expr,
    ) -> Result<Translation<T::Fragment, T::PostAction>, TranslateError> {
        let joined = parts.join("/");
        if self.registry.match_pattern(&joined).is_some() {
            return self.dispatch_raw(ArgValue::text(joined), expr);
        }

        let mut results = Vec::with_capacity(parts.len());
        for part in parts {
            results.push(self.dispatch_raw(ArgValue::text(part.clone()), expr)?);
        }
        Ok(self.combine(Separator::Or, results))
    }

    /// Binds a value with no command prefix: pattern templates first, then the raw command.
    fn dispatch_raw(
        &self,
        value: ArgValue,
        expr: &Expr,
    ) -> Result<Translation<T::Fragment, T::PostAction>, TranslateError> {
        if let Some(text) = value.as_text()
            && let Some(found) = self.registry.match_pattern(text)
        {
            debug!(command = %found.command.id, value = text, "pattern matched");
            let mut argument = ParsedArgument::new(Operator::Bare, ArgValue::text(found.value));
            argument.captures = found.captures;
            return self.invoke(found.command, argument, expr);
        }

        let raw = self
            .registry
            .raw()
            .ok_or_else(|| TranslateError::UnknownCommand {
                name: value.display(),
                span: expr.span,
            })?;
        self.invoke(raw, ParsedArgument::new(Operator::Bare, value), expr)
    }

    /// Validates a binding and hands it to the target.
    fn invoke(
        &self,
        command: &Command,
        argument: ParsedArgument,
        expr: &Expr,
    ) -> Result<Translation<T::Fragment, T::PostAction>, TranslateError> {
        validate(command, &argument, expr)?;
        let binding = Binding {
            command,
            argument,
            span: expr.span,
            top_level: expr.top_level,
        };
        let leaf = self.target.leaf(self.registry, &binding)?;
        Ok(match leaf {
            Leaf::Fragment(fragment) => Translation {
                fragment: Some(fragment),
                post_actions: Vec::new(),
            },
            Leaf::Deferred(action) => Translation {
                fragment: None,
                post_actions: vec![action],
            },
        })
    }
}

/// Checks regex support, operator and placement before a handler runs.
fn validate(
    command: &Command,
    argument: &ParsedArgument,
    expr: &Expr,
) -> Result<(), TranslateError> {
    if let ArgValue::Regex { pattern, flags } = &argument.value {
        if !command.allow_regex {
            return Err(TranslateError::InvalidRegex {
                command: command.id.clone(),
                span: expr.span,
            });
        }
        compile_regex(pattern, flags).map_err(|message| TranslateError::MalformedRegex {
            message,
            span: expr.span,
        })?;
    }

    if !command.accepts(argument.operator, &argument.qualifiers) {
        return Err(TranslateError::InvalidOperator {
            command: command.id.clone(),
            operator: argument.operator_text(),
            span: expr.span,
        });
    }

    if command.phase.is_some() && !expr.top_level {
        return Err(TranslateError::NotTopLevel {
            command: command.id.clone(),
            span: expr.span,
        });
    }

    Ok(())
}

/// Compiles a regex literal to check it, honouring the `i`, `m`, `s` and `x` flags.
fn compile_regex(pattern: &str, flags: &str) -> Result<(), String> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            other => return Err(format!("unknown regex flag '{other}'")),
        };
    }
    builder.build().map(|_| ()).map_err(|e| e.to_string())
}

/// Runs a handler, turning a panic into [`TranslateError::Internal`].
fn guard<R>(binding: &Binding<'_>, run: impl FnOnce() -> R) -> Result<R, TranslateError> {
    panic::catch_unwind(AssertUnwindSafe(run)).map_err(|_| {
        error!(command = %binding.command.id, "handler panicked");
        TranslateError::Internal {
            command: binding.command.id.clone(),
            span: binding.span,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_flags_are_checked() {
        assert!(compile_regex("^gob", "im").is_ok());
        assert_eq!(
            compile_regex("gob", "q"),
            Err("unknown regex flag 'q'".to_string())
        );
        assert!(compile_regex("(unclosed", "").is_err());
    }
}
