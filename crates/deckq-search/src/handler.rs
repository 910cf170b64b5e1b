//! Handler capabilities.
//!
//! A command is pure data; behaviour is attached as up to two handlers looked up by command id:
//! a [`FilterHandler`] for the server translator and an [`ExplainHandler`] for the explainer.

use crate::{
    argument::ParsedArgument,
    catalog::{Catalog, format_message},
    command::Command,
    error::HandlerError,
    filter::{Filter, PostAction},
};

/// What a filter handler produces for one expression.
#[derive(Debug, Clone)]
pub enum Clause {
    /// A predicate inlined into the filter tree.
    Filter(Filter),
    /// An action deferred to a later pipeline phase.
    Deferred(PostAction),
}

/// Builds backend filters for a command.
pub trait FilterHandler: Send + Sync {
    /// Translates one bound argument.
    fn filter(&self, arg: &ParsedArgument) -> Result<Clause, HandlerError>;
}

/// Builds plain-language explanations for a command.
pub trait ExplainHandler: Send + Sync {
    /// Explains one bound argument, or `None` when it cannot be explained.
    fn explain(&self, arg: &ParsedArgument, ctx: &ExplainContext<'_>) -> Option<String>;
}

/// A reusable handler kind that provides both capabilities and default command settings.
pub trait Builtin: FilterHandler + ExplainHandler {
    /// Short kind name, used for `builtin.{kind}.*` catalog keys and command metadata.
    fn kind(&self) -> &'static str;

    /// Fills in the operators, qualifiers and regex support this kind understands.
    ///
    /// Settings the command already declares are kept.
    fn configure(&self, command: Command) -> Command;
}

/// What an explain handler can see besides its argument.
pub struct ExplainContext<'a> {
    /// Message source.
    pub catalog: &'a dyn Catalog,
    /// The resolved command.
    pub command: &'a Command,
}

impl ExplainContext<'_> {
    /// The localized display name of the command.
    pub fn command_name(&self) -> String {
        let key = format!("command.{}", self.command.message_prefix());
        self.catalog
            .message(&key)
            .map_or_else(|| self.command.message_prefix().to_string(), String::from)
    }

    /// Looks up `{command}.{key}`, then `builtin.{kind}.{key}`, and formats it.
    ///
    /// The builtin fallback also receives a `command` parameter.
    pub fn message(&self, kind: &str, key: &str, params: &[(&str, String)]) -> Option<String> {
        let specific = format!("{}.{key}", self.command.message_prefix());
        if let Some(template) = self.catalog.message(&specific) {
            return Some(format_message(template, params));
        }

        let template = self.catalog.message(&format!("builtin.{kind}.{key}"))?;
        let mut params = params.to_vec();
        params.push(("command", self.command_name()));
        Some(format_message(template, &params))
    }
}
