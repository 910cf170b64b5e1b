//! Command registry.
//!
//! A [`Registry`] is built once from static domain data and is immutable afterward, so it can be
//! shared across threads without locking. Invalid definitions are rejected by
//! [`RegistryBuilder::build`].

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

use deckq_query::Operator;
use tracing::debug;

use crate::{
    command::Command,
    error::RegistryError,
    handler::{Builtin, ExplainHandler, FilterHandler},
    pattern::Pattern,
};

/// A command found by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'r> {
    /// The command.
    pub command: &'r Command,
    /// Canonical modifier name, when invoked as `command.modifier`.
    pub modifier: Option<&'r str>,
}

/// A raw value that matched a command's pattern template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch<'r> {
    /// The command owning the template.
    pub command: &'r Command,
    /// Named captures.
    pub captures: BTreeMap<String, String>,
    /// The argument value: the single capture, or the whole text.
    pub value: String,
}

/// Collects commands and handlers before validation.
#[derive(Default)]
pub struct RegistryBuilder {
    /// Commands in registration order.
    commands: Vec<Command>,
    /// Filter handlers by command id.
    filters: Vec<(String, Arc<dyn FilterHandler>)>,
    /// Explain handlers by command id.
    explainers: Vec<(String, Arc<dyn ExplainHandler>)>,
}

impl RegistryBuilder {
    /// Adds a command with no handlers.
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Attaches a filter handler to a command id.
    pub fn filter(mut self, id: impl Into<String>, handler: impl FilterHandler + 'static) -> Self {
        let handler: Arc<dyn FilterHandler> = Arc::new(handler);
        self.filters.push((id.into(), handler));
        self
    }

    /// Attaches an explain handler to a command id.
    pub fn explainer(
        mut self,
        id: impl Into<String>,
        handler: impl ExplainHandler + 'static,
    ) -> Self {
        let handler: Arc<dyn ExplainHandler> = Arc::new(handler);
        self.explainers.push((id.into(), handler));
        self
    }

    /// Adds a command backed by a builtin kind, attaching both of its handlers.
    pub fn builtin(mut self, command: Command, kind: impl Builtin + 'static) -> Self {
        let command = kind.configure(command).meta("kind", kind.kind());
        let kind = Arc::new(kind);
        let filter: Arc<dyn FilterHandler> = kind.clone();
        let explainer: Arc<dyn ExplainHandler> = kind;
        self.filters.push((command.id.clone(), filter));
        self.explainers.push((command.id.clone(), explainer));
        self.commands.push(command);
        self
    }

    /// Validates the definitions and builds the registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut patterns = Vec::new();
        let mut raw = None;

        for (index, command) in self.commands.iter().enumerate() {
            if command.is_raw() {
                if raw.replace(index).is_some() {
                    return Err(RegistryError::DuplicateId(String::new()));
                }
            } else if let Some(existing) = by_name.insert(command.id.to_lowercase(), index) {
                let existing = &self.commands[existing];
                if existing.id.eq_ignore_ascii_case(&command.id) {
                    return Err(RegistryError::DuplicateId(command.id.clone()));
                }
                return Err(RegistryError::AliasCollision {
                    alias: command.id.clone(),
                    command: command.id.clone(),
                    existing: existing.id.clone(),
                });
            }

            for alias in &command.aliases {
                if alias.is_empty() {
                    return Err(RegistryError::EmptyAlias(command.id.clone()));
                }
                if let Some(existing) = by_name.insert(alias.to_lowercase(), index) {
                    return Err(RegistryError::AliasCollision {
                        alias: alias.clone(),
                        command: command.id.clone(),
                        existing: self.commands[existing].id.clone(),
                    });
                }
            }

            if !command.patterns.is_empty() && !command.operators.contains(&Operator::Bare) {
                return Err(RegistryError::PatternWithoutBare(command.id.clone()));
            }
            for template in &command.patterns {
                let pattern =
                    Pattern::parse(template).map_err(|source| RegistryError::MalformedPattern {
                        command: command.id.clone(),
                        template: template.clone(),
                        source,
                    })?;
                patterns.push((index, pattern));
            }
        }

        let known = |id: &str| self.commands.iter().any(|c| c.id == id);
        let handler_ids = self
            .filters
            .iter()
            .map(|(id, _)| id)
            .chain(self.explainers.iter().map(|(id, _)| id));
        for id in handler_ids {
            if !known(id) {
                return Err(RegistryError::UnknownHandlerCommand(id.clone()));
            }
        }

        let filters = unique_handlers(self.filters, "filter")?;
        let explainers = unique_handlers(self.explainers, "explain")?;

        if let Some(command) = self
            .commands
            .iter()
            .find(|c| c.phase.is_some() && !filters.contains_key(&c.id))
        {
            return Err(RegistryError::PhaseWithoutHandler(command.id.clone()));
        }

        debug!(
            commands = self.commands.len(),
            patterns = patterns.len(),
            "built command registry"
        );
        Ok(Registry {
            commands: self.commands,
            by_name,
            patterns,
            raw,
            filters,
            explainers,
        })
    }
}

/// Indexes handlers by command id, rejecting a second handler for the same id.
fn unique_handlers<H: ?Sized>(
    handlers: Vec<(String, Arc<H>)>,
    role: &'static str,
) -> Result<HashMap<String, Arc<H>>, RegistryError> {
    let mut by_id = HashMap::with_capacity(handlers.len());
    for (id, handler) in handlers {
        if by_id.contains_key(&id) {
            return Err(RegistryError::DuplicateHandler { command: id, role });
        }
        by_id.insert(id, handler);
    }
    Ok(by_id)
}

/// An immutable table of commands and their handlers.
pub struct Registry {
    /// Commands in registration order.
    commands: Vec<Command>,
    /// Lowercased id or alias to command index.
    by_name: HashMap<String, usize>,
    /// Parsed templates with their command index, in registration order.
    patterns: Vec<(usize, Pattern)>,
    /// Index of the raw command.
    raw: Option<usize>,
    /// Filter handlers by command id.
    filters: HashMap<String, Arc<dyn FilterHandler>>,
    /// Explain handlers by command id.
    explainers: HashMap<String, Arc<dyn ExplainHandler>>,
}

impl Registry {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// All commands, in registration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The command with exactly this id.
    pub fn get(&self, id: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.id == id)
    }

    /// The raw command, if one is registered.
    pub fn raw(&self) -> Option<&Command> {
        self.raw.map(|index| &self.commands[index])
    }

    /// Resolves a command name as written in a query.
    ///
    /// Tries an exact id or alias first, then the dotted `command.modifier` form, where the
    /// modifier may be given by name or short alias.
    pub fn lookup(&self, name: &str) -> Option<Resolved<'_>> {
        let lower = name.to_lowercase();
        if let Some(&index) = self.by_name.get(&lower) {
            return Some(Resolved {
                command: &self.commands[index],
                modifier: None,
            });
        }

        let (base, modifier) = lower.split_once('.')?;
        let command = &self.commands[*self.by_name.get(base)?];
        let modifier = command.resolve_modifier(modifier)?;
        Some(Resolved {
            command,
            modifier: Some(modifier),
        })
    }

    /// Matches a raw value against every pattern template, in registration order.
    pub fn match_pattern(&self, text: &str) -> Option<PatternMatch<'_>> {
        self.patterns.iter().find_map(|(index, pattern)| {
            let captures = pattern.matches(text)?;
            let value = if captures.len() == 1 {
                captures.values().next().cloned().unwrap_or_default()
            } else {
                text.to_string()
            };
            Some(PatternMatch {
                command: &self.commands[*index],
                captures,
                value,
            })
        })
    }

    /// The filter handler for a command id.
    pub fn filter_handler(&self, id: &str) -> Option<&dyn FilterHandler> {
        self.filters.get(id).map(Arc::as_ref)
    }

    /// The explain handler for a command id.
    pub fn explain_handler(&self, id: &str) -> Option<&dyn ExplainHandler> {
        self.explainers.get(id).map(Arc::as_ref)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field(
                "commands",
                &self.commands.iter().map(|c| &c.id).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
