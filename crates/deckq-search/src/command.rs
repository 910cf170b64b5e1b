//! Command definitions.
//!
//! A command is plain data describing one queryable field: its names, the operators it accepts,
//! its modifiers and pattern templates. Behaviour is attached separately as handlers when the
//! command is added to a [`Registry`](crate::Registry).

use std::{
    collections::{BTreeMap, BTreeSet},
    iter,
};

use deckq_query::{Operator, Qualifier, Qualifiers};
use serde::Serialize;

/// A registered command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// Unique id; empty for the raw command.
    pub id: String,
    /// Alternative names.
    pub aliases: Vec<String>,
    /// Accepted operators.
    pub operators: BTreeSet<Operator>,
    /// Accepted qualifiers.
    pub qualifiers: Qualifiers,
    /// Modifier names mapped to an optional short alias.
    pub modifiers: BTreeMap<String, Option<String>>,
    /// Pattern templates a raw value can match to select this command.
    pub patterns: Vec<String>,
    /// Whether regex values are accepted.
    pub allow_regex: bool,
    /// Deferred phase, for commands that act after filtering.
    pub phase: Option<String>,
    /// Free-form metadata.
    pub metadata: BTreeMap<String, String>,
}

impl Command {
    /// Creates a command with no operators; builtins fill in their defaults.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            aliases: Vec::new(),
            operators: BTreeSet::new(),
            qualifiers: Qualifiers::new(),
            modifiers: BTreeMap::new(),
            patterns: Vec::new(),
            allow_regex: false,
            phase: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Creates the raw command, the fallback for bare values.
    pub fn raw() -> Self {
        Self::new("")
    }

    /// Adds an alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Replaces the accepted operators.
    pub fn operators(mut self, operators: impl IntoIterator<Item = Operator>) -> Self {
        self.operators = operators.into_iter().collect();
        self
    }

    /// Adds an accepted qualifier.
    pub fn qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.insert(qualifier);
        self
    }

    /// Adds a modifier with an optional short alias.
    pub fn modifier(mut self, name: impl Into<String>, alias: Option<&str>) -> Self {
        self.modifiers.insert(name.into(), alias.map(String::from));
        self
    }

    /// Adds a pattern template.
    pub fn pattern(mut self, template: impl Into<String>) -> Self {
        self.patterns.push(template.into());
        self
    }

    /// Sets whether regex values are accepted.
    pub const fn regex(mut self, allow: bool) -> Self {
        self.allow_regex = allow;
        self
    }

    /// Marks the command as a deferred phase command.
    pub fn phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    /// Adds a metadata entry.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether this is the raw command.
    pub fn is_raw(&self) -> bool {
        self.id.is_empty()
    }

    /// Prefix for message catalog keys.
    pub fn message_prefix(&self) -> &str {
        if self.is_raw() { "raw" } else { &self.id }
    }

    /// The id followed by each alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        iter::once(self.id.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Whether the operator and every qualifier are accepted.
    pub fn accepts(&self, operator: Operator, qualifiers: &Qualifiers) -> bool {
        self.operators.contains(&operator) && qualifiers.is_subset(&self.qualifiers)
    }

    /// Resolves a modifier name or short alias to its canonical name, ignoring case.
    pub fn resolve_modifier(&self, text: &str) -> Option<&str> {
        self.modifiers.iter().find_map(|(name, alias)| {
            let hit = name.eq_ignore_ascii_case(text)
                || alias.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(text));
            hit.then_some(name.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_definition() {
        let command = Command::new("name")
            .alias("n")
            .operators([Operator::Colon, Operator::Eq])
            .qualifier(Qualifier::Not)
            .modifier("oracle", Some("o"))
            .regex(true)
            .meta("kind", "text");
        assert_eq!(command.names().collect::<Vec<_>>(), vec!["name", "n"]);
        assert!(command.allow_regex);
        assert_eq!(command.metadata["kind"], "text");
    }

    #[test]
    fn accepts_checks_qualifiers() {
        let command = Command::new("cost").operators([Operator::Eq, Operator::Gte]);
        let negated: Qualifiers = [Qualifier::Not].into_iter().collect();
        assert!(command.accepts(Operator::Gte, &Qualifiers::new()));
        assert!(!command.accepts(Operator::Eq, &negated));
        assert!(!command.accepts(Operator::Colon, &Qualifiers::new()));
    }

    #[test]
    fn modifiers_resolve_by_name_or_alias() {
        let command = Command::new("name").modifier("oracle", Some("o"));
        assert_eq!(command.resolve_modifier("ORACLE"), Some("oracle"));
        assert_eq!(command.resolve_modifier("o"), Some("oracle"));
        assert_eq!(command.resolve_modifier("flavor"), None);
    }

    #[test]
    fn raw_command_uses_raw_prefix() {
        assert!(Command::raw().is_raw());
        assert_eq!(Command::raw().message_prefix(), "raw");
        assert_eq!(Command::new("cost").message_prefix(), "cost");
    }
}
