//! Scalar fields with a small set of known values (rarity, attribute, ink).

use std::collections::BTreeMap;

use deckq_query::{Operator, Qualifier};
use serde_json::Value;

use super::{FieldRef, map_value, negate_if, predicate, split_list};
use crate::{
    argument::ParsedArgument,
    command::Command,
    error::HandlerError,
    filter::Condition,
    handler::{Builtin, Clause, ExplainContext, ExplainHandler, FilterHandler},
};

/// Exact, membership or substring match against a scalar field.
///
/// `=` matches exactly. `:` with a comma list tests membership. `:` with one known value matches
/// it exactly; with an unknown value it matches a substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simple {
    /// Stored field.
    field: FieldRef,
    /// Query spelling to stored value.
    values: BTreeMap<String, String>,
}

/// How a simple argument is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    /// Exact value.
    Is(String),
    /// One of several values.
    In(Vec<String>),
    /// Substring.
    Contains(String),
}

impl Simple {
    /// A scalar field.
    pub fn new(field: FieldRef) -> Self {
        Self {
            field,
            values: BTreeMap::new(),
        }
    }

    /// Maps a query spelling to a stored value.
    #[must_use]
    pub fn value(mut self, spelling: impl Into<String>, stored: impl Into<String>) -> Self {
        self.values.insert(spelling.into(), stored.into());
        self
    }

    /// Whether the spelling is a known value.
    fn known(&self, item: &str) -> bool {
        self.values.keys().any(|k| k.eq_ignore_ascii_case(item))
    }

    /// Classifies the argument.
    fn mode(&self, arg: &ParsedArgument) -> Result<Mode, HandlerError> {
        let text = arg.text().trim();
        if text.is_empty() {
            return Err(HandlerError::invalid_query("expected a value"));
        }
        if arg.operator == Operator::Eq {
            return Ok(Mode::Is(map_value(&self.values, text)));
        }

        let items = split_list(text);
        if items.len() > 1 {
            return Ok(Mode::In(
                items
                    .into_iter()
                    .map(|item| map_value(&self.values, item))
                    .collect(),
            ));
        }
        if self.known(text) {
            Ok(Mode::Is(map_value(&self.values, text)))
        } else {
            Ok(Mode::Contains(text.to_string()))
        }
    }
}

impl FilterHandler for Simple {
    fn filter(&self, arg: &ParsedArgument) -> Result<Clause, HandlerError> {
        let condition = match self.mode(arg)? {
            Mode::Is(value) => Condition::Eq(Value::String(value)),
            Mode::In(values) => Condition::In(values.into_iter().map(Value::String).collect()),
            Mode::Contains(value) => Condition::Regex {
                pattern: regex::escape(&value),
                case_insensitive: true,
                multiline: false,
                dot_all: false,
                extended: false,
            },
        };
        Ok(Clause::Filter(negate_if(
            arg,
            predicate(&self.field, arg, condition),
        )))
    }
}

impl ExplainHandler for Simple {
    fn explain(&self, arg: &ParsedArgument, ctx: &ExplainContext<'_>) -> Option<String> {
        let negated = arg.negated();
        let (key, value) = match self.mode(arg).ok()? {
            Mode::Is(value) => (if negated { "is-not" } else { "is" }, value),
            Mode::In(values) => (if negated { "not-in" } else { "in" }, values.join(", ")),
            Mode::Contains(value) => (
                if negated { "not-contains" } else { "contains" },
                value,
            ),
        };
        ctx.message(self.kind(), key, &[("value", value)])
    }
}

impl Builtin for Simple {
    fn kind(&self) -> &'static str {
        "simple"
    }

    fn configure(&self, command: Command) -> Command {
        if !command.operators.is_empty() {
            return command;
        }
        command
            .operators([Operator::Bare, Operator::Colon, Operator::Eq])
            .qualifier(Qualifier::Not)
    }
}
