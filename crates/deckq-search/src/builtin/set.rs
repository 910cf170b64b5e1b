//! Array fields holding several values (types, keywords, numeric tags).

use std::collections::BTreeMap;

use deckq_query::{Operator, Qualifier};
use serde_json::Value;

use super::{
    FieldRef, display_value, map_value, negate_if, parse_number, predicate, split_list,
};
use crate::{
    argument::ParsedArgument,
    command::Command,
    error::HandlerError,
    filter::Condition,
    handler::{Builtin, Clause, ExplainContext, ExplainHandler, FilterHandler},
};

/// Membership (`:`) or exact set equality (`=`) over a comma-separated value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Set {
    /// Stored field.
    field: FieldRef,
    /// Elements are numbers.
    numeric: bool,
    /// Query spelling to stored value.
    values: BTreeMap<String, String>,
}

impl Set {
    /// A set of strings.
    pub fn new(field: FieldRef) -> Self {
        Self {
            field,
            numeric: false,
            values: BTreeMap::new(),
        }
    }

    /// A set of integers.
    pub fn numeric(field: FieldRef) -> Self {
        Self {
            numeric: true,
            ..Self::new(field)
        }
    }

    /// Maps a query spelling to a stored value.
    #[must_use]
    pub fn value(mut self, spelling: impl Into<String>, stored: impl Into<String>) -> Self {
        self.values.insert(spelling.into(), stored.into());
        self
    }

    /// Parses the list into stored values.
    fn elements(&self, arg: &ParsedArgument) -> Result<Vec<Value>, HandlerError> {
        let items = split_list(arg.text());
        if items.is_empty() {
            return Err(HandlerError::invalid_query("expected at least one value"));
        }
        items
            .into_iter()
            .map(|item| {
                let mapped = map_value(&self.values, item);
                if self.numeric {
                    parse_number(&mapped, false)
                } else {
                    Ok(Value::String(mapped))
                }
            })
            .collect()
    }

    /// Whether the operator asks for set equality.
    const fn exact(arg: &ParsedArgument) -> bool {
        matches!(arg.operator, Operator::Eq)
    }
}

impl FilterHandler for Set {
    fn filter(&self, arg: &ParsedArgument) -> Result<Clause, HandlerError> {
        let elements = self.elements(arg)?;
        let condition = if Self::exact(arg) {
            Condition::SetEquals(elements)
        } else {
            Condition::ContainsAll(elements)
        };
        Ok(Clause::Filter(negate_if(
            arg,
            predicate(&self.field, arg, condition),
        )))
    }
}

impl ExplainHandler for Set {
    fn explain(&self, arg: &ParsedArgument, ctx: &ExplainContext<'_>) -> Option<String> {
        let elements = self.elements(arg).ok()?;
        let key = match (Self::exact(arg), arg.negated()) {
            (false, false) => "includes",
            (false, true) => "not-includes",
            (true, false) => "is",
            (true, true) => "is-not",
        };
        let value = elements
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", ");
        ctx.message(self.kind(), key, &[("value", value)])
    }
}

impl Builtin for Set {
    fn kind(&self) -> &'static str {
        "set"
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
