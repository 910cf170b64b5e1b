//! Result ordering, a deferred phase command.

use std::collections::BTreeMap;

use deckq_query::Operator;

use super::split_list;
use crate::{
    argument::ParsedArgument,
    command::Command,
    error::HandlerError,
    filter::{PostAction, QueryPlan, SortDirection, SortKey},
    handler::{Builtin, Clause, ExplainContext, ExplainHandler, FilterHandler},
};

/// Phase name for ordering post-actions.
pub const ORDER_PHASE: &str = "order";

/// `order:name,cost-`: a comma list of sort keys, each optionally suffixed with `+` or `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Query key to stored field.
    keys: BTreeMap<String, String>,
}

impl Order {
    /// An ordering command with no keys.
    pub const fn new() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    /// Adds a sortable key.
    #[must_use]
    pub fn key(mut self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.keys.insert(name.into().to_lowercase(), field.into());
        self
    }

    /// Parses the value into `(query key, sort key)` pairs.
    fn parse(&self, arg: &ParsedArgument) -> Result<Vec<(String, SortKey)>, HandlerError> {
        let items = split_list(arg.text());
        if items.is_empty() {
            return Err(HandlerError::invalid_query("expected a sort key"));
        }
        items
            .into_iter()
            .map(|item| {
                let (name, direction) = if let Some(name) = item.strip_suffix('-') {
                    (name, SortDirection::Desc)
                } else {
                    (item.strip_suffix('+').unwrap_or(item), SortDirection::Asc)
                };
                let name = name.to_lowercase();
                let field = self
                    .keys
                    .get(&name)
                    .ok_or_else(|| HandlerError::InvalidValue {
                        value: name.clone(),
                        allowed: self.keys.keys().cloned().collect::<Vec<_>>().join(", "),
                    })?;
                Ok((
                    name,
                    SortKey {
                        field: field.clone(),
                        direction,
                    },
                ))
            })
            .collect()
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterHandler for Order {
    fn filter(&self, arg: &ParsedArgument) -> Result<Clause, HandlerError> {
        let keys: Vec<SortKey> = self.parse(arg)?.into_iter().map(|(_, key)| key).collect();
        Ok(Clause::Deferred(PostAction::new(
            ORDER_PHASE,
            move |plan: &mut QueryPlan| plan.sort.extend(keys.iter().cloned()),
        )))
    }
}

impl ExplainHandler for Order {
    fn explain(&self, arg: &ParsedArgument, ctx: &ExplainContext<'_>) -> Option<String> {
        let keys = self.parse(arg).ok()?;
        let rendered = keys
            .into_iter()
            .map(|(name, key)| {
                let direction = match key.direction {
                    SortDirection::Asc => "asc",
                    SortDirection::Desc => "desc",
                };
                ctx.message(self.kind(), direction, &[("key", name)])
            })
            .collect::<Option<Vec<_>>>()?;
        ctx.message(self.kind(), "order", &[("value", rendered.join(", "))])
    }
}

impl Builtin for Order {
    fn kind(&self) -> &'static str {
        "order"
    }

    fn configure(&self, command: Command) -> Command {
        let command = if command.operators.is_empty() {
            command.operators([Operator::Colon, Operator::Eq])
        } else {
            command
        };
        if command.phase.is_some() {
            command
        } else {
            command.phase(ORDER_PHASE)
        }
    }
}
