//! Numeric fields.

use deckq_query::{Operator, Qualifier};

use super::{Comparison, FieldRef, display_value, parse_number, predicate};
use crate::{
    argument::ParsedArgument,
    command::Command,
    error::HandlerError,
    filter::Condition,
    handler::{Builtin, Clause, ExplainContext, ExplainHandler, FilterHandler},
};

/// Numeric comparison: `=`, `!=`, `>`, `>=`, `<`, `<=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Number {
    /// Stored field.
    field: FieldRef,
    /// Accept fractional values.
    float: bool,
}

impl Number {
    /// Integer comparison over one field.
    pub const fn new(field: FieldRef) -> Self {
        Self {
            field,
            float: false,
        }
    }

    /// Accepts fractional values.
    #[must_use]
    pub const fn float(mut self) -> Self {
        self.float = true;
        self
    }
}

impl FilterHandler for Number {
    fn filter(&self, arg: &ParsedArgument) -> Result<Clause, HandlerError> {
        let value = parse_number(arg.text(), self.float)?;
        let condition = match (Comparison::from_operator(arg.operator), arg.negated()) {
            (Comparison::Equal, false) => Condition::Eq(value),
            (Comparison::Equal, true) => Condition::Ne(value),
            (Comparison::Greater, _) => Condition::Gt(value),
            (Comparison::GreaterOrEqual, _) => Condition::Gte(value),
            (Comparison::Less, _) => Condition::Lt(value),
            (Comparison::LessOrEqual, _) => Condition::Lte(value),
        };
        Ok(Clause::Filter(predicate(&self.field, arg, condition)))
    }
}

impl ExplainHandler for Number {
    fn explain(&self, arg: &ParsedArgument, ctx: &ExplainContext<'_>) -> Option<String> {
        let value = parse_number(arg.text(), self.float).ok()?;
        let key = Comparison::from_operator(arg.operator).key(arg.negated());
        ctx.message(self.kind(), key, &[("value", display_value(&value))])
    }
}

impl Builtin for Number {
    fn kind(&self) -> &'static str {
        "number"
    }

    fn configure(&self, command: Command) -> Command {
        if !command.operators.is_empty() {
            return command;
        }
        command
            .operators([
                Operator::Bare,
                Operator::Eq,
                Operator::Gt,
                Operator::Gte,
                Operator::Lt,
                Operator::Lte,
            ])
            .qualifier(Qualifier::Not)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        argument::ArgValue,
        catalog::MessageCatalog,
        filter::Filter,
    };

    fn filter(arg: &ParsedArgument) -> Result<Filter, HandlerError> {
        match Number::new(FieldRef::new("cost")).filter(arg)? {
            Clause::Filter(filter) => Ok(filter),
            Clause::Deferred(_) => panic!("number never defers"),
        }
    }

    #[test]
    fn operators_map_to_comparisons() {
        let arg = ParsedArgument::new(Operator::Gte, ArgValue::text("3"));
        assert_eq!(
            filter(&arg).unwrap(),
            Filter::field("cost", Condition::Gte(json!(3)))
        );
        let arg =
            ParsedArgument::new(Operator::Eq, ArgValue::text("3")).with_qualifier(Qualifier::Not);
        assert_eq!(
            filter(&arg).unwrap(),
            Filter::field("cost", Condition::Ne(json!(3)))
        );
    }

    #[test]
    fn non_numeric_value_is_invalid_query() {
        let arg = ParsedArgument::new(Operator::Eq, ArgValue::text("x"));
        assert_eq!(filter(&arg).unwrap_err().code(), "invalid-query");
    }

    #[test]
    fn greater_or_equal_explains_with_value() {
        let mut catalog = MessageCatalog::new("en");
        catalog.insert(
            "builtin.number.greater-or-equal",
            "{command} is {value} or more",
        );
        let command = Command::new("cost");
        let ctx = ExplainContext {
            catalog: &catalog,
            command: &command,
        };
        let arg = ParsedArgument::new(Operator::Gte, ArgValue::text("3"));
        assert_eq!(
            Number::new(FieldRef::new("cost")).explain(&arg, &ctx),
            Some("cost is 3 or more".to_string())
        );
    }
}
