//! Two-number stat lines written as `first/second`, e.g. power and toughness.

use deckq_query::Operator;
use deckq_search::{
    Builtin, Clause, Command, Condition, ExplainContext, ExplainHandler, Filter, FilterHandler,
    HandlerError, ParsedArgument,
};
use serde_json::Value;

/// Accepted text for one side of a stat line.
const SIDE: &str = r"-?\d+|[*?x]";

/// Matches `2/3`-shaped values against two stored fields at once.
///
/// Each side is an integer or one of the variable markers `*`, `X` and `?`, which are compared
/// as strings. The template only accepts those shapes, so other slash words such as `elf/goblin`
/// stay alternations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLine {
    /// Capture name and stored field for the left side.
    first: (String, String),
    /// Capture name and stored field for the right side.
    second: (String, String),
}

impl StatLine {
    /// A stat line whose captures are named after the stored fields.
    pub fn new(first: &str, second: &str) -> Self {
        Self {
            first: (first.to_string(), first.to_string()),
            second: (second.to_string(), second.to_string()),
        }
    }

    /// The `{{first}}/{{second}}` template, with each side constrained to a stat value.
    fn template(&self) -> String {
        format!(
            "{{{{{}:{SIDE}}}}}/{{{{{}:{SIDE}}}}}",
            self.first.0, self.second.0
        )
    }

    /// Reads one side from the pattern captures.
    fn side(arg: &ParsedArgument, capture: &str) -> Result<Value, HandlerError> {
        let text = arg
            .captures
            .get(capture)
            .map(|t| t.trim())
            .ok_or_else(|| HandlerError::invalid_query(format!("expected a value for {capture}")))?;
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::from(n));
        }
        match text {
            "*" | "?" => Ok(Value::String(text.to_string())),
            "x" | "X" => Ok(Value::String("X".to_string())),
            _ => Err(HandlerError::invalid_query(format!(
                "'{text}' is not a {capture} value"
            ))),
        }
    }
}

impl FilterHandler for StatLine {
    fn filter(&self, arg: &ParsedArgument) -> Result<Clause, HandlerError> {
        let first = Self::side(arg, &self.first.0)?;
        let second = Self::side(arg, &self.second.0)?;
        Ok(Clause::Filter(Filter::all(vec![
            Filter::field(&self.first.1, Condition::Eq(first)),
            Filter::field(&self.second.1, Condition::Eq(second)),
        ])))
    }
}

impl ExplainHandler for StatLine {
    fn explain(&self, arg: &ParsedArgument, ctx: &ExplainContext<'_>) -> Option<String> {
        let first = Self::side(arg, &self.first.0).ok()?;
        let second = Self::side(arg, &self.second.0).ok()?;
        let text = |v: Value| match v {
            Value::String(s) => s,
            other => other.to_string(),
        };
        ctx.message(
            self.kind(),
            "is",
            &[("first", text(first)), ("second", text(second))],
        )
    }
}

impl Builtin for StatLine {
    fn kind(&self) -> &'static str {
        "stats"
    }

    fn configure(&self, command: Command) -> Command {
        let command = if command.operators.is_empty() {
            command.operators([Operator::Bare])
        } else {
            command
        };
        if command.patterns.is_empty() {
            let template = self.template();
            command.pattern(template)
        } else {
            command
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use deckq_search::{ArgValue, MessageCatalog};
    use serde_json::json;

    use super::*;

    fn captured(power: &str, toughness: &str) -> ParsedArgument {
        let text = ArgValue::text(format!("{power}/{toughness}"));
        let mut arg = ParsedArgument::new(Operator::Bare, text);
        arg.captures = BTreeMap::from([
            ("power".to_string(), power.to_string()),
            ("toughness".to_string(), toughness.to_string()),
        ]);
        arg
    }

    #[test]
    fn configure_declares_the_template() {
        let command = StatLine::new("power", "toughness").configure(Command::new("pt"));
        assert_eq!(
            command.patterns,
            vec![r"{{power:-?\d+|[*?x]}}/{{toughness:-?\d+|[*?x]}}".to_string()]
        );
        assert!(command.operators.contains(&Operator::Bare));
    }

    #[test]
    fn both_sides_must_match() {
        let Clause::Filter(filter) = StatLine::new("power", "toughness")
            .filter(&captured("2", "*"))
            .unwrap()
        else {
            panic!("stat lines never defer");
        };
        assert_eq!(
            filter,
            Filter::All(vec![
                Filter::field("power", Condition::Eq(json!(2))),
                Filter::field("toughness", Condition::Eq(json!("*"))),
            ])
        );
    }

    #[test]
    fn non_numeric_sides_are_rejected() {
        let err = StatLine::new("power", "toughness")
            .filter(&captured("w", "u"))
            .unwrap_err();
        assert_eq!(err.code(), "invalid-query");
    }

    #[test]
    fn explains_both_sides() {
        let mut catalog = MessageCatalog::new("en");
        catalog.insert("builtin.stats.is", "{command} {first}/{second}");
        let command = Command::new("pt");
        let ctx = ExplainContext {
            catalog: &catalog,
            command: &command,
        };
        assert_eq!(
            StatLine::new("power", "toughness").explain(&captured("3", "x"), &ctx),
            Some("pt 3/X".to_string())
        );
    }
}
