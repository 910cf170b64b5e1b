//! Builtin handler kinds shared by every game domain.
//!
//! Each kind is constructed from a [`FieldRef`] plus a little metadata and implements both the
//! filter and the explain capability, so a domain only declares data.

mod bitfield;
mod number;
mod order;
mod set;
mod simple;
mod text;

use std::collections::BTreeMap;

use deckq_query::Operator;
use serde_json::Value;

pub use self::{
    bitfield::BitField, number::Number, order::Order, set::Set, simple::Simple, text::Text,
};
use crate::{
    argument::ParsedArgument,
    error::HandlerError,
    filter::{Condition, Filter},
};

/// The stored field a builtin reads, with per-modifier alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// Default stored field.
    pub field: String,
    /// Modifier name to stored field.
    pub modifiers: BTreeMap<String, String>,
}

impl FieldRef {
    /// A reference to one stored field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            modifiers: BTreeMap::new(),
        }
    }

    /// Adds a modifier that reads a different field.
    pub fn with_modifier(mut self, modifier: impl Into<String>, field: impl Into<String>) -> Self {
        self.modifiers.insert(modifier.into(), field.into());
        self
    }

    /// The stored field for an argument's modifier.
    pub fn resolve(&self, arg: &ParsedArgument) -> &str {
        arg.modifier
            .as_deref()
            .and_then(|m| self.modifiers.get(m))
            .unwrap_or(&self.field)
    }
}

/// Wraps a predicate in `NoneOf` when the argument carries the `!` qualifier.
fn negate_if(arg: &ParsedArgument, filter: Filter) -> Filter {
    if arg.negated() {
        filter.negate()
    } else {
        filter
    }
}

/// A field predicate under the argument's stored field.
fn predicate(field: &FieldRef, arg: &ParsedArgument, condition: Condition) -> Filter {
    Filter::field(field.resolve(arg), condition)
}

/// Splits a comma-separated value into trimmed, non-empty items.
fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Translates an item through a value map, matching keys case-insensitively.
fn map_value(values: &BTreeMap<String, String>, item: &str) -> String {
    values
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(item))
        .map_or_else(|| item.to_string(), |(_, mapped)| mapped.clone())
}

/// Parses a number: an integer, or a fraction when `float` is set.
fn parse_number(text: &str, float: bool) -> Result<Value, HandlerError> {
    let text = text.trim();
    let invalid = || HandlerError::invalid_query(format!("'{text}' is not a number"));
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::from(n));
    }
    if !float {
        return Err(invalid());
    }
    let value: f64 = text.parse().map_err(|_| invalid())?;
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(invalid)
}

/// Renders a JSON scalar for explanations.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// The comparison an operator selects, for numeric-style kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    /// `=` (and bare or `:`).
    Equal,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
}

impl Comparison {
    /// The comparison for an operator, treating bare and `:` as equality.
    const fn from_operator(operator: Operator) -> Self {
        match operator {
            Operator::Gt => Self::Greater,
            Operator::Gte => Self::GreaterOrEqual,
            Operator::Lt => Self::Less,
            Operator::Lte => Self::LessOrEqual,
            Operator::Bare | Operator::Colon | Operator::Eq => Self::Equal,
        }
    }

    /// Explanation key suffix.
    const fn key(self, negated: bool) -> &'static str {
        match (self, negated) {
            (Self::Equal, false) => "equal",
            (Self::Equal, true) => "not-equal",
            (Self::Greater, _) => "greater",
            (Self::GreaterOrEqual, _) => "greater-or-equal",
            (Self::Less, _) => "less",
            (Self::LessOrEqual, _) => "less-or-equal",
        }
    }

    /// Whether `left` compares true against `right`.
    fn holds<T: PartialOrd>(self, left: &T, right: &T) -> bool {
        match self {
            Self::Equal => left == right,
            Self::Greater => left > right,
            Self::GreaterOrEqual => left >= right,
            Self::Less => left < right,
            Self::LessOrEqual => left <= right,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::argument::ArgValue;

    #[test]
    fn field_ref_follows_modifier() {
        let field = FieldRef::new("name").with_modifier("oracle", "oracle_name");
        let plain = ParsedArgument::new(Operator::Colon, ArgValue::text("x"));
        let modified = plain.clone().with_modifier("oracle");
        assert_eq!(field.resolve(&plain), "name");
        assert_eq!(field.resolve(&modified), "oracle_name");
        assert_eq!(field.resolve(&plain.with_modifier("flavor")), "name");
    }

    #[test]
    fn lists_split_on_commas() {
        assert_eq!(split_list(" elf, goblin ,,"), vec!["elf", "goblin"]);
    }

    #[test]
    fn value_map_is_case_insensitive() {
        let values = BTreeMap::from([("R".to_string(), "rare".to_string())]);
        assert_eq!(map_value(&values, "r"), "rare");
        assert_eq!(map_value(&values, "mythic"), "mythic");
    }

    #[test]
    fn numbers_parse_strictly() {
        assert_eq!(parse_number("3", false).unwrap(), json!(3));
        assert_eq!(parse_number("2.5", true).unwrap(), json!(2.5));
        assert!(parse_number("2.5", false).is_err());
        assert!(parse_number("x", true).is_err());
    }

    #[test]
    fn comparisons() {
        assert!(Comparison::from_operator(Operator::Gte).holds(&3, &3));
        assert!(!Comparison::from_operator(Operator::Gt).holds(&3, &3));
        assert_eq!(Comparison::from_operator(Operator::Colon), Comparison::Equal);
        assert_eq!(Comparison::Equal.key(true), "not-equal");
    }
}
