//! Free-text fields.

use deckq_query::{Operator, Qualifier};

use super::{FieldRef, negate_if, predicate};
use crate::{
    argument::{ArgValue, ParsedArgument},
    command::Command,
    error::HandlerError,
    filter::Condition,
    handler::{Builtin, Clause, ExplainContext, ExplainHandler, FilterHandler},
};

/// Case-insensitive text matching.
///
/// `:` matches a substring, `=` the whole value, and a regex value is used as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    /// Stored field.
    field: FieldRef,
    /// Whether `^` and `$` match at line boundaries.
    multiline: bool,
}

/// How a text argument is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Substring.
    Contains,
    /// Whole value.
    Is,
    /// User regex.
    Matches,
}

impl Text {
    /// Text matching over one field.
    pub const fn new(field: FieldRef) -> Self {
        Self {
            field,
            multiline: false,
        }
    }

    /// Matches `^` and `$` at line boundaries, for multi-line rules text.
    #[must_use]
    pub const fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// Classifies the argument.
    fn mode(arg: &ParsedArgument) -> Result<Mode, HandlerError> {
        match (&arg.value, arg.operator) {
            (ArgValue::Regex { .. }, _) => Ok(Mode::Matches),
            (_, Operator::Bare | Operator::Colon) => Ok(Mode::Contains),
            (_, Operator::Eq) => Ok(Mode::Is),
            (_, other) => Err(HandlerError::invalid_query(format!(
                "text cannot be compared with '{other}'"
            ))),
        }
    }
}

impl FilterHandler for Text {
    fn filter(&self, arg: &ParsedArgument) -> Result<Clause, HandlerError> {
        let condition = match (&arg.value, Self::mode(arg)?) {
            (ArgValue::Regex { pattern, flags }, _) => Condition::Regex {
                pattern: pattern.clone(),
                case_insensitive: flags.contains('i'),
                multiline: flags.contains('m') || self.multiline,
                dot_all: flags.contains('s'),
                extended: flags.contains('x'),
            },
            (ArgValue::Text { value }, Mode::Is) => Condition::Regex {
                pattern: format!("^{}$", regex::escape(value)),
                case_insensitive: true,
                multiline: false,
                dot_all: false,
                extended: false,
            },
            (ArgValue::Text { value }, _) => Condition::Regex {
                pattern: regex::escape(value),
                case_insensitive: true,
                multiline: self.multiline,
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

impl ExplainHandler for Text {
    fn explain(&self, arg: &ParsedArgument, ctx: &ExplainContext<'_>) -> Option<String> {
        let key = match (Self::mode(arg).ok()?, arg.negated()) {
            (Mode::Contains, false) => "contains",
            (Mode::Contains, true) => "not-contains",
            (Mode::Is, false) => "is",
            (Mode::Is, true) => "is-not",
            (Mode::Matches, false) => "matches",
            (Mode::Matches, true) => "not-matches",
        };
        ctx.message(self.kind(), key, &[("value", arg.value.display())])
    }
}

impl Builtin for Text {
    fn kind(&self) -> &'static str {
        "text"
    }

    fn configure(&self, command: Command) -> Command {
        if !command.operators.is_empty() {
            return command;
        }
        command
            .operators([Operator::Bare, Operator::Colon, Operator::Eq])
            .qualifier(Qualifier::Not)
            .regex(true)
    }
}
