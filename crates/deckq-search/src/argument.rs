//! Handler input.

use std::collections::BTreeMap;

use deckq_query::{
    ArgKind, Operator, Qualifier, Qualifiers, operator_text, regex_parts, string_value,
};
use serde::Serialize;

/// A command argument value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ArgValue {
    /// Plain text, with quoting already removed.
    Text {
        /// The text.
        value: String,
    },
    /// A regex literal.
    Regex {
        /// The body between the slashes.
        pattern: String,
        /// Trailing flag letters.
        flags: String,
    },
}

impl ArgValue {
    /// A plain text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Resolves a raw token value of the given lexical kind.
    pub fn from_raw(kind: ArgKind, raw: &str) -> Self {
        match kind {
            ArgKind::Text => Self::text(raw),
            ArgKind::String => Self::text(string_value(raw)),
            ArgKind::Regex => {
                let (pattern, flags) = regex_parts(raw);
                Self::Regex {
                    pattern: pattern.to_string(),
                    flags: flags.to_string(),
                }
            }
        }
    }

    /// Whether this is a regex value.
    pub const fn is_regex(&self) -> bool {
        matches!(self, Self::Regex { .. })
    }

    /// The text of a plain value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { value } => Some(value),
            Self::Regex { .. } => None,
        }
    }

    /// The value as a user would write it.
    pub fn display(&self) -> String {
        match self {
            Self::Text { value } => value.clone(),
            Self::Regex { pattern, flags } => format!("/{pattern}/{flags}"),
        }
    }
}

/// Everything a handler needs to know about one bound expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedArgument {
    /// Base operator.
    pub operator: Operator,
    /// Qualifiers on the operator.
    pub qualifiers: Qualifiers,
    /// Resolved modifier name, if the command was invoked as `command.modifier`.
    pub modifier: Option<String>,
    /// The value.
    pub value: ArgValue,
    /// Named captures when the value came from a pattern template.
    pub captures: BTreeMap<String, String>,
}

impl ParsedArgument {
    /// Creates an argument with no qualifiers, modifier or captures.
    pub fn new(operator: Operator, value: ArgValue) -> Self {
        Self {
            operator,
            qualifiers: Qualifiers::new(),
            modifier: None,
            value,
            captures: BTreeMap::new(),
        }
    }

    /// Adds a qualifier.
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.insert(qualifier);
        self
    }

    /// Sets the modifier.
    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    /// Whether the `!` qualifier is present.
    pub fn negated(&self) -> bool {
        self.qualifiers.contains(&Qualifier::Not)
    }

    /// Operator as written, qualifiers included.
    pub fn operator_text(&self) -> String {
        operator_text(self.operator, &self.qualifiers)
    }

    /// The plain text value, or the regex body.
    pub fn text(&self) -> &str {
        match &self.value {
            ArgValue::Text { value } => value,
            ArgValue::Regex { pattern, .. } => pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_are_resolved_by_kind() {
        assert_eq!(ArgValue::from_raw(ArgKind::Text, "elf"), ArgValue::text("elf"));
        assert_eq!(
            ArgValue::from_raw(ArgKind::String, "\"goblin \\\"king\\\"\""),
            ArgValue::text("goblin \"king\"")
        );
        assert_eq!(
            ArgValue::from_raw(ArgKind::Regex, "/^gob/i"),
            ArgValue::Regex {
                pattern: "^gob".into(),
                flags: "i".into()
            }
        );
    }

    #[test]
    fn negation_comes_from_qualifier() {
        let arg = ParsedArgument::new(Operator::Colon, ArgValue::text("x"))
            .with_qualifier(Qualifier::Not);
        assert!(arg.negated());
        assert_eq!(arg.operator_text(), "!:");
    }
}
