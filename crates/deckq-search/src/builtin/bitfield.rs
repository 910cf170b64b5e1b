//! Multi-letter fields stored as bitmasks (colors, runes, inks).
//!
//! Bit `i` of the stored integer is set when letter `i` of the alphabet is present. A value is
//! read as one of:
//!
//! - a named word (`azorius`), expanded to its letters;
//! - a count (`2`, `>=2`), only when the alphabet has no digits;
//! - an exact combination (`ub`), each letter checked against the alphabet.

use std::collections::BTreeMap;

use deckq_query::{Operator, Qualifier};
use serde_json::Value;

use super::{Comparison, FieldRef, negate_if, predicate};
use crate::{
    argument::ParsedArgument,
    command::Command,
    error::HandlerError,
    filter::{Condition, Filter},
    handler::{Builtin, Clause, ExplainContext, ExplainHandler, FilterHandler},
};

/// Largest alphabet a count expression can enumerate.
const MAX_COUNT_ALPHABET: usize = 16;

/// Bitmask field over a fixed alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitField {
    /// Stored field.
    field: FieldRef,
    /// Letters in bit order, lowercased.
    alphabet: Vec<char>,
    /// Named words to their letters.
    words: BTreeMap<String, String>,
}

/// A classified bit-field value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Decoded {
    /// A letter combination.
    Exact {
        /// Letters in alphabet order, deduplicated.
        letters: String,
        /// The combination as a mask.
        mask: u64,
    },
    /// A comparison on the number of letters present.
    Count {
        /// How the count is compared.
        comparison: Comparison,
        /// The count compared against.
        count: u32,
    },
}

impl BitField {
    /// A bitmask field over `alphabet`.
    pub fn new(field: FieldRef, alphabet: &str) -> Self {
        Self {
            field,
            alphabet: alphabet.chars().flat_map(char::to_lowercase).collect(),
            words: BTreeMap::new(),
        }
    }

    /// Adds a named word standing for a letter combination.
    #[must_use]
    pub fn word(mut self, word: impl Into<String>, letters: impl Into<String>) -> Self {
        self.words.insert(word.into().to_lowercase(), letters.into());
        self
    }

    /// Mask with every alphabet bit set.
    fn full_mask(&self) -> u64 {
        match self.alphabet.len() {
            64.. => u64::MAX,
            len => (1 << len) - 1,
        }
    }

    /// Classifies an argument value.
    fn decode(&self, arg: &ParsedArgument) -> Result<Decoded, HandlerError> {
        let text = arg.text().trim().to_lowercase();
        if text.is_empty() {
            return Err(HandlerError::invalid_query("expected a value"));
        }
        if let Some(letters) = self.words.get(&text) {
            return self.exact(letters);
        }

        let digits = self.alphabet.iter().any(char::is_ascii_digit);
        if !digits && let Some((inner, count)) = split_count(&text) {
            let outer = matches!(arg.operator, Operator::Bare | Operator::Colon | Operator::Eq);
            if inner.is_some() && !outer {
                return Err(HandlerError::invalid_query(format!(
                    "'{text}' already compares; use ':' or '=' before it"
                )));
            }
            if self.alphabet.len() > MAX_COUNT_ALPHABET {
                return Err(HandlerError::invalid_query(
                    "counts are not supported for this field",
                ));
            }
            let comparison = inner.unwrap_or_else(|| Comparison::from_operator(arg.operator));
            if arg.negated() && comparison != Comparison::Equal {
                return Err(HandlerError::invalid_query(
                    "only an exact count can be negated",
                ));
            }
            return Ok(Decoded::Count { comparison, count });
        }

        self.exact(&text)
    }

    /// Decodes an exact letter combination.
    fn exact(&self, text: &str) -> Result<Decoded, HandlerError> {
        let mut mask = 0;
        for ch in text.chars().flat_map(char::to_lowercase) {
            let Some(bit) = self.alphabet.iter().position(|&letter| letter == ch) else {
                return Err(HandlerError::InvalidValue {
                    value: text.to_string(),
                    allowed: self.alphabet.iter().collect(),
                });
            };
            mask |= 1 << bit;
        }
        let letters = self
            .alphabet
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, letter)| *letter)
            .collect();
        Ok(Decoded::Exact { letters, mask })
    }

    /// Every mask whose population count satisfies the comparison.
    fn count_masks(&self, comparison: Comparison, count: u32) -> Vec<Value> {
        (0..=self.full_mask())
            .filter(|mask: &u64| comparison.holds(&mask.count_ones(), &count))
            .map(Value::from)
            .collect()
    }

    /// Explanation key for a decoded value.
    fn key(arg: &ParsedArgument, decoded: &Decoded) -> &'static str {
        let negated = arg.negated();
        match decoded {
            Decoded::Count { comparison, .. } => match comparison {
                Comparison::Equal if negated => "count-is-not",
                Comparison::Equal => "count-is",
                Comparison::Greater => "count-greater",
                Comparison::GreaterOrEqual => "count-greater-or-equal",
                Comparison::Less => "count-less",
                Comparison::LessOrEqual => "count-less-or-equal",
            },
            Decoded::Exact { .. } => match (arg.operator, negated) {
                (Operator::Eq, false) => "is",
                (Operator::Eq, true) => "is-not",
                (Operator::Gte, _) => "superset",
                (Operator::Gt, _) => "strict-superset",
                (Operator::Lte, _) => "subset",
                (Operator::Lt, _) => "strict-subset",
                (Operator::Bare | Operator::Colon, true) => "not-includes",
                (Operator::Bare | Operator::Colon, false) => "includes",
            },
        }
    }
}

/// Splits `>=2`-style count text into its optional comparison and count.
fn split_count(text: &str) -> Option<(Option<Comparison>, u32)> {
    let prefixes = [
        (">=", Comparison::GreaterOrEqual),
        ("<=", Comparison::LessOrEqual),
        (">", Comparison::Greater),
        ("<", Comparison::Less),
        ("=", Comparison::Equal),
    ];
    let (inner, rest) = prefixes
        .iter()
        .find_map(|(prefix, comparison)| {
            text.strip_prefix(prefix).map(|rest| (Some(*comparison), rest))
        })
        .unwrap_or((None, text));
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok().map(|count| (inner, count))
}

impl FilterHandler for BitField {
    fn filter(&self, arg: &ParsedArgument) -> Result<Clause, HandlerError> {
        let field = self.field.resolve(arg);
        let filter = match self.decode(arg)? {
            Decoded::Count { comparison, count } => {
                let masks = self.count_masks(comparison, count);
                if arg.negated() {
                    return Ok(Clause::Filter(Filter::field(field, Condition::NotIn(masks))));
                }
                Filter::field(field, Condition::In(masks))
            }
            Decoded::Exact { mask, .. } => {
                let outside = self.full_mask() & !mask;
                let exactly = || Filter::field(field, Condition::Ne(Value::from(mask)));
                match arg.operator {
                    Operator::Bare | Operator::Colon | Operator::Gte => {
                        predicate(&self.field, arg, Condition::BitsAllSet(mask))
                    }
                    Operator::Eq => predicate(&self.field, arg, Condition::Eq(Value::from(mask))),
                    Operator::Gt => Filter::all(vec![
                        Filter::field(field, Condition::BitsAllSet(mask)),
                        exactly(),
                    ]),
                    Operator::Lte => Filter::field(field, Condition::BitsAllClear(outside)),
                    Operator::Lt => Filter::all(vec![
                        Filter::field(field, Condition::BitsAllClear(outside)),
                        exactly(),
                    ]),
                }
            }
        };
        Ok(Clause::Filter(negate_if(arg, filter)))
    }
}

impl ExplainHandler for BitField {
    fn explain(&self, arg: &ParsedArgument, ctx: &ExplainContext<'_>) -> Option<String> {
        let decoded = self.decode(arg).ok()?;
        let value = match &decoded {
            Decoded::Exact { letters, .. } => letters.clone(),
            Decoded::Count { count, .. } => count.to_string(),
        };
        ctx.message(self.kind(), Self::key(arg, &decoded), &[("value", value)])
    }
}

impl Builtin for BitField {
    fn kind(&self) -> &'static str {
        "bit-field"
    }

    fn configure(&self, command: Command) -> Command {
        if !command.operators.is_empty() {
            return command;
        }
        command
            .operators([
                Operator::Bare,
                Operator::Colon,
                Operator::Eq,
                Operator::Gt,
                Operator::Gte,
                Operator::Lt,
                Operator::Lte,
            ])
            .qualifier(Qualifier::Not)
    }
}
