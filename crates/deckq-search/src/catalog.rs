//! Message catalogs for query explanations.
//!
//! A catalog maps dotted keys (`cost.greater`, `builtin.number.equal`, `logic.and`) to message
//! templates with `{name}` parameters. Catalogs are written as TOML; nested tables flatten into
//! dotted keys.

use std::collections::BTreeMap;

use thiserror::Error;

/// A source of localized message templates.
pub trait Catalog: Send + Sync {
    /// The template for `key`, if the catalog has one.
    fn message(&self, key: &str) -> Option<&str>;
}

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog is not valid TOML.
    #[error("invalid catalog: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value in the catalog is not a string or table.
    #[error("catalog entry '{0}' must be a string")]
    NotAString(String),
}

/// An in-memory catalog for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    /// Locale tag, e.g. `en`.
    locale: String,
    /// Flattened key to template.
    messages: BTreeMap<String, String>,
}

impl MessageCatalog {
    /// Creates an empty catalog.
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            messages: BTreeMap::new(),
        }
    }

    /// Parses a TOML catalog.
    pub fn from_toml(locale: impl Into<String>, source: &str) -> Result<Self, CatalogError> {
        let table: toml::Table = toml::from_str(source)?;
        let mut catalog = Self::new(locale);
        flatten("", &table, &mut catalog.messages)?;
        Ok(catalog)
    }

    /// The locale tag.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the catalog has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Sets a message.
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.messages.insert(key.into(), template.into());
    }

    /// Adds every message from `fallback` that this catalog does not already define.
    pub fn fill_from(&mut self, fallback: &Self) {
        for (key, template) in &fallback.messages {
            self.messages
                .entry(key.clone())
                .or_insert_with(|| template.clone());
        }
    }
}

impl Catalog for MessageCatalog {
    fn message(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }
}

/// Flattens nested tables into dotted keys.
fn flatten(
    prefix: &str,
    table: &toml::Table,
    out: &mut BTreeMap<String, String>,
) -> Result<(), CatalogError> {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::String(text) => {
                out.insert(full, text.clone());
            }
            toml::Value::Table(inner) => flatten(&full, inner, out)?,
            _ => return Err(CatalogError::NotAString(full)),
        }
    }
    Ok(())
}

/// Substitutes `{name}` parameters into a template.
///
/// Unknown parameters are left as written.
pub fn format_message(template: &str, params: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_tables_flatten_to_dotted_keys() {
        let catalog = MessageCatalog::from_toml(
            "en",
            r#"
            [logic]
            and = " and "

            [builtin.number]
            equal = "{command} is {value}"
            "#,
        )
        .unwrap();
        assert_eq!(catalog.message("logic.and"), Some(" and "));
        assert_eq!(
            catalog.message("builtin.number.equal"),
            Some("{command} is {value}")
        );
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn non_string_values_are_rejected() {
        let err = MessageCatalog::from_toml("en", "[cost]\nequal = 3\n").unwrap_err();
        assert!(matches!(err, CatalogError::NotAString(key) if key == "cost.equal"));
    }

    #[test]
    fn fill_from_keeps_existing_messages() {
        let mut user = MessageCatalog::new("en");
        user.insert("logic.and", " & ");
        let mut embedded = MessageCatalog::new("en");
        embedded.insert("logic.and", " and ");
        embedded.insert("logic.or", " or ");

        user.fill_from(&embedded);
        assert_eq!(user.message("logic.and"), Some(" & "));
        assert_eq!(user.message("logic.or"), Some(" or "));
    }

    #[test]
    fn format_substitutes_known_parameters() {
        let text = format_message(
            "{command} is at least {value} {unknown}",
            &[("command", "cost".into()), ("value", "3".into())],
        );
        assert_eq!(text, "cost is at least 3 {unknown}");
    }

    #[test]
    fn format_handles_unclosed_brace() {
        assert_eq!(format_message("a {b", &[]), "a {b");
    }
}
