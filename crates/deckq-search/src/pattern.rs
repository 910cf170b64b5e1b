//! Pattern templates.
//!
//! A template such as `{{power}}/{{toughness}}` or `[{{loyalty}}]` describes a literal shape a raw
//! value can take. It compiles to an anchored, case-insensitive regex in which literal text is
//! escaped and each `{{name}}` placeholder becomes a lazy `.+?` group, so a placeholder captures
//! as little as it can while still letting the rest of the template match.
//!
//! A placeholder may constrain what it captures with a regex after a colon, as in
//! `{{power:\d+|\*}}`. The constraint must match the whole capture.

use std::collections::BTreeMap;

use regex::Regex;
use thiserror::Error;

/// Why a template could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// `{{` without a matching `}}`.
    #[error("unclosed placeholder")]
    UnclosedPlaceholder,
    /// `{{}}` or a placeholder name of only whitespace.
    #[error("empty placeholder name")]
    EmptyPlaceholder,
    /// Two placeholders with no literal text between them.
    #[error("adjacent placeholders cannot be told apart")]
    AdjacentPlaceholders,
    /// The same placeholder name used twice.
    #[error("duplicate placeholder '{0}'")]
    DuplicatePlaceholder(String),
    /// A template with no placeholders at all.
    #[error("template has no placeholders")]
    NoPlaceholders,
    /// The generated regex was rejected.
    #[error("template does not compile: {0}")]
    Compile(String),
}

/// A parsed pattern template.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The template as written.
    template: String,
    /// Placeholder names; the capture group for `names[i]` is `p{i}`.
    names: Vec<String>,
    /// The compiled matcher.
    regex: Regex,
}

impl Pattern {
    /// Parses a template.
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let mut names: Vec<String> = Vec::new();
        let mut source = String::from("(?is)^");
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                source.push_str(&regex::escape(&rest[..open]));
            } else if !names.is_empty() {
                return Err(PatternError::AdjacentPlaceholders);
            }
            let after = &rest[open + 2..];
            let close = after.find("}}").ok_or(PatternError::UnclosedPlaceholder)?;
            let (name, constraint) = match after[..close].split_once(':') {
                Some((name, constraint)) => (name.trim(), constraint),
                None => (after[..close].trim(), ""),
            };
            if name.is_empty() {
                return Err(PatternError::EmptyPlaceholder);
            }
            if names.iter().any(|existing| existing == name) {
                return Err(PatternError::DuplicatePlaceholder(name.to_string()));
            }
            let group = names.len();
            if constraint.is_empty() {
                source.push_str(&format!("(?P<p{group}>.+?)"));
            } else {
                source.push_str(&format!("(?P<p{group}>(?:{constraint}))"));
            }
            names.push(name.to_string());
            rest = &after[close + 2..];
        }
        if names.is_empty() {
            return Err(PatternError::NoPlaceholders);
        }
        source.push_str(&regex::escape(rest));
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| PatternError::Compile(e.to_string()))?;
        Ok(Self {
            template: template.to_string(),
            names,
            regex,
        })
    }

    /// The template as written.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names, in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Matches `text` against the whole template, returning the captures.
    pub fn matches(&self, text: &str) -> Option<BTreeMap<String, String>> {
        let caps = self.regex.captures(text)?;
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                caps.name(&format!("p{i}"))
                    .map(|m| (name.clone(), m.as_str().to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captures(template: &str, text: &str) -> Option<Vec<(String, String)>> {
        Pattern::parse(template)
            .unwrap()
            .matches(text)
            .map(|c| c.into_iter().collect())
    }

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn power_toughness() {
        assert_eq!(
            captures("{{power}}/{{toughness}}", "2/3"),
            Some(vec![pair("power", "2"), pair("toughness", "3")])
        );
    }

    #[test]
    fn captures_are_lazy_with_backtracking() {
        assert_eq!(
            captures("{{power}}/{{toughness}}", "*/1+*"),
            Some(vec![pair("power", "*"), pair("toughness", "1+*")])
        );
        assert_eq!(
            captures("{{a}}/{{b}}", "1/2/3"),
            Some(vec![pair("a", "1"), pair("b", "2/3")])
        );
    }

    #[test]
    fn bracketed_shapes() {
        assert_eq!(
            captures("[{{loyalty}}]", "[4]"),
            Some(vec![pair("loyalty", "4")])
        );
        assert_eq!(captures("[{{loyalty}}]", "[4"), None);
        assert_eq!(captures("<{{defense}}>", "<>"), None);
    }

    #[test]
    fn literals_ignore_case() {
        assert_eq!(
            captures("lv{{level}}", "LV3"),
            Some(vec![pair("level", "3")])
        );
    }

    #[test]
    fn whole_text_must_match() {
        assert_eq!(captures("#{{tag}}", "x#elf"), None);
        assert_eq!(captures("#{{tag}}", "#elf"), Some(vec![pair("tag", "elf")]));
    }

    #[test]
    fn placeholders_in_order() {
        let pattern = Pattern::parse("{{power}}/{{toughness}}").unwrap();
        assert_eq!(
            pattern.placeholders().collect::<Vec<_>>(),
            vec!["power", "toughness"]
        );
        assert_eq!(pattern.template(), "{{power}}/{{toughness}}");
    }

    #[test]
    fn literal_text_is_not_regex_syntax() {
        assert_eq!(
            captures("({{cost}}).", "(3)."),
            Some(vec![pair("cost", "3")])
        );
        assert_eq!(captures("({{cost}}).", "(3)x"), None);
        assert_eq!(captures("a+{{n}}", "aa+1"), None);
    }

    #[test]
    fn constrained_placeholders_reject_other_text() {
        let template = r"{{power:-?\d+|[*?x]}}/{{toughness:-?\d+|[*?x]}}";
        assert_eq!(
            captures(template, "*/-1"),
            Some(vec![pair("power", "*"), pair("toughness", "-1")])
        );
        assert_eq!(
            captures(template, "X/3"),
            Some(vec![pair("power", "X"), pair("toughness", "3")])
        );
        assert_eq!(captures(template, "w/u"), None);
        assert_eq!(captures(template, "1/2/3"), None);
        let pattern = Pattern::parse(template).unwrap();
        assert_eq!(
            pattern.placeholders().collect::<Vec<_>>(),
            vec!["power", "toughness"]
        );
    }

    #[test]
    fn malformed_templates() {
        let error = |template: &str| Pattern::parse(template).unwrap_err();
        assert_eq!(error("[{{loyalty]"), PatternError::UnclosedPlaceholder);
        assert_eq!(error("{{ }}"), PatternError::EmptyPlaceholder);
        assert_eq!(error("{{a}}{{b}}"), PatternError::AdjacentPlaceholders);
        assert_eq!(
            error("{{a}}/{{a}}"),
            PatternError::DuplicatePlaceholder("a".into())
        );
        assert_eq!(error("plain"), PatternError::NoPlaceholders);
        assert!(matches!(error("{{a:[}}/{{b}}"), PatternError::Compile(_)));
    }
}
