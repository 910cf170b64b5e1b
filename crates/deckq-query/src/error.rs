//! Error types for query lexing and parsing.
//!
//! Lexical problems are recorded by the lexer without aborting; syntactic problems abort the
//! current parse. Both are surfaced to callers as a [`QueryError`] that knows how to render
//! itself underneath the original query string.

use std::{error::Error, fmt};

use serde::Serialize;
use thiserror::Error;

use crate::lexer::Span;

/// The kind of problem the lexer recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LexErrorKind {
    /// A character that cannot start any token.
    #[error("unknown character")]
    UnknownChar,
    /// A quoted string without its closing quote.
    #[error("unterminated string")]
    UnterminatedString,
    /// A regex literal without its closing slash.
    #[error("unterminated regex")]
    UnterminatedRegex,
    /// A `[...]` character class inside a regex that is never closed.
    #[error("unterminated character class in regex")]
    UnterminatedRegexClass,
    /// A backslash with nothing left to escape.
    #[error("unexpected escape at end of input")]
    UnexpectedEscape,
}

impl LexErrorKind {
    /// Stable machine-readable code for this kind.
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnknownChar => "unknown-char",
            Self::UnterminatedString => "unterminated-string",
            Self::UnterminatedRegex => "unterminated-regex",
            Self::UnterminatedRegexClass => "unterminated-regex-class",
            Self::UnexpectedEscape => "unexpected-escape",
        }
    }
}

/// A recorded, non-fatal lexer problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LexError {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Where in the input it went wrong.
    pub span: Span,
}

impl LexError {
    /// Creates a new lexer error.
    pub const fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.kind, self.span.start, self.span.end)
    }
}

impl Error for LexError {}

/// The kind of syntax error that aborted a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxErrorKind {
    /// The query contains nothing but whitespace.
    #[error("empty query")]
    EmptyInput,
    /// The query ended where an expression or argument was required.
    #[error("unexpected end of query")]
    UnexpectedEnd,
    /// `&` and `|` were mixed at one nesting level.
    #[error("cannot mix '&' and '|' without parentheses")]
    InconsistentSeparator,
    /// An opening parenthesis was never closed.
    #[error("expected closing parenthesis")]
    UnclosedParen,
    /// A token that does not fit the grammar at this point.
    #[error("unexpected token")]
    UnknownToken,
}

impl SyntaxErrorKind {
    /// Stable machine-readable code for this kind.
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyInput => "empty-input",
            Self::UnexpectedEnd => "unexpected-end",
            Self::InconsistentSeparator => "inconsistent-separator",
            Self::UnclosedParen => "unclosed-paren",
            Self::UnknownToken => "unknown-token",
        }
    }
}

/// The specific kind of query error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Lexer error surfaced after parsing.
    Lex(LexErrorKind),
    /// Parser error (invalid syntax).
    Syntax(SyntaxErrorKind),
}

/// A unified error type for query parsing.
///
/// Carries the span of the offending input and, when available, the original query string so the
/// error can be rendered with a pointer underneath the problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// Byte span of the offending input.
    pub span: Span,
    /// The original query string (if available).
    pub query: Option<String>,
}

impl QueryError {
    /// Creates an error from a recorded lexer problem.
    pub const fn lex(kind: LexErrorKind, span: Span) -> Self {
        Self {
            kind: QueryErrorKind::Lex(kind),
            span,
            query: None,
        }
    }

    /// Creates a syntax error.
    pub const fn syntax(kind: SyntaxErrorKind, span: Span) -> Self {
        Self {
            kind: QueryErrorKind::Syntax(kind),
            span,
            query: None,
        }
    }

    /// Sets the query string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the stable code for this error (e.g. `unterminated-string`).
    pub const fn code(&self) -> &'static str {
        match self.kind {
            QueryErrorKind::Lex(kind) => kind.code(),
            QueryErrorKind::Syntax(kind) => kind.code(),
        }
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        match self.kind {
            QueryErrorKind::Lex(kind) => kind.to_string(),
            QueryErrorKind::Syntax(kind) => kind.to_string(),
        }
    }

    /// Returns a suggestion for common errors.
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self.kind {
            QueryErrorKind::Lex(LexErrorKind::UnterminatedString) => {
                Some("Add a closing quote to complete the string")
            }
            QueryErrorKind::Lex(LexErrorKind::UnterminatedRegex) => {
                Some("Regexes are written between slashes, e.g. /^lightning/")
            }
            QueryErrorKind::Syntax(SyntaxErrorKind::UnclosedParen) => {
                Some("Add a closing parenthesis ) to match the opening one")
            }
            QueryErrorKind::Syntax(SyntaxErrorKind::InconsistentSeparator) => {
                Some("Group with parentheses, e.g. 'a:x | (b:y & c:z)'")
            }
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query syntax error: {}", self.message())?;

        if let Some(query) = &self.query {
            let start = self.span.start.min(query.len());
            let end = self.span.end.clamp(start, query.len());
            let (Some(before), Some(under)) = (query.get(..start), query.get(start..end)) else {
                return writeln!(f, "  {query}");
            };
            let padding = before.chars().count();
            let width = under.chars().count().max(1);
            writeln!(f, "  {query}")?;
            writeln!(f, "  {}{}", " ".repeat(padding), "^".repeat(width))?;
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {suggestion}")?;
        }

        Ok(())
    }
}

impl Error for QueryError {}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        Self::lex(err.kind, err.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = QueryError::lex(LexErrorKind::UnterminatedString, Span::new(0, 12))
            .with_query("\"hello world");
        let display = err.to_string();
        assert!(display.contains("unterminated string"));
        assert!(display.contains("\"hello world"));
        assert!(display.contains("^^^^"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn syntax_error_display_points_at_span() {
        let err = QueryError::syntax(SyntaxErrorKind::InconsistentSeparator, Span::new(10, 11))
            .with_query("a:x & b:y | c:z");
        let display = err.to_string();
        let lines: Vec<&str> = display.lines().collect();
        assert_eq!(lines[2], format!("  {}^", " ".repeat(10)));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn caret_counts_characters_not_bytes() {
        let err = QueryError::syntax(SyntaxErrorKind::UnknownToken, Span::new(7, 8))
            .with_query("épée )");
        let display = err.to_string();
        let lines: Vec<&str> = display.lines().collect();
        assert_eq!(lines[2], "       ^");
    }

    #[test]
    fn codes_are_kebab_case() {
        assert_eq!(
            QueryError::syntax(SyntaxErrorKind::EmptyInput, Span::default()).code(),
            "empty-input"
        );
        assert_eq!(
            QueryError::lex(LexErrorKind::UnterminatedRegexClass, Span::default()).code(),
            "unterminated-regex-class"
        );
    }

    #[test]
    fn error_with_query() {
        let err =
            QueryError::syntax(SyntaxErrorKind::UnknownToken, Span::new(0, 1)).with_query("xyz");
        assert_eq!(err.query.as_deref(), Some("xyz"));
    }

    #[test]
    fn no_suggestion_for_unknown_token() {
        let err = QueryError::syntax(SyntaxErrorKind::UnknownToken, Span::new(0, 1));
        assert!(err.suggestion().is_none());
    }
}
