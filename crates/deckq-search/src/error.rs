//! Error types for the deckq-search crate.

use deckq_query::{QueryError, Span};
use serde::Serialize;
use thiserror::Error;

use crate::pattern::PatternError;

/// Invalid command definitions, caught once when a registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two commands share an id.
    #[error("duplicate command id '{0}'")]
    DuplicateId(String),

    /// An alias collides with another command's id or alias.
    #[error("alias '{alias}' of '{command}' collides with '{existing}'")]
    AliasCollision {
        /// The colliding alias.
        alias: String,
        /// Command declaring the alias.
        command: String,
        /// Command that already owns the name.
        existing: String,
    },

    /// A command declares an empty alias.
    #[error("command '{0}' declares an empty alias")]
    EmptyAlias(String),

    /// A pattern template could not be parsed.
    #[error("malformed pattern '{template}' on '{command}': {source}")]
    MalformedPattern {
        /// Command declaring the pattern.
        command: String,
        /// The template as written.
        template: String,
        /// What is wrong with it.
        source: PatternError,
    },

    /// A command declares patterns but cannot be invoked without an operator.
    #[error("command '{0}' declares patterns but does not accept the bare operator")]
    PatternWithoutBare(String),

    /// A handler was attached to an id no command declares.
    #[error("handler attached to unknown command '{0}'")]
    UnknownHandlerCommand(String),

    /// A command id received a second handler of the same role.
    #[error("command '{command}' has more than one {role} handler")]
    DuplicateHandler {
        /// The command id.
        command: String,
        /// `filter` or `explain`.
        role: &'static str,
    },

    /// A phase command cannot produce its deferred action.
    #[error("phase command '{0}' has no filter handler")]
    PhaseWithoutHandler(String),
}

/// Errors a handler reports about its argument.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HandlerError {
    /// The argument cannot be used with this command.
    #[error("{message}")]
    InvalidQuery {
        /// Human-readable description.
        message: String,
    },

    /// A value outside the command's accepted set.
    #[error("invalid value '{value}', expected one of: {allowed}")]
    InvalidValue {
        /// The offending value.
        value: String,
        /// The accepted values, for display.
        allowed: String,
    },
}

impl HandlerError {
    /// Creates an `InvalidQuery` error.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuery { .. } => "invalid-query",
            Self::InvalidValue { .. } => "invalid-value",
        }
    }
}

/// Semantic errors raised while binding a parsed query to registered commands.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TranslateError {
    /// No command matches the name, and there is no raw command to fall back to.
    #[error("unknown command '{name}'")]
    UnknownCommand {
        /// The name as written.
        name: String,
        /// Location in the query.
        span: Span,
    },

    /// The operator or qualifier is not accepted by the command.
    #[error("operator '{operator}' is not allowed for '{command}'")]
    InvalidOperator {
        /// Resolved command id.
        command: String,
        /// Operator as written, qualifiers included.
        operator: String,
        /// Location in the query.
        span: Span,
    },

    /// A regex value was given to a command that does not accept regexes.
    #[error("'{command}' does not accept regular expressions")]
    InvalidRegex {
        /// Resolved command id.
        command: String,
        /// Location in the query.
        span: Span,
    },

    /// A regex value that does not compile.
    #[error("malformed regular expression: {message}")]
    MalformedRegex {
        /// Compiler message.
        message: String,
        /// Location in the query.
        span: Span,
    },

    /// A phase command nested below the top level.
    #[error("'{command}' can only be used at the top level of a query")]
    NotTopLevel {
        /// Resolved command id.
        command: String,
        /// Location in the query.
        span: Span,
    },

    /// The command has no filter handler.
    #[error("'{command}' cannot be used in searches")]
    MissingHandler {
        /// Resolved command id.
        command: String,
        /// Location in the query.
        span: Span,
    },

    /// The handler rejected its argument.
    #[error("{command}: {source}")]
    Handler {
        /// Resolved command id.
        command: String,
        /// Operator as written, qualifiers included.
        operator: String,
        /// Location in the query.
        span: Span,
        /// The handler's error.
        source: HandlerError,
    },

    /// The handler failed unexpectedly.
    #[error("internal error while translating '{command}'")]
    Internal {
        /// Resolved command id.
        command: String,
        /// Location in the query.
        span: Span,
    },
}

impl TranslateError {
    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand { .. } => "unknown-command",
            Self::InvalidOperator { .. } => "invalid-operator",
            Self::InvalidRegex { .. } => "invalid-regex",
            Self::MalformedRegex { .. } => "malformed-regex",
            Self::NotTopLevel { .. } => "not-toplevel-command",
            Self::MissingHandler { .. } => "missing-handler",
            Self::Handler { source, .. } => source.code(),
            Self::Internal { .. } => "internal",
        }
    }

    /// Location in the query.
    pub const fn span(&self) -> Span {
        match self {
            Self::UnknownCommand { span, .. }
            | Self::InvalidOperator { span, .. }
            | Self::InvalidRegex { span, .. }
            | Self::MalformedRegex { span, .. }
            | Self::NotTopLevel { span, .. }
            | Self::MissingHandler { span, .. }
            | Self::Handler { span, .. }
            | Self::Internal { span, .. } => *span,
        }
    }

    /// Renders the error with a pointer under the offending part of `query`.
    pub fn render(&self, query: &str) -> String {
        let span = self.span();
        let start = span.start.min(query.len());
        let end = span.end.clamp(start, query.len());
        let mut out = format!("query error: {self}\n  {query}\n");
        if let (Some(before), Some(under)) = (query.get(..start), query.get(start..end)) {
            out.push_str(&format!(
                "  {}{}\n",
                " ".repeat(before.chars().count()),
                "^".repeat(under.chars().count().max(1))
            ));
        }
        out
    }
}

/// Any error from compiling or explaining a query string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The query did not lex or parse.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// The query parsed but could not be bound to the registry.
    #[error(transparent)]
    Translate(#[from] TranslateError),
}

impl SearchError {
    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Query(err) => err.code(),
            Self::Translate(err) => err.code(),
        }
    }

    /// Location in the query.
    pub const fn span(&self) -> Span {
        match self {
            Self::Query(err) => err.span,
            Self::Translate(err) => err.span(),
        }
    }

    /// Renders the error for a terminal, with a pointer under the offending input.
    pub fn render(&self, query: &str) -> String {
        match self {
            Self::Query(err) => err.clone().with_query(query).to_string(),
            Self::Translate(err) => err.render(query),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_command_payload_names_the_command() {
        let err = TranslateError::UnknownCommand {
            name: "foo".into(),
            span: Span::new(0, 3),
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["type"], json!("unknown-command"));
        assert_eq!(value["name"], json!("foo"));
        assert_eq!(err.code(), "unknown-command");
    }

    #[test]
    fn handler_error_code_passes_through() {
        let err = TranslateError::Handler {
            command: "cost".into(),
            operator: ">=".into(),
            span: Span::new(0, 7),
            source: HandlerError::invalid_query("'x' is not a number"),
        };
        assert_eq!(err.code(), "invalid-query");
        assert_eq!(err.to_string(), "cost: 'x' is not a number");
    }

    #[test]
    fn render_points_at_span() {
        let err = TranslateError::NotTopLevel {
            command: "order".into(),
            span: Span::new(1, 11),
        };
        let rendered = err.render("(order:name & t:elf)");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2], format!("   {}", "^".repeat(10)));
    }

    #[test]
    fn search_error_wraps_both_layers() {
        let err: SearchError = TranslateError::InvalidRegex {
            command: "cost".into(),
            span: Span::new(5, 8),
        }
        .into();
        assert_eq!(err.code(), "invalid-regex");
        assert_eq!(err.span(), Span::new(5, 8));
    }
}
