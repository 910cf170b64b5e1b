//! Query parser.
//!
//! Parses a query string into an [`Expr`] tree using recursive descent with one token of
//! lookahead.
//!
//! # Grammar
//!
//! ```text
//! query    → unary (SEP unary)*            SEP is '&' or '|', one kind per level
//! unary    → ('-' | '!')? primary
//! primary  → '(' query ')'
//!          | IDENT OPERATOR argument        → Simple
//!          | IDENT ('/' IDENT)+             → Slash
//!          | '#' IDENT                      → Hash
//!          | IDENT | STRING | REGEX         → Raw
//! argument → TEXT | STRING | REGEX          lexed in text mode
//! ```
//!
//! There is no precedence between `&` and `|`: mixing them at one level without parentheses is
//! an `inconsistent-separator` error.
//!
//! Every consumed token is kept in a history arena. Each expression records the range of history
//! indices it consumed, and its span is computed from those tokens.

use tracing::debug;

use crate::{
    ast::{ArgKind, Expr, ExprKind, Operator, Qualifier, Qualifiers, Separator},
    error::{LexError, QueryError, SyntaxErrorKind},
    lexer::{LexOptions, Lexer, Span, Token, TokenKind},
};

/// A successfully parsed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// The root expression.
    pub expr: Expr,
    /// Every token consumed, in input order.
    pub tokens: Vec<Token>,
}

/// The result of a parse attempt, with diagnostics kept even on failure.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// The root expression, or the syntax error that aborted the parse.
    pub result: Result<Expr, QueryError>,
    /// Every token in the input, including those after a syntax error.
    pub tokens: Vec<Token>,
    /// Lexical problems recorded while tokenizing.
    pub lex_errors: Vec<LexError>,
}

/// Recursive descent parser over an on-demand lexer.
struct Parser<'a> {
    /// Token source.
    lexer: Lexer<'a>,
    /// Every token consumed so far.
    history: Vec<Token>,
}

impl<'a> Parser<'a> {
    /// Creates a parser for the given input.
    const fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            history: Vec::new(),
        }
    }

    /// Returns the next token without consuming it.
    fn peek(&self, opts: LexOptions) -> Option<Token> {
        self.lexer.peek(opts)
    }

    /// Consumes the next token into the history.
    fn advance(&mut self, opts: LexOptions) -> Option<Token> {
        let token = self.lexer.next(opts)?;
        self.history.push(token.clone());
        Some(token)
    }

    /// Consumes any whitespace at the current position.
    fn skip_whitespace(&mut self) {
        while self
            .peek(LexOptions::default())
            .is_some_and(|t| t.kind == TokenKind::Whitespace)
        {
            self.advance(LexOptions::default());
        }
    }

    /// Builds an expression covering the history from `start` to now.
    fn finish(&self, start: usize, kind: ExprKind) -> Expr {
        let consumed = &self.history[start.min(self.history.len())..];
        let mut significant = consumed
            .iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| t.span);
        let span = match significant.next() {
            Some(first) => significant.fold(first, Span::to),
            None => Span::at(self.lexer.position()),
        };
        Expr::new(kind, span, start..self.history.len())
    }

    /// Error for input that stops where more was required.
    fn unexpected_end(&self) -> QueryError {
        QueryError::syntax(
            SyntaxErrorKind::UnexpectedEnd,
            Span::at(self.lexer.input().len()),
        )
    }

    /// Parses the whole input, requiring every token to be consumed.
    fn parse_root(&mut self) -> Result<Expr, QueryError> {
        self.skip_whitespace();
        if self.peek(LexOptions::default()).is_none() {
            return Err(QueryError::syntax(
                SyntaxErrorKind::EmptyInput,
                Span::new(0, self.lexer.input().len()),
            ));
        }

        let mut expr = self.parse_query()?;

        self.skip_whitespace();
        if let Some(token) = self.peek(LexOptions::default()) {
            return Err(QueryError::syntax(SyntaxErrorKind::UnknownToken, token.span));
        }

        expr.mark_top_level();
        Ok(expr)
    }

    /// Parses: query → unary (SEP unary)*
    fn parse_query(&mut self) -> Result<Expr, QueryError> {
        self.skip_whitespace();
        let start = self.history.len();
        let mut children = vec![self.parse_unary()?];
        let mut separator = None;

        loop {
            self.skip_whitespace();
            let Some(token) = self.peek(LexOptions::default()) else {
                break;
            };
            let next = if token.is_punct("&") {
                Separator::And
            } else if token.is_punct("|") {
                Separator::Or
            } else {
                break;
            };
            match separator {
                Some(current) if current != next => {
                    return Err(QueryError::syntax(
                        SyntaxErrorKind::InconsistentSeparator,
                        token.span,
                    ));
                }
                _ => separator = Some(next),
            }
            self.advance(LexOptions::default());
            children.push(self.parse_unary()?);
        }

        match separator {
            Some(separator) => Ok(self.finish(
                start,
                ExprKind::Logic {
                    separator,
                    children,
                },
            )),
            None => Ok(children.remove(0)),
        }
    }

    /// Parses: unary → ('-' | '!')? primary
    fn parse_unary(&mut self) -> Result<Expr, QueryError> {
        self.skip_whitespace();
        let start = self.history.len();
        let negated = self
            .peek(LexOptions::default())
            .is_some_and(|t| t.is_punct("-") || t.is_punct("!"));
        if !negated {
            return self.parse_primary();
        }

        self.advance(LexOptions::default());
        let inner = self.parse_primary()?;
        Ok(self.finish(
            start,
            ExprKind::Not {
                inner: Box::new(inner),
            },
        ))
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr, QueryError> {
        self.skip_whitespace();
        let start = self.history.len();
        let Some(token) = self.peek(LexOptions::default()) else {
            return Err(self.unexpected_end());
        };

        match token.kind {
            TokenKind::Identifier => self.parse_identifier(start),
            TokenKind::String | TokenKind::Regex => {
                self.advance(LexOptions::default());
                let arg_kind = if token.kind == TokenKind::String {
                    ArgKind::String
                } else {
                    ArgKind::Regex
                };
                Ok(self.finish(
                    start,
                    ExprKind::Raw {
                        arg_kind,
                        raw_value: token.text,
                    },
                ))
            }
            TokenKind::Punctuation if token.is_punct("(") => self.parse_group(start, &token),
            TokenKind::Punctuation if token.is_punct("#") => self.parse_hash(start),
            _ => Err(QueryError::syntax(SyntaxErrorKind::UnknownToken, token.span)),
        }
    }

    /// Parses: '(' query ')'
    fn parse_group(&mut self, start: usize, open: &Token) -> Result<Expr, QueryError> {
        self.advance(LexOptions::default());
        let inner = self.parse_query()?;

        self.skip_whitespace();
        match self.peek(LexOptions::default()) {
            Some(token) if token.is_punct(")") => {
                self.advance(LexOptions::default());
                Ok(self.finish(
                    start,
                    ExprKind::Paren {
                        inner: Box::new(inner),
                    },
                ))
            }
            Some(token) => Err(QueryError::syntax(SyntaxErrorKind::UnknownToken, token.span)),
            None => Err(QueryError::syntax(SyntaxErrorKind::UnclosedParen, open.span)),
        }
    }

    /// Parses: '#' IDENT
    fn parse_hash(&mut self, start: usize) -> Result<Expr, QueryError> {
        self.advance(LexOptions::default());
        match self.peek(LexOptions::default()) {
            Some(token) if token.kind == TokenKind::Identifier => {
                self.advance(LexOptions::default());
                Ok(self.finish(start, ExprKind::Hash { tag: token.text }))
            }
            Some(token) if token.kind != TokenKind::Whitespace => {
                Err(QueryError::syntax(SyntaxErrorKind::UnknownToken, token.span))
            }
            _ => Err(QueryError::syntax(
                SyntaxErrorKind::UnexpectedEnd,
                Span::at(self.lexer.position()),
            )),
        }
    }

    /// Parses an identifier-led primary: Simple, Slash or Raw.
    fn parse_identifier(&mut self, start: usize) -> Result<Expr, QueryError> {
        let Some(ident) = self.advance(LexOptions::default()) else {
            return Err(self.unexpected_end());
        };

        let operator = self
            .peek(LexOptions::default())
            .filter(|t| t.kind == TokenKind::Punctuation)
            .and_then(|t| Operator::from_punct(&t.text).map(|op| (op, t)));

        let Some(((operator, negated), op_token)) = operator else {
            return Ok(self.finish(start, bare_identifier(ident.text)));
        };
        self.advance(LexOptions::default());

        let (arg_kind, raw_value) = self.parse_argument(op_token.span)?;
        let mut qualifiers = Qualifiers::new();
        if negated {
            qualifiers.insert(Qualifier::Not);
        }

        Ok(self.finish(
            start,
            ExprKind::Simple {
                command: ident.text,
                operator,
                qualifiers,
                arg_kind,
                raw_value,
            },
        ))
    }

    /// Parses the argument that must immediately follow an operator.
    fn parse_argument(&mut self, operator: Span) -> Result<(ArgKind, String), QueryError> {
        let missing = QueryError::syntax(SyntaxErrorKind::UnexpectedEnd, Span::at(operator.end));
        let Some(token) = self.peek(LexOptions::TEXT) else {
            return Err(missing);
        };

        let arg_kind = match token.kind {
            TokenKind::Identifier => ArgKind::Text,
            TokenKind::String => ArgKind::String,
            TokenKind::Regex => ArgKind::Regex,
            TokenKind::Whitespace => return Err(missing),
            TokenKind::Punctuation => {
                return Err(QueryError::syntax(SyntaxErrorKind::UnknownToken, token.span));
            }
        };
        self.advance(LexOptions::TEXT);
        Ok((arg_kind, token.text))
    }

    /// Consumes the rest of the input so the history covers every token.
    fn drain(&mut self) {
        while self.advance(LexOptions::default()).is_some() {}
    }
}

/// Classifies an identifier with no operator as a slash alternation or raw text.
fn bare_identifier(text: String) -> ExprKind {
    let parts: Vec<&str> = text.split('/').collect();
    if parts.len() >= 2 && parts.iter().all(|p| !p.is_empty()) {
        ExprKind::Slash {
            parts: parts.into_iter().map(String::from).collect(),
        }
    } else {
        ExprKind::Raw {
            arg_kind: ArgKind::Text,
            raw_value: text,
        }
    }
}

/// Parses a query, keeping the token history and lexical errors even when parsing fails.
pub fn parse_partial(input: &str) -> ParseOutcome {
    let mut parser = Parser::new(input);
    let result = parser.parse_root();
    if let Err(err) = &result {
        debug!(code = err.code(), start = err.span.start, "query failed to parse");
    }
    parser.drain();

    ParseOutcome {
        result: result.map_err(|e| e.with_query(input)),
        tokens: parser.history,
        lex_errors: parser.lexer.into_errors(),
    }
}

/// Parses a query string.
///
/// Syntax errors take priority; otherwise the first recorded lexical error fails the parse.
pub fn parse(input: &str) -> Result<Query, QueryError> {
    debug!(query = input, "parsing query");
    let outcome = parse_partial(input);
    let expr = outcome.result?;
    if let Some(err) = outcome.lex_errors.first() {
        return Err(QueryError::from(*err).with_query(input));
    }
    Ok(Query {
        expr,
        tokens: outcome.tokens,
    })
}
