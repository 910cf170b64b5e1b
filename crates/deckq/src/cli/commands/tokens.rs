//! Implementation of `deckq tokens`.

use std::process::ExitCode;

use deckq_highlight::{caret_line, highlight_query};
use deckq_query::{LexError, Token, TokenKind, parse_partial};
use serde::Serialize;

use crate::cli::{
    args::TokensCommand,
    context::CommandContext,
    output::{dim, emit, print_json, subheader, warning},
};

/// JSON output for `deckq tokens`.
#[derive(Serialize)]
struct JsonTokens<'a> {
    /// Every token, in input order.
    tokens: &'a [Token],
    /// Recorded lexical problems.
    errors: &'a [LexError],
}

/// Lists the tokens of a query as the parser reads them.
///
/// Lexical problems are reported but do not fail the command; `deckq parse` does.
pub fn run(ctx: &CommandContext, cmd: &TokensCommand) -> ExitCode {
    let query = &cmd.query.query;
    let outcome = parse_partial(query);

    if ctx.json(cmd.output.json) {
        return print_json(&JsonTokens {
            tokens: &outcome.tokens,
            errors: &outcome.lex_errors,
        });
    }

    let color = ctx.color();
    for token in &outcome.tokens {
        let span = format!("{}..{}", token.span.start, token.span.end);
        let line = format!(
            "{:<12} {} {:?}",
            kind_name(token.kind),
            dim(&format!("{span:<8}")),
            token.text
        );
        emit(&line, color);
    }
    println!();
    emit(&highlight_query(&outcome.tokens), color);

    if !outcome.lex_errors.is_empty() {
        println!();
        emit(&subheader("Lexical errors:"), color);
        for err in &outcome.lex_errors {
            emit(&format!("  {}", warning(&err.to_string())), color);
            for line in caret_line(query, err.span).lines() {
                emit(&format!("    {line}"), color);
            }
        }
    }
    ExitCode::SUCCESS
}

/// Display name of a token kind.
const fn kind_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Whitespace => "whitespace",
        TokenKind::Punctuation => "punctuation",
        TokenKind::Identifier => "identifier",
        TokenKind::String => "string",
        TokenKind::Regex => "regex",
    }
}
