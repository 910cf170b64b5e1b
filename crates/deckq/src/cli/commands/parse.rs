//! Implementation of `deckq parse`.

use std::process::ExitCode;

use deckq_query::parse;
use deckq_search::SearchError;

use crate::cli::{
    args::ParseCommand,
    context::CommandContext,
    output::{dim, emit, print_json, report_query_error},
};

/// Parses a query and prints its syntax tree.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let query = &cmd.query.query;
    let json = ctx.json(cmd.output.json);
    let parsed = match parse(query) {
        Ok(parsed) => parsed,
        Err(err) => return report_query_error(query, &SearchError::from(err), json),
    };

    if json {
        return print_json(&parsed.expr);
    }

    let color = ctx.color();
    emit(&dim(&parsed.expr.sexp()), color);
    print!("{}", parsed.expr);
    ExitCode::SUCCESS
}
