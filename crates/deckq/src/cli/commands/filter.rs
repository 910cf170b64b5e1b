//! Implementation of `deckq filter`.

use std::process::ExitCode;

use deckq_games::Game;
use deckq_search::compile;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cli::{
    args::FilterCommand,
    context::CommandContext,
    output::{print_document, print_json, report_query_error},
};

/// JSON output for `deckq filter`.
#[derive(Serialize)]
struct JsonFilter<'a> {
    /// The query as given.
    query: &'a str,
    /// Game whose commands were used.
    game: Game,
    /// The compiled plan document.
    plan: Value,
}

/// Compiles a query and prints the resulting plan document.
pub fn run(ctx: &CommandContext, cmd: &FilterCommand) -> ExitCode {
    let query = &cmd.query.query;
    let json = ctx.json(cmd.output.json);
    let (game, registry) = match ctx.registry(&cmd.game) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let translation = match compile(&registry, query) {
        Ok(translation) => translation,
        Err(err) => return report_query_error(query, &err, json),
    };
    let plan = translation.into_plan();
    debug!(%game, sort_keys = plan.sort.len(), "compiled query");
    let document = plan.to_document();

    if json {
        print_json(&JsonFilter {
            query,
            game,
            plan: document,
        })
    } else {
        print_document(&document, ctx.color())
    }
}
