//! Implementation of `deckq explain`.

use std::process::ExitCode;

use deckq_search::explain;
use serde::Serialize;

use crate::cli::{
    args::ExplainCommand,
    context::CommandContext,
    output::{dim, emit, print_json, report_query_error},
};

/// Printed when some part of the query has no explanation.
const NO_EXPLANATION: &str = "no explanation available";

/// JSON output for `deckq explain`.
#[derive(Serialize)]
struct JsonExplanation<'a> {
    /// The query as given.
    query: &'a str,
    /// Locale of the messages.
    locale: &'a str,
    /// The explanation; `null` when unavailable.
    explanation: Option<String>,
}

/// Explains a query in plain language.
pub fn run(ctx: &CommandContext, cmd: &ExplainCommand) -> ExitCode {
    let query = &cmd.query.query;
    let json = ctx.json(cmd.output.json);
    let (_, registry) = match ctx.registry(&cmd.game) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let catalog = match ctx.catalog(cmd.locale.as_deref()) {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };

    let explanation = match explain(&registry, &catalog, query) {
        Ok(explanation) => explanation,
        Err(err) => return report_query_error(query, &err, json),
    };

    if json {
        return print_json(&JsonExplanation {
            query,
            locale: catalog.locale(),
            explanation,
        });
    }
    match explanation {
        Some(text) => println!("{text}"),
        None => emit(&dim(NO_EXPLANATION), ctx.color()),
    }
    ExitCode::SUCCESS
}
