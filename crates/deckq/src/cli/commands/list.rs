//! Implementation of `deckq commands`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use deckq_games::Game;
use deckq_query::Operator;
use deckq_search::Command;
use serde::Serialize;

use crate::cli::{
    args::CommandsCommand,
    context::CommandContext,
    output::{emit, header, print_json},
};

/// JSON output for `deckq commands`.
#[derive(Serialize)]
struct JsonCommands<'a> {
    /// Game whose commands are listed.
    game: Game,
    /// Commands in registration order.
    commands: &'a [Command],
}

/// Lists the commands of a game.
pub fn run(ctx: &CommandContext, cmd: &CommandsCommand) -> ExitCode {
    let (game, registry) = match ctx.registry(&cmd.game) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    if ctx.json(cmd.output.json) {
        return print_json(&JsonCommands {
            game,
            commands: registry.commands(),
        });
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        "Command",
        "Aliases",
        "Operators",
        "Modifiers",
        "Patterns",
        "Phase",
    ]);
    for command in registry.commands() {
        table.add_row(vec![
            Cell::new(command_name(command)),
            Cell::new(command.aliases.join(", ")),
            Cell::new(operators(command)),
            Cell::new(modifiers(command)),
            Cell::new(command.patterns.join(" ")),
            Cell::new(command.phase.as_deref().unwrap_or("")),
        ]);
    }

    let color = ctx.color();
    emit(&header(&format!("Commands for {game}")), color);
    println!("{table}");
    ExitCode::SUCCESS
}

/// The id, or `(raw)` for the raw command.
fn command_name(command: &Command) -> &str {
    if command.is_raw() { "(raw)" } else { &command.id }
}

/// Accepted operators as written, `!` included when negation is accepted.
fn operators(command: &Command) -> String {
    let mut parts: Vec<&str> = command
        .operators
        .iter()
        .map(|op| match op {
            Operator::Bare => "bare",
            other => other.as_str(),
        })
        .collect();
    if !command.qualifiers.is_empty() {
        parts.push("!");
    }
    if command.allow_regex {
        parts.push("/re/");
    }
    parts.join(" ")
}

/// Modifiers with their short aliases, e.g. `oracle (o)`.
fn modifiers(command: &Command) -> String {
    command
        .modifiers
        .iter()
        .map(|(name, alias)| match alias {
            Some(alias) => format!("{name} ({alias})"),
            None => name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
