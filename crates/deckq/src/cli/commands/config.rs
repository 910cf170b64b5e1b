//! Implementation of `deckq config`.

use std::process::ExitCode;

use deckq_highlight::Highlighter;

use crate::cli::{
    context::CommandContext,
    output::{dim, emit},
};

/// Shows effective configuration settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    let toml = match config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let color = ctx.color();
    if config.sources.is_empty() {
        emit(&dim("# no configuration files found; showing defaults"), color);
    }
    for source in &config.sources {
        emit(&dim(&format!("# from {}", source.display())), color);
    }
    if color {
        print!("{}", Highlighter::new().highlight_toml(&toml));
    } else {
        print!("{toml}");
    }
    ExitCode::SUCCESS
}
