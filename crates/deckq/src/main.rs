//! Command-line interface for the `deckq` card-search query tool.
//!
//! deckq parses the search language shared by card databases (`t:goblin & c<=2`), binds it to a
//! game's command registry, and either compiles it into a backend filter document or explains it
//! in plain language. Each stage can be inspected from the command line.

mod cli;

use std::{io, process::ExitCode};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{args::parse_cli, commands};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "DECKQ_LOG";

fn main() -> ExitCode {
    init_logging();
    let cli = parse_cli();
    commands::run(cli.command)
}

/// Installs a stderr subscriber filtered by `DECKQ_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}
