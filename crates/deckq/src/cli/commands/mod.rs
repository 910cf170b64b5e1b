//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod explain;
pub mod filter;
pub mod init;
pub mod list;
pub mod parse;
pub mod tokens;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands) -> ExitCode {
    let ctx = match command {
        Commands::Tokens(_) | Commands::Parse(_) | Commands::Check | Commands::Init(_) => {
            CommandContext::load_cwd_only()
        }
        _ => CommandContext::load(),
    };
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    match command {
        Commands::Tokens(cmd) => tokens::run(&ctx, &cmd),
        Commands::Parse(cmd) => parse::run(&ctx, &cmd),
        Commands::Filter(cmd) => filter::run(&ctx, &cmd),
        Commands::Explain(cmd) => explain::run(&ctx, &cmd),
        Commands::Commands(cmd) => list::run(&ctx, &cmd),
        Commands::Config => config::run(&ctx),
        Commands::Check => check::run(&ctx),
        Commands::Init(cmd) => init::run(&ctx, &cmd),
    }
}
