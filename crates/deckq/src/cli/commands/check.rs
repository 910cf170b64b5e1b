//! Implementation of `deckq check`.

use std::process::ExitCode;

use deckq_config::{Config, ConfigWarning, discover_config_files};
use deckq_games::Game;

use crate::cli::{
    context::CommandContext,
    output::{dim, emit, subheader, success, warning},
};

/// Exit codes for `deckq check`.
mod exit_codes {
    use std::process::ExitCode;

    /// Configuration is valid with no warnings.
    pub const OK: ExitCode = ExitCode::SUCCESS;
    /// Configuration has warnings but is usable.
    pub const WARNINGS: ExitCode = ExitCode::FAILURE;
    /// Configuration has errors and cannot be used.
    pub const ERROR: ExitCode = ExitCode::FAILURE;
}

/// Validates configuration and reports problems.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let color = ctx.color();
    let config_files = discover_config_files(&ctx.cwd);

    if config_files.is_empty() {
        emit(&dim("No configuration files found."), color);
        println!();
        println!("Run 'deckq init' to create a configuration file.");
        return exit_codes::OK;
    }

    emit(&subheader("Config files:"), color);
    for path in &config_files {
        println!("  {}", path.display());
    }
    println!();

    let config = match Config::load_from_files(&config_files) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_codes::ERROR;
        }
    };

    emit(&subheader("Settings:"), color);
    let game_status = match config.game() {
        Ok(game) => registry_status(game),
        Err(_) => warning("[unknown]"),
    };
    emit(
        &format!("  game   {} {game_status}", config.settings.game),
        color,
    );
    println!("  locale {}", config.settings.locale);
    println!();

    if !config.explain.catalogs.is_empty() {
        emit(&subheader("Catalogs:"), color);
        for source in &config.explain.catalogs {
            let scope = if source.is_global { "global" } else { "local" };
            let status = if source.path.is_file() {
                success("[ok]")
            } else {
                warning("[missing]")
            };
            emit(
                &format!(
                    "  {} {} {status}",
                    source.path.display(),
                    dim(&format!("({scope})"))
                ),
                color,
            );
        }
        println!();
    }

    let warnings = config.validate();
    if warnings.is_empty() {
        emit(&success("No issues found."), color);
        return exit_codes::OK;
    }

    println!("Warnings ({}):", warnings.len());
    for w in &warnings {
        emit(&format!("  - {}", warning(&w.to_string())), color);
    }
    println!();
    print_hints(&warnings);

    exit_codes::WARNINGS
}

/// Whether the game's command set builds.
fn registry_status(game: Game) -> String {
    match game.registry() {
        Ok(registry) => success(&format!("[ok, {} commands]", registry.commands().len())),
        Err(e) => warning(&format!("[invalid: {e}]")),
    }
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<String> = warnings
        .iter()
        .map(|w| match w {
            ConfigWarning::UnknownGame { .. } => format!(
                "Set [settings] game to one of: {}.",
                Game::ALL.map(Game::name).join(", ")
            ),
            ConfigWarning::UnknownLocale { .. } => {
                "Add a catalog for the locale under [explain] catalogs.".to_string()
            }
            ConfigWarning::CatalogMissing { .. } => {
                "Create the missing catalog or remove it from [explain] catalogs.".to_string()
            }
            ConfigWarning::CatalogInvalid { .. } => {
                "Catalogs are TOML tables whose leaves are message strings.".to_string()
            }
        })
        .collect();

    hints.sort();
    hints.dedup();

    if !hints.is_empty() {
        println!("Hints:");
        for hint in hints {
            println!("  - {hint}");
        }
    }
}
