//! Shared context for running CLI commands.

use std::{
    env,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    process::ExitCode,
};

use deckq_config::Config;
use deckq_games::Game;
use deckq_search::{MessageCatalog, Registry};

use crate::cli::args::GameArgs;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init` and the pure syntax commands, which should work even when an existing
    /// config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// The game named on the command line, else the configured one.
    pub fn game(&self, args: &GameArgs) -> Result<Game, ExitCode> {
        let name = args.game.as_deref().unwrap_or(&self.config.settings.game);
        name.parse().map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }

    /// Builds the command registry for the selected game.
    pub fn registry(&self, args: &GameArgs) -> Result<(Game, Registry), ExitCode> {
        let game = self.game(args)?;
        let registry = game.registry().map_err(|e| {
            eprintln!("error: the {game} command set is invalid: {e}");
            ExitCode::FAILURE
        })?;
        Ok((game, registry))
    }

    /// Builds the message catalog for `locale`, else the configured locale.
    pub fn catalog(&self, locale: Option<&str>) -> Result<MessageCatalog, ExitCode> {
        let locale = locale.unwrap_or(&self.config.settings.locale);
        self.config.catalog(locale).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }

    /// Whether to colour output: enabled in config and stdout is a terminal.
    pub fn color(&self) -> bool {
        self.config.output.color && io::stdout().is_terminal()
    }

    /// Whether to emit JSON: requested by flag or config.
    pub const fn json(&self, flag: bool) -> bool {
        flag || self.config.output.json
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
