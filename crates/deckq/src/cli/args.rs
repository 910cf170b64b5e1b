//! Clap argument definitions for the `deckq` CLI.

use std::{env, process::exit};

use clap::{Args, CommandFactory, Parser, Subcommand, error::ErrorKind};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "deckq")]
#[command(about = "Card-search query compiler - parse, compile and explain search queries")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared flag selecting the game.
#[derive(Args, Debug, Clone, Default)]
pub struct GameArgs {
    /// Game: magic, hearthstone, yugioh, lorcana, ptcg [default: from config]
    #[arg(short = 'g', long)]
    pub game: Option<String>,
}

/// Shared output mode flags.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for commands that take a single query.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Search query
    pub query: String,
}

/// Arguments for `deckq tokens`.
#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    #[command(flatten)]
    /// The query.
    pub query: QueryArgs,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `deckq parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    #[command(flatten)]
    /// The query.
    pub query: QueryArgs,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `deckq filter`.
#[derive(Args, Debug, Clone)]
pub struct FilterCommand {
    #[command(flatten)]
    /// The query.
    pub query: QueryArgs,

    #[command(flatten)]
    /// Game selection.
    pub game: GameArgs,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `deckq explain`.
#[derive(Args, Debug, Clone)]
pub struct ExplainCommand {
    #[command(flatten)]
    /// The query.
    pub query: QueryArgs,

    #[command(flatten)]
    /// Game selection.
    pub game: GameArgs,

    /// Locale for the explanation [default: from config]
    #[arg(short = 'l', long)]
    pub locale: Option<String>,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `deckq commands`.
#[derive(Args, Debug, Clone)]
pub struct CommandsCommand {
    #[command(flatten)]
    /// Game selection.
    pub game: GameArgs,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `deckq init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.deckq.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `deckq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the tokens of a query
    Tokens(TokensCommand),

    /// Show the syntax tree of a query
    Parse(ParseCommand),

    /// Compile a query into a filter document
    #[command(after_help = "\
QUERY SYNTAX:
  goblin            Bare word, matched against the game's default field
  \"lightning bolt\"  Quoted string
  /^gob/i           Regular expression
  t:goblin          Command with operator (: = != !: > >= < <=)
  a & b             Both must match
  a | b             Either may match
  -a, !a            Negation
  (a | b) & c       Grouping; mix & and | only through parentheses
  a/b               Alternatives, or a literal shape such as 2/3 power/toughness
  #tag              Tag

EXAMPLES:
  deckq filter 'goblin & c<=2'
  deckq filter -g hearthstone 'class:mage & cost>=5'
  deckq filter -g ptcg 'pikachu/raichu'
  deckq filter 't:elf & order:cost-'")]
    Filter(FilterCommand),

    /// Explain a query in plain language
    Explain(ExplainCommand),

    /// List the commands a game understands
    Commands(CommandsCommand),

    /// Show effective configuration settings
    Config,

    /// Validate configuration and diagnose issues
    Check,

    /// Initialize deckq configuration in current directory
    Init(InitCommand),
}

/// Parses CLI arguments, printing compact help for top-level `--help`.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp {
                let args: Vec<_> = env::args().collect();
                if args.len() <= 2 {
                    print_command_help();
                    exit(0);
                }
            }
            e.exit();
        }
    }
}

/// Prints custom help listing each subcommand on one line.
fn print_command_help() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: deckq <COMMAND>");
    println!();
    println!("Commands:");

    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }
        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:10} {about}");
    }

    println!(
        "  {:<10} Print this message or the help of the given subcommand(s)",
        "help"
    );
    println!();
    println!("Options:");
    println!("  -h, --help  Print help");
    println!();
    println!("Set DECKQ_LOG=debug to trace parsing and translation.");
}
