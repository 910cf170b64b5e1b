//! CLI support for the `deckq` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod output;
