//! Error types for deckq configuration.

use std::{io, path::PathBuf};

use deckq_search::CatalogError;
use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration or catalog file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A user message catalog is not a valid catalog.
    #[error("invalid message catalog {path}: {source}")]
    Catalog {
        /// Path to the catalog.
        path: PathBuf,
        /// Underlying catalog error.
        source: CatalogError,
    },

    /// The catalog shipped with deckq failed to load.
    #[error("embedded '{locale}' catalog is invalid: {source}")]
    EmbeddedCatalog {
        /// Locale of the catalog.
        locale: String,
        /// Underlying catalog error.
        source: CatalogError,
    },

    /// Failed to render settings as TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ser::Error),

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}
