//! Configuration validation.
//!
//! Checks a loaded configuration against the available games, locales and catalog files and
//! reports non-fatal warnings.

use std::{fmt, fs};

use deckq_games::Game;
use deckq_search::MessageCatalog;

use crate::{CatalogSource, Config};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `settings.game` names no known game.
    UnknownGame {
        /// The configured name.
        game: String,
    },
    /// No embedded catalog exists for the locale and no user catalogs are configured.
    UnknownLocale {
        /// The configured locale.
        locale: String,
    },
    /// A configured catalog file does not exist.
    CatalogMissing {
        /// Resolved path.
        path: String,
    },
    /// A configured catalog file could not be read or parsed.
    CatalogInvalid {
        /// Resolved path.
        path: String,
        /// What went wrong.
        message: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGame { game } => write!(f, "unknown game '{game}'"),
            Self::UnknownLocale { locale } => write!(
                f,
                "no messages for locale '{locale}'; explanations fall back to English"
            ),
            Self::CatalogMissing { path } => write!(f, "catalog file does not exist: {path}"),
            Self::CatalogInvalid { path, message } => {
                write!(f, "catalog file {path} is invalid: {message}")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.settings.game.parse::<Game>().is_err() {
        warnings.push(ConfigWarning::UnknownGame {
            game: config.settings.game.clone(),
        });
    }

    let embedded = deckq_games::catalog(&config.settings.locale)
        .ok()
        .flatten()
        .is_some();
    if !embedded && config.explain.catalogs.is_empty() {
        warnings.push(ConfigWarning::UnknownLocale {
            locale: config.settings.locale.clone(),
        });
    }

    warnings.extend(config.explain.catalogs.iter().filter_map(check_catalog));
    warnings
}

/// Checks that a catalog file exists and parses.
fn check_catalog(source: &CatalogSource) -> Option<ConfigWarning> {
    let path = source.path.display().to_string();
    if !source.path.is_file() {
        return Some(ConfigWarning::CatalogMissing { path });
    }
    let parsed = fs::read_to_string(&source.path)
        .map_err(|e| e.to_string())
        .and_then(|text| MessageCatalog::from_toml("", &text).map_err(|e| e.to_string()));
    parsed
        .err()
        .map(|message| ConfigWarning::CatalogInvalid { path, message })
}
