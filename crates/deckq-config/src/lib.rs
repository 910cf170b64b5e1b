//! Configuration system for deckq.
//!
//! deckq uses TOML configuration files named `.deckq.toml`. Configuration is resolved by walking
//! up the directory tree from the current working directory, collecting any `.deckq.toml` files
//! found, then loading `~/.deckq.toml` as the global config with lowest precedence.

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    fs,
    path::{Path, PathBuf},
};

use deckq_games::{Game, UnknownGame};
use deckq_search::MessageCatalog;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawExplainSettings, RawOutputSettings, RawSettings, parse_config_file,
    parse_config_str,
};
pub use resolve::resolve_catalog_path;
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Locale whose embedded catalog backs every other locale.
const FALLBACK_LOCALE: &str = "en";

/// Merged configuration for deckq.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Explanation settings.
    pub explain: ExplainSettings,
    /// Output settings.
    pub output: OutputSettings,
    /// Directory containing the closest config file.
    pub config_root: Option<PathBuf>,
    /// Config files that contributed, closest first.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Discovers and merges every `.deckq.toml` that applies to `cwd`.
    ///
    /// Returns the defaults when no file is found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_from_files(&discover_config_files(cwd))
    }

    /// Loads and merges the given files, closest first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// The configured game.
    pub fn game(&self) -> Result<Game, UnknownGame> {
        self.settings.game.parse()
    }

    /// Builds the message catalog for `locale`.
    ///
    /// User catalogs come first, in configuration order, and earlier ones win. The embedded
    /// catalog for the locale fills the gaps, then the English catalog. Missing catalog files
    /// are skipped.
    pub fn catalog(&self, locale: &str) -> Result<MessageCatalog, ConfigError> {
        let mut catalog = MessageCatalog::new(locale);
        for source in &self.explain.catalogs {
            if !source.path.is_file() {
                warn!(path = %source.path.display(), "skipping missing catalog");
                continue;
            }
            let text = fs::read_to_string(&source.path).map_err(|source_err| {
                ConfigError::ReadFile {
                    path: source.path.clone(),
                    source: source_err,
                }
            })?;
            let user = MessageCatalog::from_toml(locale, &text).map_err(|err| {
                ConfigError::Catalog {
                    path: source.path.clone(),
                    source: err,
                }
            })?;
            debug!(path = %source.path.display(), messages = user.len(), "loaded catalog");
            catalog.fill_from(&user);
        }

        for embedded_locale in [locale, FALLBACK_LOCALE] {
            let embedded = deckq_games::catalog(embedded_locale).map_err(|source| {
                ConfigError::EmbeddedCatalog {
                    locale: embedded_locale.to_string(),
                    source,
                }
            })?;
            if let Some(embedded) = embedded {
                catalog.fill_from(&embedded);
            }
        }
        Ok(catalog)
    }

    /// Renders the effective settings in `.deckq.toml` form.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let view = SettingsView {
            settings: &self.settings,
            explain: ExplainView {
                catalogs: self
                    .explain
                    .catalogs
                    .iter()
                    .map(|c| c.path.display().to_string())
                    .collect(),
            },
            output: &self.output,
        };
        Ok(toml::to_string_pretty(&view)?)
    }
}

/// `[settings]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Game whose commands are used.
    pub game: String,
    /// Locale for explanations.
    pub locale: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game: Game::Magic.name().to_string(),
            locale: FALLBACK_LOCALE.to_string(),
        }
    }
}

/// `[explain]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplainSettings {
    /// User catalogs, highest precedence first.
    pub catalogs: Vec<CatalogSource>,
}

/// A user message catalog named in a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    /// Resolved path.
    pub path: PathBuf,
    /// Whether it came from `~/.deckq.toml`.
    pub is_global: bool,
}

/// `[output]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Print JSON instead of text.
    pub json: bool,
    /// Colour terminal output.
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            json: false,
            color: true,
        }
    }
}

/// Serialization view of the effective settings.
#[derive(Serialize)]
struct SettingsView<'a> {
    /// `[settings]`
    settings: &'a Settings,
    /// `[explain]`
    explain: ExplainView,
    /// `[output]`
    output: &'a OutputSettings,
}

/// `[explain]` with catalog paths as strings.
#[derive(Serialize)]
struct ExplainView {
    /// Resolved catalog paths.
    catalogs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use deckq_search::Catalog;

    use super::*;
    use crate::test_support::TestDir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.settings.game, "magic");
        assert_eq!(config.settings.locale, "en");
        assert!(!config.output.json);
        assert!(config.output.color);
        assert_eq!(config.game(), Ok(Game::Magic));
    }

    #[test]
    fn settings_to_toml_round_trips_through_the_parser() {
        let toml = Config::default().settings_to_toml().unwrap();
        assert!(toml.contains("[settings]"));
        assert!(toml.contains("game = \"magic\""));
        assert!(toml.contains("[output]"));
        let parsed = parse_config_str(&toml, Path::new("effective.toml")).unwrap();
        assert_eq!(parsed.settings.unwrap().locale.as_deref(), Some("en"));
    }

    #[test]
    fn user_catalogs_override_embedded_messages() {
        let dir = TestDir::new();
        let first = dir.create_file_with_content("a.toml", "[logic]\nand = \" AND \"\n");
        let second = dir.create_file_with_content(
            "b.toml",
            "[logic]\nand = \" und \"\nor = \" oder \"\n",
        );
        let config = Config {
            explain: ExplainSettings {
                catalogs: vec![
                    CatalogSource {
                        path: first,
                        is_global: false,
                    },
                    CatalogSource {
                        path: dir.path().join("missing.toml"),
                        is_global: false,
                    },
                    CatalogSource {
                        path: second,
                        is_global: true,
                    },
                ],
            },
            ..Default::default()
        };

        let catalog = config.catalog("de").unwrap();
        assert_eq!(catalog.locale(), "de");
        assert_eq!(catalog.message("logic.and"), Some(" AND "));
        assert_eq!(catalog.message("logic.or"), Some(" oder "));
        assert_eq!(catalog.message("logic.group"), Some("({inner})"));
    }

    #[test]
    fn invalid_user_catalog_is_an_error() {
        let dir = TestDir::new();
        let bad = dir.create_file_with_content("bad.toml", "[logic]\nand = [1]\n");
        let config = Config {
            explain: ExplainSettings {
                catalogs: vec![CatalogSource {
                    path: bad,
                    is_global: false,
                }],
            },
            ..Default::default()
        };
        assert!(matches!(
            config.catalog("en"),
            Err(ConfigError::Catalog { .. })
        ));
    }
}
