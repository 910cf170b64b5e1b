//! Configuration file parsing.
//!
//! Each `.deckq.toml` is parsed into a [`RawConfig`] whose fields are all optional, so partial
//! files can be merged later.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::ConfigError;

/// A configuration file as written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, discovery stops at this file.
    pub root: Option<bool>,
    /// `[settings]`
    pub settings: Option<RawSettings>,
    /// `[explain]`
    pub explain: Option<RawExplainSettings>,
    /// `[output]`
    pub output: Option<RawOutputSettings>,
}

/// Raw `[settings]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Game name.
    pub game: Option<String>,
    /// Explanation locale.
    pub locale: Option<String>,
}

/// Raw `[explain]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExplainSettings {
    /// Catalog paths; a single string or a list.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub catalogs: Option<Vec<String>>,
}

/// Raw `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOutputSettings {
    /// Emit JSON.
    pub json: Option<bool>,
    /// Use colours.
    pub color: Option<bool>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_str(&contents, path)
}

/// Parses configuration text; `path` is only used in errors.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Whether the file sets `root = true`. Unreadable or invalid files are not roots.
pub fn is_root_config(path: &Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .and_then(|contents| toml::from_str::<RawConfig>(&contents).ok())
        .is_some_and(|config| config.root == Some(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> RawConfig {
        parse_config_str(toml, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn empty_file_has_no_sections() {
        let config = parse("");
        assert!(config.root.is_none());
        assert!(config.settings.is_none());
        assert!(config.explain.is_none());
        assert!(config.output.is_none());
    }

    #[test]
    fn all_sections() {
        let config = parse(
            r#"
root = true

[settings]
game = "lorcana"
locale = "de"

[explain]
catalogs = ["a.toml", "b.toml"]

[output]
json = true
color = false
"#,
        );
        assert_eq!(config.root, Some(true));
        let settings = config.settings.unwrap();
        assert_eq!(settings.game.as_deref(), Some("lorcana"));
        assert_eq!(settings.locale.as_deref(), Some("de"));
        assert_eq!(
            config.explain.unwrap().catalogs,
            Some(vec!["a.toml".to_string(), "b.toml".to_string()])
        );
        let output = config.output.unwrap();
        assert_eq!(output.json, Some(true));
        assert_eq!(output.color, Some(false));
    }

    #[test]
    fn single_catalog_string() {
        let config = parse("[explain]\ncatalogs = \"messages.toml\"\n");
        assert_eq!(
            config.explain.unwrap().catalogs,
            Some(vec!["messages.toml".to_string()])
        );
    }

    #[test]
    fn partial_sections_leave_fields_unset() {
        let config = parse("[settings]\ngame = \"ptcg\"\n");
        assert!(config.settings.unwrap().locale.is_none());
    }

    #[test]
    fn type_errors_name_the_file() {
        let err =
            parse_config_str("[output]\njson = \"yes\"\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ParseToml { ref path, .. } if path == Path::new("bad.toml")
        ));
    }

    #[test]
    fn root_detection() {
        let dir = crate::test_support::TestDir::new();
        let root = dir.create_root_config("a");
        let plain = dir.create_config("b");
        let broken = dir.create_config_with_content("c", "root = [");
        assert!(is_root_config(&root));
        assert!(!is_root_config(&plain));
        assert!(!is_root_config(&broken));
    }
}
