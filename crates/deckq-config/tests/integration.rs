//! Integration tests for deckq-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> resolve -> merge.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use deckq_config::{Config, ConfigError};
use deckq_games::Game;
use deckq_search::Catalog;

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory and returns its path.
    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Creates a file with content and returns its path.
    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_load_no_files_returns_default() {
    let config = Config::load_from_files(&[]).unwrap();

    assert!(config.config_root.is_none());
    assert!(config.sources.is_empty());
    assert_eq!(config.game().unwrap(), Game::Magic);
    assert_eq!(config.settings.locale, "en");
    assert!(config.explain.catalogs.is_empty());
}

#[test]
fn test_load_single_root_config() {
    let env = TestEnv::new();
    env.create_file(
        ".deckq.toml",
        r#"
root = true

[settings]
game = "ptcg"

[output]
json = true
"#,
    );

    let config = Config::load(env.path()).unwrap();

    assert_eq!(config.game().unwrap(), Game::Ptcg);
    assert!(config.output.json);
    assert_eq!(config.sources.len(), 1);
    assert_eq!(config.config_root.as_deref(), Some(env.path()));
}

#[test]
fn test_load_nested_configs_merging() {
    let env = TestEnv::new();
    let subdir = env.create_dir("project/subdir");

    env.create_file(
        ".deckq.toml",
        r#"
root = true

[settings]
game = "yugioh"
locale = "en-GB"

[output]
color = false
"#,
    );
    env.create_file(
        "project/.deckq.toml",
        r#"
[settings]
game = "lorcana"
"#,
    );

    let config = Config::load(&subdir).unwrap();

    assert_eq!(config.sources.len(), 2);
    assert_eq!(config.game().unwrap(), Game::Lorcana);
    assert_eq!(config.settings.locale, "en-GB");
    assert!(!config.output.color);
    assert_eq!(config.config_root, Some(env.path().join("project")));
}

#[test]
fn test_root_config_stops_discovery() {
    let env = TestEnv::new();
    let inner = env.create_dir("outer/inner");

    env.create_file(".deckq.toml", "[settings]\ngame = \"hearthstone\"\n");
    env.create_file("outer/.deckq.toml", "root = true\n");

    let config = Config::load(&inner).unwrap();

    assert_eq!(config.sources, vec![env.path().join("outer/.deckq.toml")]);
    assert_eq!(config.settings.game, "magic");
}

#[test]
fn test_relative_catalogs_resolve_against_their_config() {
    let env = TestEnv::new();
    let project = env.create_dir("project");
    let catalog = env.create_file(
        "project/messages/short.toml",
        "[logic]\nand = \" & \"\n",
    );
    env.create_file(
        "project/.deckq.toml",
        r#"
root = true

[explain]
catalogs = "messages/short.toml"
"#,
    );

    let config = Config::load(&project).unwrap();

    assert_eq!(config.explain.catalogs.len(), 1);
    assert_eq!(config.explain.catalogs[0].path, catalog);
    assert!(config.validate().is_empty());

    let messages = config.catalog(&config.settings.locale).unwrap();
    assert_eq!(messages.message("logic.and"), Some(" & "));
    assert_eq!(messages.message("logic.or"), Some(" or "));
}

#[test]
fn test_missing_catalog_is_a_warning_not_an_error() {
    let env = TestEnv::new();
    env.create_file(
        ".deckq.toml",
        "root = true\n[explain]\ncatalogs = [\"gone.toml\"]\n",
    );

    let config = Config::load(env.path()).unwrap();

    assert_eq!(config.validate().len(), 1);
    let messages = config.catalog("en").unwrap();
    assert_eq!(messages.message("logic.and"), Some(" and "));
}

#[test]
fn test_parse_error_names_the_file() {
    let env = TestEnv::new();
    let path = env.create_file(".deckq.toml", "root = true\n[settings\n");

    let err = Config::load(env.path()).unwrap_err();

    match err {
        ConfigError::ParseToml { path: bad, .. } => assert_eq!(bad, path),
        other => panic!("expected ParseToml, got {other:?}"),
    }
}

#[test]
fn test_settings_to_toml_reflects_merged_values() {
    let env = TestEnv::new();
    env.create_file(
        ".deckq.toml",
        "root = true\n[settings]\ngame = \"hearthstone\"\n",
    );

    let config = Config::load(env.path()).unwrap();
    let rendered = config.settings_to_toml().unwrap();

    assert!(rendered.contains("game = \"hearthstone\""));
    assert!(rendered.contains("locale = \"en\""));
    assert!(rendered.contains("json = false"));
}
