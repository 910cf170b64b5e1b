//! Configuration merging.
//!
//! Folds parsed files, closest first, into one [`Config`].

use std::path::{Path, PathBuf};

use crate::{
    CatalogSource, Config, ConfigError, ExplainSettings, OutputSettings, Settings,
    discovery::is_global_config,
    parse::{RawConfig, RawOutputSettings, RawSettings},
    resolve::resolve_catalog_path,
};

/// A parsed config file with its source path.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory the file lives in; relative catalog paths resolve against it.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Merges configuration files given closest first.
///
/// Scalars take the closest defined value. Catalog lists are concatenated closest first, so a
/// nearer catalog is consulted before a farther one; duplicate paths are dropped.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    let Some(closest) = configs.first() else {
        return Ok(Config::default());
    };

    let mut settings = Settings::default();
    let mut output = OutputSettings::default();
    for parsed in configs.iter().rev() {
        if let Some(raw) = &parsed.config.settings {
            apply_settings(&mut settings, raw);
        }
        if let Some(raw) = &parsed.config.output {
            apply_output(&mut output, raw);
        }
    }

    Ok(Config {
        settings,
        explain: merge_explain(configs)?,
        output,
        config_root: Some(closest.dir().to_path_buf()),
        sources: configs.iter().map(|c| c.path.clone()).collect(),
    })
}

/// Overwrites settings with the values present in `raw`.
fn apply_settings(result: &mut Settings, raw: &RawSettings) {
    if let Some(game) = &raw.game {
        result.game.clone_from(game);
    }
    if let Some(locale) = &raw.locale {
        result.locale.clone_from(locale);
    }
}

/// Overwrites output settings with the values present in `raw`.
fn apply_output(result: &mut OutputSettings, raw: &RawOutputSettings) {
    if let Some(json) = raw.json {
        result.json = json;
    }
    if let Some(color) = raw.color {
        result.color = color;
    }
}

/// Collects catalog entries from every file, closest first.
fn merge_explain(configs: &[ParsedConfig]) -> Result<ExplainSettings, ConfigError> {
    let mut catalogs: Vec<CatalogSource> = Vec::new();
    for parsed in configs {
        let Some(paths) = parsed
            .config
            .explain
            .as_ref()
            .and_then(|e| e.catalogs.as_ref())
        else {
            continue;
        };
        let is_global = is_global_config(&parsed.path);
        for path in paths {
            let path = resolve_catalog_path(path, parsed.dir())?;
            if catalogs.iter().any(|c| c.path == path) {
                continue;
            }
            catalogs.push(CatalogSource { path, is_global });
        }
    }
    Ok(ExplainSettings { catalogs })
}
