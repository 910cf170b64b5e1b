//! Configuration file discovery.
//!
//! Walks up from a starting directory collecting `.deckq.toml` files, then appends the global
//! `~/.deckq.toml`.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".deckq.toml";

/// Discovers every configuration file that applies to `cwd`.
///
/// Paths are returned closest first, with the global file last. A file with `root = true` ends
/// the walk and suppresses the global file.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let stop = is_root_config(&candidate);
        configs.push(candidate);
        if stop {
            debug!(files = configs.len(), "root config ends discovery");
            return configs;
        }
    }

    if let Some(global) = global_config_path()
        && global.is_file()
        && !configs.contains(&global)
    {
        configs.push(global);
    }
    debug!(files = configs.len(), "discovered config files");
    configs
}

/// The global configuration file (`~/.deckq.toml`), if a home directory is known.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Whether `path` is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
