//! Path resolution for catalog entries.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Resolves a catalog path written in a config file.
///
/// `~` and `~/...` expand to the home directory; relative paths are joined to `config_dir`.
/// The file is not required to exist; a missing catalog is reported by validation.
pub fn resolve_catalog_path(path: &str, config_dir: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(config_dir.join(expanded))
    }
}

/// Expands a leading `~`.
fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None => Ok(PathBuf::from(path)),
    }
}

/// The home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_the_config_dir() {
        let dir = Path::new("/decks/league");
        assert_eq!(
            resolve_catalog_path("./messages.toml", dir).unwrap(),
            PathBuf::from("/decks/league/./messages.toml")
        );
        assert_eq!(
            resolve_catalog_path("../shared/de.toml", dir).unwrap(),
            PathBuf::from("/decks/league/../shared/de.toml")
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        assert_eq!(
            resolve_catalog_path("/etc/deckq/fr.toml", Path::new("/x")).unwrap(),
            PathBuf::from("/etc/deckq/fr.toml")
        );
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = home_dir().unwrap();
        assert_eq!(resolve_catalog_path("~", Path::new("/x")).unwrap(), home);
        assert_eq!(
            resolve_catalog_path("~/cat.toml", Path::new("/x")).unwrap(),
            home.join("cat.toml")
        );
    }

    #[test]
    fn tilde_inside_a_name_is_literal() {
        assert_eq!(
            resolve_catalog_path("~cat.toml", Path::new("/x")).unwrap(),
            PathBuf::from("/x/~cat.toml")
        );
    }
}
