//! Runtime settings: where data lives, which origin serves the web assets, and
//! the language alias table used by the facet filter.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;
use tracing::info;

use crate::search::LanguageAliases;
use crate::store::DB_FILE_NAME;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".hymnal-viewer";
/// Optional alias table inside the data directory.
pub const LANGUAGES_FILE_NAME: &str = "languages.toml";
/// Log file written while the TUI owns the terminal.
pub const LOG_FILE_NAME: &str = "hymnal-viewer.log";
/// Origin serving the installable web app's assets.
pub const DEFAULT_ORIGIN: &str = "https://hymnconnectapp.firebaseapp.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate home directory")]
    NoHomeDirectory,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub origin: String,
}

impl Config {
    /// Build the settings, falling back to `~/.hymnal-viewer` and the default
    /// origin when nothing was given.
    pub fn resolve(data_dir: Option<PathBuf>, origin: Option<String>) -> Result<Self, ConfigError> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        Ok(Self {
            data_dir,
            origin: origin.unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn flags_dir(&self) -> PathBuf {
        self.data_dir.join("flags")
    }

    pub fn languages_path(&self) -> PathBuf {
        self.data_dir.join(LANGUAGES_FILE_NAME)
    }
}

/// Resolve the default data directory inside the user's home.
fn default_data_dir() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Load the language alias table, using the built-in English/Hindi/Marathi
/// aliases when the file does not exist.
///
/// ```toml
/// [[language]]
/// name = "English"
/// contains = ["english"]
/// codes = ["en", "eng"]
/// ```
pub fn load_language_aliases(path: &Path) -> Result<LanguageAliases, ConfigError> {
    if !path.exists() {
        return Ok(LanguageAliases::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let aliases: LanguageAliases = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), languages = aliases.languages.len(), "loaded language aliases");
    Ok(aliases)
}
