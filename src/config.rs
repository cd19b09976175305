use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Settings file name, looked up in the home directory
pub const SETTINGS_FILE: &str = ".tp.conf";

/// Key naming the directory searched for descriptors
pub const ROOT_KEY: &str = "TP_DIRECTORY";

/// Flat key=value settings read from `~/.tp.conf`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    /// Load settings from the user's home directory.
    ///
    /// A missing file yields empty settings; whether that is fatal depends
    /// on whether another source supplies the root.
    pub fn load() -> Result<Self> {
        let Some(home) = dirs::home_dir() else {
            return Ok(Self::default());
        };
        Self::load_from(&home.join(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                debug!("loaded settings from {}", path.display());
                Ok(Self::parse(&content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(Error::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse `key=value` lines. Blank lines and `#` comments are skipped,
    /// the first `=` splits, and only the value's right side is trimmed.
    pub fn parse(content: &str) -> Self {
        let values = content
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.to_string(), value.trim_end().to_string()))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Resolved runtime configuration, built once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory searched for `.tmux` descriptors
    pub root: PathBuf,
}

impl Config {
    /// Resolve the search root: CLI flag, then `TP_DIRECTORY` in the
    /// environment, then the settings file.
    pub fn resolve(cli_root: Option<PathBuf>, settings: &Settings) -> Result<Self> {
        let root = cli_root
            .or_else(|| {
                std::env::var(ROOT_KEY)
                    .ok()
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
            })
            .or_else(|| settings.get(ROOT_KEY).map(PathBuf::from))
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "{} is not set in ~/{} or the environment",
                    ROOT_KEY, SETTINGS_FILE
                ))
            })?;

        let root = expand_home(&root);
        if !root.is_dir() {
            return Err(Error::Configuration(format!(
                "{} is not a valid directory ({})",
                ROOT_KEY,
                root.display()
            )));
        }

        Ok(Self { root })
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
