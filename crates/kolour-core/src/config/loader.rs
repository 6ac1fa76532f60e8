use std::path::{Path, PathBuf};

use log::warn;
use serde::de::DeserializeOwned;

use super::keybinding;
use super::{Config, Keybinding, KeybindingsFile};

/// Errors raised while reading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// Returns true if the error means the file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Returns the config directory: `~/.config/kolour/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("kolour"))
}

/// Returns the config file path: `~/.config/kolour/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Returns the keybindings file path: `~/.config/kolour/keybindings.toml`.
pub fn keybindings_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("keybindings.toml"))
}

/// Tries to load and parse `config.toml`, clamping values afterwards.
pub fn try_load() -> Result<Config, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    let mut config: Config = read_toml(&path)?;
    config.validate();
    Ok(config)
}

/// Loads the configuration from disk, falling back to defaults.
///
/// After loading, values are clamped to safe ranges via [`Config::validate`].
/// Non-existent files silently return defaults; other errors are logged.
pub fn load() -> Config {
    load_or_default(try_load, Config::default)
}

/// Loads the configuration like [`load`] but hands back the error instead
/// of logging it, for callers that install the logger from this config.
///
/// A missing file is not reported.
pub fn load_unlogged() -> (Config, Option<ConfigError>) {
    or_default(try_load(), Config::default)
}

/// Tries to load and parse `keybindings.toml`.
pub fn try_load_keybindings() -> Result<Vec<Keybinding>, ConfigError> {
    let path = keybindings_path().ok_or(ConfigError::NoConfigDir)?;
    let file: KeybindingsFile = read_toml(&path)?;
    Ok(file.keybinding)
}

/// Loads keybindings from `~/.config/kolour/keybindings.toml`.
///
/// Falls back to the built-in defaults if the file is missing or invalid.
pub fn load_keybindings() -> Vec<Keybinding> {
    load_or_default(try_load_keybindings, keybinding::defaults)
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a config value from disk, falling back to defaults.
///
/// Non-existent files silently return defaults; other errors are logged.
fn load_or_default<T>(
    try_load: impl FnOnce() -> Result<T, ConfigError>,
    default: impl Fn() -> T,
) -> T {
    let (val, err) = or_default(try_load(), default);
    if let Some(e) = err {
        warn!("{e}; using defaults");
    }
    val
}

/// Splits a load result into a usable value and the error worth reporting.
pub(super) fn or_default<T>(
    result: Result<T, ConfigError>,
    default: impl Fn() -> T,
) -> (T, Option<ConfigError>) {
    match result {
        Ok(val) => (val, None),
        Err(e) if e.is_not_found() => (default(), None),
        Err(e) => (default(), Some(e)),
    }
}
