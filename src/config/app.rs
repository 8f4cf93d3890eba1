// src/config/app.rs
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::consts::{CONFIG_ENV, DEFAULT_CONFIG_PATH, KEY_FILE_ENV};
use crate::enums::KeyEncoding;
use crate::error::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub paths: Paths,
    pub keys: Keys,
    pub logging: Logging,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Paths {
    pub key_file: PathBuf,
    pub envelope_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Keys {
    pub encoding: KeyEncoding,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Logging {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set
    pub level: String,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CoreError::Config(format!("cannot read {}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml_str(&content)
    }

    fn apply_env_overrides(mut self) -> Self {
        if let Some(key_file) = std::env::var_os(KEY_FILE_ENV) {
            self.paths.key_file = PathBuf::from(key_file);
        }
        self
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Process-wide config, resolved once from `$BLACKBOX_CONFIG` or `blackbox.toml`
pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| load_from(&config_path()))
}

/// Config file location: `$BLACKBOX_CONFIG`, else `blackbox.toml`
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Resolve config from `path` without caching, surfacing a broken file
///
/// A missing file is not an error and yields the built-in defaults. Env
/// overrides are applied on success.
pub fn try_load_from(path: &Path) -> Result<Config, CoreError> {
    if !path.exists() {
        debug!("{} not found; using built-in defaults", path.display());
        return Ok(Config::default().apply_env_overrides());
    }
    Ok(Config::from_path(path)?.apply_env_overrides())
}

/// Like [`try_load_from`], but an unreadable or invalid file falls back to
/// built-in defaults with a warning
pub fn load_from(path: &Path) -> Config {
    try_load_from(path).unwrap_or_else(|err| {
        warn!(path = %path.display(), "{err}; using built-in defaults");
        Config::default().apply_env_overrides()
    })
}
