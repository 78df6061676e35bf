//! Configuration loading.
//!
//! Evaluation order:
//! 1) `$PLUME_CONFIG_PATH` (TOML or JSON file),
//! 2) `$PLUME_CONFIG_JSON` (inline JSON),
//! 3) the first default file found under the base directory,
//! 4) defaults.
//!
//! Environment overrides (`PLUME_SERVER_URL`, `PLUME_ALLOW_ADULT_TOGGLE`) are
//! applied on top of whichever source won, then the result is validated.

pub mod error;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::ClientConfig;
use error::ConfigLoadError;

pub const CONFIG_PATH_VAR: &str = "PLUME_CONFIG_PATH";
pub const CONFIG_JSON_VAR: &str = "PLUME_CONFIG_JSON";
pub const SERVER_URL_VAR: &str = "PLUME_SERVER_URL";
pub const ALLOW_ADULT_TOGGLE_VAR: &str = "PLUME_ALLOW_ADULT_TOGGLE";

const DEFAULT_FILES: &[&str] = &[
    "plume.toml",
    "plume.json",
    "config/plume.toml",
    "config/plume.json",
];

/// Source that produced the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: ClientConfig,
    pub source: ConfigSource,
    pub env_file_loaded: bool,
}

/// Loads [`ClientConfig`] from files and environment variables.
///
/// The environment is captured up front so loading is deterministic and
/// tests never have to touch the process environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    vars: HashMap<String, String>,
    base_dir: Option<PathBuf>,
    env_file_loaded: bool,
}

impl ConfigLoader {
    /// Capture the process environment, loading `.env` first when present.
    pub fn from_process_env() -> Result<Self, ConfigLoadError> {
        let env_file_loaded = match dotenvy::dotenv() {
            Ok(path) => {
                debug!("loaded env file {}", path.display());
                true
            }
            Err(err) if err.not_found() => false,
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            vars: std::env::vars().collect(),
            base_dir: None,
            env_file_loaded,
        })
    }

    /// Loader over an explicit set of variables.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            base_dir: None,
            env_file_loaded: false,
        }
    }

    /// Directory the default config files are searched in. Defaults to the
    /// working directory.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (mut config, source) = self.load_source()?;
        self.apply_overrides(&mut config)?;
        config.validate()?;

        debug!(?source, server_url = %config.server_url, "client config loaded");

        Ok(ConfigLoad {
            config,
            source,
            env_file_loaded: self.env_file_loaded,
        })
    }

    fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    fn load_source(
        &self,
    ) -> Result<(ClientConfig, ConfigSource), ConfigLoadError> {
        if let Some(path) = self.var(CONFIG_PATH_VAR) {
            let path = PathBuf::from(path);
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = self.var(CONFIG_JSON_VAR) {
            let config = serde_json::from_str(raw)
                .map_err(ConfigLoadError::InlineJson)?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((ClientConfig::default(), ConfigSource::Default))
    }

    fn apply_overrides(
        &self,
        config: &mut ClientConfig,
    ) -> Result<(), ConfigLoadError> {
        if let Some(url) = self.var(SERVER_URL_VAR) {
            config.server_url = url.trim().to_string();
        }

        if let Some(raw) = self.var(ALLOW_ADULT_TOGGLE_VAR) {
            config.platform_allows_adult_content_toggle = parse_bool(raw)
                .ok_or_else(|| ConfigLoadError::InvalidEnvValue {
                    key: ALLOW_ADULT_TOGGLE_VAR,
                    value: raw.to_string(),
                })?;
        }

        Ok(())
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        let base = self
            .base_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        DEFAULT_FILES
            .iter()
            .map(|candidate| base.join(candidate))
            .find(|path| path.exists())
    }
}

pub fn load_from_file(path: &Path) -> Result<ClientConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::FileIo {
            path: path.to_path_buf(),
            source,
        })?;

    parse_from_str(&contents, path)
}

/// Parse TOML first, then JSON for convenience.
pub fn parse_from_str(
    contents: &str,
    origin: &Path,
) -> Result<ClientConfig, ConfigLoadError> {
    toml::from_str(contents).or_else(|toml_err| {
        serde_json::from_str(contents).map_err(|json_err| {
            ConfigLoadError::Parse {
                path: origin.to_path_buf(),
                toml: toml_err.to_string(),
                json: json_err.to_string(),
            }
        })
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
