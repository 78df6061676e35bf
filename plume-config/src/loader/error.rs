use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("server_url is empty")]
    MissingServerUrl,
    #[error("invalid server URL '{url}'")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported server URL scheme '{scheme}'")]
    UnsupportedScheme { scheme: String },
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
    #[error("toast_capacity must be greater than zero")]
    ZeroToastCapacity,
    #[error("failed to read config file {path}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: toml error: {toml}; json error: {json}")]
    Parse {
        path: PathBuf,
        toml: String,
        json: String,
    },
    #[error("invalid inline config json")]
    InlineJson(#[source] serde_json::Error),
    #[error("invalid value '{value}' for {key}")]
    InvalidEnvValue { key: &'static str, value: String },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
