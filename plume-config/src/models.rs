use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::loader::error::ConfigLoadError;

/// Client core settings. Every field has a default, so a config file only
/// needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the preferences service, without the `/api/v1` prefix.
    pub server_url: String,
    /// Upper bound for a single preferences request.
    pub request_timeout_ms: u64,
    /// Whether this platform may toggle adult content from the client.
    /// Some store builds must route that toggle through the web instead.
    pub platform_allows_adult_content_toggle: bool,
    /// How often the polling appearance source re-reads the OS scheme.
    pub appearance_poll_interval_ms: u64,
    /// How long a toast stays visible.
    pub toast_ttl_ms: u64,
    /// Maximum number of toasts kept at once; the oldest is dropped first.
    pub toast_capacity: usize,
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            request_timeout_ms: 30_000,
            platform_allows_adult_content_toggle: true,
            appearance_poll_interval_ms: 2_000,
            toast_ttl_ms: 4_000,
            toast_capacity: 5,
            log_filter: "info,plume_client=debug".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn appearance_poll_interval(&self) -> Duration {
        Duration::from_millis(self.appearance_poll_interval_ms)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }

    /// Reject settings the client cannot run with.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let trimmed = self.server_url.trim();
        if trimmed.is_empty() {
            return Err(ConfigLoadError::MissingServerUrl);
        }
        let parsed = Url::parse(trimmed).map_err(|source| {
            ConfigLoadError::InvalidServerUrl {
                url: trimmed.to_string(),
                source,
            }
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigLoadError::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigLoadError::ZeroDuration {
                field: "request_timeout_ms",
            });
        }
        if self.appearance_poll_interval_ms == 0 {
            return Err(ConfigLoadError::ZeroDuration {
                field: "appearance_poll_interval_ms",
            });
        }
        if self.toast_capacity == 0 {
            return Err(ConfigLoadError::ZeroToastCapacity);
        }
        Ok(())
    }

    /// Server URL with any trailing slash removed.
    pub fn normalized_server_url(&self) -> String {
        self.server_url.trim().trim_end_matches('/').to_string()
    }
}
