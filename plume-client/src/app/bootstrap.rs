//! Wiring for the client core.
//!
//! Everything is constructed once here and handed to consumers by
//! reference; nothing is looked up globally.

use std::sync::Arc;

use plume_config::ClientConfig;
use plume_model::AppearanceMode;
use thiserror::Error;
use tracing::info;

use crate::appearance::{
    OsAppearanceSource, PollingAppearanceSource, detector_for_current_platform,
};
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::logging::{ErrorLog, TracingErrorLog};
use crate::infrastructure::notifications::{NotificationSink, ToastManager};
use crate::infrastructure::services::{PreferencesApiAdapter, PreferencesService};
use crate::preferences::{ControllerOptions, PreferenceSyncController};
use crate::theme::ThemeController;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to build HTTP client")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: ClientConfig,
    pub api_client: Arc<ApiClient>,
    pub toasts: Arc<ToastManager>,
    pub preferences: Arc<PreferenceSyncController>,
    pub theme: Arc<ThemeController>,
}

impl AppContext {
    /// Build the production graph: reqwest-backed service, toast queue and
    /// `tracing` error log.
    pub fn bootstrap(
        config: ClientConfig,
        appearance: Arc<dyn OsAppearanceSource>,
    ) -> Result<Self, BootstrapError> {
        let api_client = Arc::new(ApiClient::new(
            config.normalized_server_url(),
            config.request_timeout(),
        )?);
        let service: Arc<dyn PreferencesService> =
            Arc::new(PreferencesApiAdapter::new(Arc::clone(&api_client)));
        let toasts = Arc::new(ToastManager::new(
            config.toast_ttl(),
            config.toast_capacity,
        ));

        let preferences = Arc::new(PreferenceSyncController::new(
            service,
            Arc::clone(&toasts) as Arc<dyn NotificationSink>,
            Arc::new(TracingErrorLog) as Arc<dyn ErrorLog>,
            ControllerOptions::from(&config),
        ));
        let theme = Arc::new(ThemeController::new(appearance, AppearanceMode::Auto));

        info!(
            server_url = %api_client.base_url(),
            adult_toggle = config.platform_allows_adult_content_toggle,
            "client core ready"
        );

        Ok(Self {
            config,
            api_client,
            toasts,
            preferences,
            theme,
        })
    }
}

/// Polling source for this platform. Must be called inside a tokio runtime.
pub fn default_appearance_source(config: &ClientConfig) -> Arc<PollingAppearanceSource> {
    Arc::new(PollingAppearanceSource::spawn(
        detector_for_current_platform(),
        config.appearance_poll_interval(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::ManualAppearanceSource;
    use plume_model::ColorScheme;

    #[tokio::test]
    async fn bootstrap_wires_the_configuration_through() {
        let config = ClientConfig {
            server_url: "https://prefs.example/".into(),
            platform_allows_adult_content_toggle: false,
            ..ClientConfig::default()
        };
        let source = Arc::new(ManualAppearanceSource::new(Some(ColorScheme::Dark)));

        let context = AppContext::bootstrap(config, source).expect("bootstrap");

        assert_eq!(context.api_client.base_url(), "https://prefs.example");
        assert!(!context.preferences.options().platform_allows_adult_content_toggle);
        assert_eq!(context.theme.effective(), ColorScheme::Dark);
        assert!(context.toasts.is_empty());
    }
}
