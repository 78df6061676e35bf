//! Reading the OS color scheme from platform tools.

use std::sync::Arc;

use async_trait::async_trait;
use plume_model::ColorScheme;
use tokio::process::Command;
use tracing::debug;

#[async_trait]
pub trait SystemSchemeDetector: Send + Sync {
    /// `None` when the platform gives no answer.
    async fn detect(&self) -> Option<ColorScheme>;
}

/// macOS: `AppleInterfaceStyle` is only set while dark mode is on.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacosDefaultsDetector;

#[async_trait]
impl SystemSchemeDetector for MacosDefaultsDetector {
    async fn detect(&self) -> Option<ColorScheme> {
        let output = Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .await
            .map_err(|err| debug!("defaults unavailable: {err}"))
            .ok()?;

        // A missing key makes `defaults` exit non-zero: light mode.
        let dark = output.status.success()
            && String::from_utf8_lossy(&output.stdout)
                .trim()
                .eq_ignore_ascii_case("dark");
        Some(if dark {
            ColorScheme::Dark
        } else {
            ColorScheme::Light
        })
    }
}

/// GNOME and desktops that honor `org.gnome.desktop.interface color-scheme`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GnomeColorSchemeDetector;

impl GnomeColorSchemeDetector {
    fn parse(raw: &str) -> Option<ColorScheme> {
        match raw.trim().trim_matches('\'') {
            "prefer-dark" => Some(ColorScheme::Dark),
            "prefer-light" | "default" => Some(ColorScheme::Light),
            _ => None,
        }
    }
}

#[async_trait]
impl SystemSchemeDetector for GnomeColorSchemeDetector {
    async fn detect(&self) -> Option<ColorScheme> {
        let output = Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", "color-scheme"])
            .output()
            .await
            .map_err(|err| debug!("gsettings unavailable: {err}"))
            .ok()?;

        if !output.status.success() {
            return None;
        }
        Self::parse(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Platforms without a known detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDetector;

#[async_trait]
impl SystemSchemeDetector for NoopDetector {
    async fn detect(&self) -> Option<ColorScheme> {
        None
    }
}

pub fn detector_for_current_platform() -> Arc<dyn SystemSchemeDetector> {
    if cfg!(target_os = "macos") {
        Arc::new(MacosDefaultsDetector)
    } else if cfg!(target_os = "linux") {
        Arc::new(GnomeColorSchemeDetector)
    } else {
        Arc::new(NoopDetector)
    }
}
