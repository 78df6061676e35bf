use plume_model::{AppearanceMode, ColorScheme};

/// Effective scheme for `mode`. `Auto` follows the OS and falls back to
/// light when the OS reports nothing.
pub fn resolve(mode: AppearanceMode, os_scheme: Option<ColorScheme>) -> ColorScheme {
    match mode.forced_scheme() {
        Some(scheme) => scheme,
        None => os_scheme.unwrap_or(ColorScheme::Light),
    }
}
