use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Appearance mode selected by the user in the appearance toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AppearanceMode {
    /// Follow the operating system's color scheme.
    #[default]
    Auto,
    Light,
    Dark,
}

impl AppearanceMode {
    pub const ALL: [AppearanceMode; 3] =
        [AppearanceMode::Auto, AppearanceMode::Dark, AppearanceMode::Light];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppearanceMode::Auto => "auto",
            AppearanceMode::Light => "light",
            AppearanceMode::Dark => "dark",
        }
    }

    /// Fixed scheme forced by this mode, `None` for `Auto`.
    pub fn forced_scheme(&self) -> Option<ColorScheme> {
        match self {
            AppearanceMode::Auto => None,
            AppearanceMode::Light => Some(ColorScheme::Light),
            AppearanceMode::Dark => Some(ColorScheme::Dark),
        }
    }

    pub fn follows_system(&self) -> bool {
        matches!(self, AppearanceMode::Auto)
    }
}

impl fmt::Display for AppearanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppearanceMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "system" => Ok(AppearanceMode::Auto),
            "light" => Ok(AppearanceMode::Light),
            "dark" => Ok(AppearanceMode::Dark),
            _ => Err(ModelError::UnknownAppearanceMode(s.to_string())),
        }
    }
}

/// The color scheme actually rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ColorScheme::Dark)
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ColorScheme::Light),
            "dark" => Ok(ColorScheme::Dark),
            _ => Err(ModelError::UnknownColorScheme(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_scheme_only_for_explicit_modes() {
        assert_eq!(AppearanceMode::Auto.forced_scheme(), None);
        assert_eq!(
            AppearanceMode::Light.forced_scheme(),
            Some(ColorScheme::Light)
        );
        assert_eq!(
            AppearanceMode::Dark.forced_scheme(),
            Some(ColorScheme::Dark)
        );
    }

    #[test]
    fn parses_modes_case_insensitively() {
        assert_eq!("Dark".parse(), Ok(AppearanceMode::Dark));
        assert_eq!(" auto ".parse(), Ok(AppearanceMode::Auto));
        assert_eq!("system".parse(), Ok(AppearanceMode::Auto));
        assert!("dim".parse::<AppearanceMode>().is_err());
    }

    #[test]
    fn color_scheme_defaults_to_light() {
        assert_eq!(ColorScheme::default(), ColorScheme::Light);
        assert!("DARK".parse::<ColorScheme>().unwrap().is_dark());
    }
}
