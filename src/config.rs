//! Driver configuration.
//!
//! Settings come from [`HeadlessConfig::default`], a JSON document or the process environment.
//! Every field is optional in JSON; missing ones keep their defaults.

use serde::{Deserialize, Serialize};
use waterui_scene::{Size, Theme};

use crate::error::{HeadlessError, Result};

/// Title given to windows created without one.
pub const DEFAULT_TITLE: &str = "WaterUI Application";

/// Environment variable overriding [`HeadlessConfig::scale`].
pub const SCALE_ENV: &str = "WATERUI_SCALE";
/// Environment variable overriding [`HeadlessConfig::debug`].
pub const DEBUG_ENV: &str = "WATERUI_DEBUG_LAYOUT";
/// Environment variable overriding [`HeadlessConfig::dark_theme`], either `dark` or `light`.
pub const THEME_ENV: &str = "WATERUI_THEME";

/// Settings applied to every canvas a driver creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Title used when a window is created with an empty one.
    pub default_title: String,
    /// Initial logical size of new canvases.
    pub canvas_size: Size,
    /// Output scale of new canvases.
    pub scale: f32,
    /// Texture scale of new canvases.
    pub texture_scale: f32,
    /// Whether content is inset by the theme padding.
    pub padded: bool,
    /// Outline every painted node.
    pub debug: bool,
    /// Use the dark theme.
    pub dark_theme: bool,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_owned(),
            canvas_size: Size::square(10.0),
            scale: 1.0,
            texture_scale: 1.0,
            padded: true,
            debug: false,
            dark_theme: false,
        }
    }
}

impl HeadlessConfig {
    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`HeadlessError::Config`] for malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults overridden by the `WATERUI_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`HeadlessError::Env`] when a variable holds an unusable value.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by variable name.
    ///
    /// # Errors
    ///
    /// Returns [`HeadlessError::Env`] when a value cannot be interpreted.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(value) = lookup(SCALE_ENV) {
            self.scale = match value.trim().parse::<f32>() {
                Ok(scale) if scale.is_finite() && scale > 0.0 => scale,
                _ => return Err(env_error(SCALE_ENV, value)),
            };
        }
        if let Some(value) = lookup(DEBUG_ENV) {
            self.debug = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => true,
                "0" | "false" | "off" | "no" | "" => false,
                _ => return Err(env_error(DEBUG_ENV, value)),
            };
        }
        if let Some(value) = lookup(THEME_ENV) {
            self.dark_theme = match value.trim().to_ascii_lowercase().as_str() {
                "dark" => true,
                "light" => false,
                _ => return Err(env_error(THEME_ENV, value)),
            };
        }
        Ok(self)
    }

    /// The theme selected by [`HeadlessConfig::dark_theme`].
    #[must_use]
    pub const fn theme(&self) -> Theme {
        if self.dark_theme {
            Theme::dark()
        } else {
            Theme::light()
        }
    }

    /// `title`, or the default title when it is empty.
    #[must_use]
    pub fn title_or_default(&self, title: &str) -> String {
        if title.is_empty() {
            self.default_title.clone()
        } else {
            title.to_owned()
        }
    }
}

const fn env_error(key: &'static str, value: String) -> HeadlessError {
    HeadlessError::Env { key, value }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = HeadlessConfig::from_json(r#"{ "scale": 2.0, "padded": false }"#).unwrap();
        assert!((config.scale - 2.0).abs() < f32::EPSILON);
        assert!(!config.padded);
        assert_eq!(config.default_title, DEFAULT_TITLE);
        assert_eq!(config.canvas_size, Size::square(10.0));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = HeadlessConfig::from_json("{ scale: }").unwrap_err();
        assert!(matches!(err, HeadlessError::Config(_)));
    }

    #[test]
    fn environment_overrides_apply() {
        let config = HeadlessConfig::default()
            .with_overrides(lookup(&[(SCALE_ENV, "1.5"), (DEBUG_ENV, "true"), (THEME_ENV, "Dark")]))
            .unwrap();
        assert!((config.scale - 1.5).abs() < f32::EPSILON);
        assert!(config.debug);
        assert!(config.dark_theme);
        assert_eq!(config.theme(), Theme::dark());
    }

    #[test]
    fn bad_scale_is_rejected() {
        let err = HeadlessConfig::default()
            .with_overrides(lookup(&[(SCALE_ENV, "-3")]))
            .unwrap_err();
        assert!(matches!(err, HeadlessError::Env { key: SCALE_ENV, .. }));
    }

    #[test]
    fn empty_title_falls_back_to_default() {
        let config = HeadlessConfig::default();
        assert_eq!(config.title_or_default(""), DEFAULT_TITLE);
        assert_eq!(config.title_or_default("Editor"), "Editor");
    }
}
