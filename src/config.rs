//! Editor tunables, loaded from a JSON document supplied by the host page.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_DOUBLE_CLICK_MS, DEFAULT_DOUBLE_CLICK_RADIUS_PX, DEFAULT_FONT, DEFAULT_LANG, DEFAULT_MIN_BOX_SIZE,
    DEFAULT_ROTATE_STEP_DEG, DEFAULT_TOUCH_DEBOUNCE_MS, DEFAULT_ZOOM_FACTOR, HANDLE_RADIUS_PX,
};
use crate::error::ConfigError;

/// Tuning knobs for gestures and text entry. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Relative zoom per wheel notch.
    pub zoom_factor: f64,
    /// Degrees rotated per shift+wheel notch.
    pub rotate_step_deg: f64,
    /// Window after a two-finger gesture during which new gestures are ignored, in milliseconds.
    pub touch_debounce_ms: f64,
    /// Maximum delay between the two presses of a double-click, in milliseconds.
    pub double_click_ms: f64,
    /// Maximum client-space distance between the two presses of a double-click.
    pub double_click_radius_px: f64,
    /// Drawn text boxes must exceed this in both dimensions.
    pub min_box_size: f64,
    /// Screen radius of scale and path handles.
    pub handle_radius_px: f64,
    /// CSS font shorthand for new spans.
    pub font: String,
    /// Language tag for new spans.
    pub lang: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            rotate_step_deg: DEFAULT_ROTATE_STEP_DEG,
            touch_debounce_ms: DEFAULT_TOUCH_DEBOUNCE_MS,
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            double_click_radius_px: DEFAULT_DOUBLE_CLICK_RADIUS_PX,
            min_box_size: DEFAULT_MIN_BOX_SIZE,
            handle_radius_px: HANDLE_RADIUS_PX,
            font: DEFAULT_FONT.to_owned(),
            lang: DEFAULT_LANG.to_owned(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON and [`ConfigError::Invalid`]
    /// for out-of-range values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field holds a usable value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("zoom_factor", self.zoom_factor)?;
        finite("rotate_step_deg", self.rotate_step_deg)?;
        non_negative("touch_debounce_ms", self.touch_debounce_ms)?;
        non_negative("double_click_ms", self.double_click_ms)?;
        non_negative("double_click_radius_px", self.double_click_radius_px)?;
        non_negative("min_box_size", self.min_box_size)?;
        positive("handle_radius_px", self.handle_radius_px)?;
        if self.font.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "font", reason: "must not be empty".into() });
        }
        if self.lang.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "lang", reason: "must not be empty".into() });
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("{value} is not finite") })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("{value} must be greater than zero") })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("{value} must not be negative") })
    }
}
