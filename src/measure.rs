//! Text measurement service.
//!
//! The engine never shapes text itself. It asks a [`TextMeasure`] for a string's
//! advance width and the font's vertical metrics. The browser binding uses a 2D
//! canvas context; tests and headless hosts use [`FixedMeasure`].

#[cfg(test)]
#[path = "measure_test.rs"]
mod measure_test;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::error::EditorError;
use crate::store::Baseline;

/// Metrics for one string in one font, in CSS pixels at the font's nominal size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Horizontal advance of the whole string.
    pub advance: f64,
    /// Font ascent above the alphabetic baseline.
    pub ascent: f64,
    /// Font descent below the alphabetic baseline.
    pub descent: f64,
    /// Height of the hanging baseline above the alphabetic baseline.
    pub hanging: f64,
}

impl TextMetrics {
    /// Natural line height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }

    /// Distance from the top of the line box down to `baseline`.
    #[must_use]
    pub fn baseline_offset(&self, baseline: Baseline) -> f64 {
        match baseline {
            Baseline::Alphabetic => self.ascent,
            Baseline::Hanging => self.ascent - self.hanging,
        }
    }
}

/// Measures strings for layout.
pub trait TextMeasure {
    /// Measure `text` set in the CSS font shorthand `font`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Host`] when the backing measurement API fails.
    fn measure(&self, text: &str, font: &str) -> Result<TextMetrics, EditorError>;
}

/// Deterministic metrics derived from the font's pixel size alone.
///
/// Every character advances half an em; ascent is 0.8 em, descent 0.2 em and
/// the hanging baseline sits 0.6 em above the alphabetic one.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMeasure;

impl FixedMeasure {
    const FALLBACK_PX: f64 = 16.0;

    /// Pixel size named in a CSS font shorthand such as `"italic 32px serif"`.
    #[must_use]
    pub fn font_px(font: &str) -> f64 {
        for token in font.split_whitespace() {
            let size = token.split('/').next().unwrap_or(token);
            let Some(number) = size.strip_suffix("px") else {
                continue;
            };
            if let Ok(px) = number.parse::<f64>() {
                if px.is_finite() && px > 0.0 {
                    return px;
                }
            }
        }
        Self::FALLBACK_PX
    }
}

impl TextMeasure for FixedMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, font: &str) -> Result<TextMetrics, EditorError> {
        let em = Self::font_px(font);
        Ok(TextMetrics { advance: text.chars().count() as f64 * em * 0.5, ascent: em * 0.8, descent: em * 0.2, hanging: em * 0.6 })
    }
}

/// Measures through an off-screen `<canvas>` 2D context.
pub struct CanvasMeasure {
    ctx: CanvasRenderingContext2d,
}

impl CanvasMeasure {
    /// Create an off-screen canvas in `document` and take its 2D context.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Host`] if the canvas or its context cannot be created.
    pub fn new(document: &Document) -> Result<Self, EditorError> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|_| EditorError::Host("create canvas".into()))?
            .dyn_into()
            .map_err(|_| EditorError::Host("canvas element has unexpected type".into()))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|_| EditorError::Host("get 2d context".into()))?
            .ok_or_else(|| EditorError::Host("2d context unavailable".into()))?
            .dyn_into()
            .map_err(|_| EditorError::Host("2d context has unexpected type".into()))?;
        Ok(Self { ctx })
    }
}

impl CanvasMeasure {
    fn measure_text(&self, text: &str) -> Result<web_sys::TextMetrics, EditorError> {
        self.ctx.measure_text(text).map_err(|_| EditorError::Host("measureText".into()))
    }
}

impl TextMeasure for CanvasMeasure {
    fn measure(&self, text: &str, font: &str) -> Result<TextMetrics, EditorError> {
        self.ctx.set_font(font);
        self.ctx.set_text_baseline("alphabetic");
        let m = self.measure_text(text)?;
        let ascent = m.font_bounding_box_ascent();
        let hanging = match hanging_baseline(&m) {
            Some(hanging) => hanging,
            None => {
                self.ctx.set_text_baseline("hanging");
                let hung = self.measure_text(text);
                self.ctx.set_text_baseline("alphabetic");
                hanging_from_ascents(ascent, hung?.font_bounding_box_ascent())
            }
        };
        Ok(TextMetrics { advance: m.width(), ascent, descent: m.font_bounding_box_descent(), hanging })
    }
}

/// `TextMetrics.hangingBaseline`, which web-sys only binds under its unstable APIs.
fn hanging_baseline(m: &web_sys::TextMetrics) -> Option<f64> {
    match js_sys::Reflect::get(m, &JsValue::from_str("hangingBaseline")) {
        Ok(value) => value.as_f64().filter(|h| h.is_finite()).map(f64::abs),
        Err(_) => None,
    }
}

/// Hanging baseline height from the font ascent measured against the
/// alphabetic and then the hanging baseline.
fn hanging_from_ascents(alphabetic_ascent: f64, hanging_ascent: f64) -> f64 {
    (alphabetic_ascent - hanging_ascent).max(0.0)
}

/// Rewrite the pixel size in a CSS font shorthand, keeping any `/line-height`
/// and the rest of the shorthand. A shorthand without a pixel size gets one
/// prepended.
#[must_use]
pub fn with_font_px(font: &str, px: f64) -> String {
    let mut replaced = false;
    let tokens: Vec<String> = font
        .split_whitespace()
        .map(|token| {
            if replaced {
                return token.to_owned();
            }
            let (size, rest) = match token.find('/') {
                Some(at) => token.split_at(at),
                None => (token, ""),
            };
            match size.strip_suffix("px").map(str::parse::<f64>) {
                Some(Ok(_)) => {
                    replaced = true;
                    format!("{px}px{rest}")
                }
                _ => token.to_owned(),
            }
        })
        .collect();
    if replaced { tokens.join(" ") } else { format!("{px}px {font}") }
}
