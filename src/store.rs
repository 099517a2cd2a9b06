//! Annotation model: transcription spans and the in-memory store that owns them.
//!
//! A [`Span`] is one transcribed text run laid along a baseline [`Path`]. Its
//! path lives in the span's local space; `transform` maps local space into view
//! space. The store is the single source of truth: the render step reads it,
//! the controllers mutate it, and nothing else holds span state.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EditorError;
use crate::geom::{Affine, Rect};
use crate::path::Path;

/// Unique identifier for a span.
pub type SpanId = Uuid;

/// Inline text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// Which font baseline the path is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    Alphabetic,
    Hanging,
}

impl Baseline {
    /// SVG `dominant-baseline` keyword.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alphabetic => "alphabetic",
            Self::Hanging => "hanging",
        }
    }
}

/// Layout rules implied by a language tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Script {
    pub direction: Direction,
    pub baseline: Baseline,
}

impl Script {
    /// Hebrew (`he`, `he-*`, `hbo`) is right-to-left on a hanging baseline;
    /// everything else is left-to-right on the alphabetic baseline.
    #[must_use]
    pub fn for_lang(lang: &str) -> Self {
        let primary = lang.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
        if primary == "he" || primary == "hbo" || primary == "iw" {
            Self { direction: Direction::Rtl, baseline: Baseline::Hanging }
        } else {
            Self { direction: Direction::Ltr, baseline: Baseline::Alphabetic }
        }
    }
}

/// One transcribed text run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub id: SpanId,
    /// Local → view placement.
    pub transform: Affine,
    /// Baseline the text follows, in local space.
    pub path: Path,
    pub text: String,
    /// BCP 47 language tag.
    pub lang: String,
    /// CSS font shorthand the text was measured with.
    pub font: String,
    /// Extent of the text above the baseline path, in local units.
    pub ascent: f64,
    /// Extent of the text below the baseline path, in local units.
    pub descent: f64,
    /// Rendered text is stretched or squeezed to exactly this length along the path.
    pub text_length: f64,
    /// The path is still the generated two-point line (never hand-edited).
    pub default_path: bool,
    /// Mirrors membership in the selection set.
    #[serde(default, skip_serializing)]
    pub selected: bool,
    /// Stacking order; lower values are drawn beneath higher values.
    #[serde(default)]
    pub z: i64,
}

impl Span {
    /// Layout rules for this span's language.
    #[must_use]
    pub fn script(&self) -> Script {
        Script::for_lang(&self.lang)
    }

    /// Path bounds widened by the text's ascent and descent, in local space.
    #[must_use]
    pub fn local_bounds(&self) -> Option<Rect> {
        let b = self.path.bounds()?;
        Some(Rect::new(b.x, b.y - self.ascent, b.width, b.height + self.ascent + self.descent))
    }

    /// Axis-aligned bounds in view space.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.local_bounds().map(|r| r.transformed(&self.transform))
    }

    /// Re-derive `text_length` from the current path.
    pub fn sync_text_length(&mut self) {
        self.text_length = self.path.length();
    }
}

/// In-memory store of every span in the session.
#[derive(Debug, Clone, Default)]
pub struct SpanStore {
    spans: HashMap<SpanId, Span>,
    next_z: i64,
}

impl SpanStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a span on top of every existing span. Replaces any span with the same id.
    pub fn insert(&mut self, mut span: Span) {
        span.z = self.next_z;
        self.next_z += 1;
        self.spans.insert(span.id, span);
    }

    /// Remove a span by id, returning it if it was present.
    pub fn remove(&mut self, id: &SpanId) -> Option<Span> {
        self.spans.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &SpanId) -> Option<&Span> {
        self.spans.get(id)
    }

    pub fn get_mut(&mut self, id: &SpanId) -> Option<&mut Span> {
        self.spans.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &SpanId) -> bool {
        self.spans.contains_key(id)
    }

    /// Replace all spans with a snapshot. Selection flags are cleared.
    pub fn load_snapshot(&mut self, spans: Vec<Span>) {
        self.spans.clear();
        self.next_z = 0;
        for mut span in spans {
            span.selected = false;
            self.next_z = self.next_z.max(span.z + 1);
            self.spans.insert(span.id, span);
        }
    }

    /// Return all spans sorted by `(z, id)` for draw order.
    #[must_use]
    pub fn sorted_spans(&self) -> Vec<&Span> {
        let mut spans: Vec<&Span> = self.spans.values().collect();
        spans.sort_by(|a, b| a.z.cmp(&b.z).then_with(|| a.id.cmp(&b.id)));
        spans
    }

    /// Serialize every span, in draw order, as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Snapshot`] if serialization fails.
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(&self.sorted_spans())?)
    }

    /// Decode a JSON array produced by [`SpanStore::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Snapshot`] if the document is not a valid span list.
    pub fn parse_snapshot(json: &str) -> Result<Vec<Span>, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of spans currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if the store contains no spans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}
