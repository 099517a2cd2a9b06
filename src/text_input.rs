//! Text input controller: the inline overlay used to type a new transcription
//! or re-edit an existing one, the drawing drags that place it, and the
//! double-click detector that reopens it.
//!
//! The overlay lives in its own local space laid out at the font's natural
//! size. Its transform maps that space into view space, so a new span simply
//! inherits it and renders exactly where the overlay was.

#[cfg(test)]
#[path = "text_input_test.rs"]
mod text_input_test;

use crate::consts::SINGULAR_EPSILON;
use crate::error::EditorError;
use crate::geom::{Affine, Point, Rect};
use crate::input::Target;
use crate::measure::TextMeasure;
use crate::path::Path;
use crate::selection::Selection;
use crate::store::{Baseline, Direction, Script, Span, SpanId, SpanStore};

/// Lifecycle of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputState {
    Idle,
    /// Shown and placed, not yet focused.
    Positioning,
    Editing,
}

/// What a commit will write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTarget {
    New,
    Existing(SpanId),
}

/// Placement and contents of the text-entry overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub target: OverlayTarget,
    /// Input box in overlay-local space.
    pub local: Rect,
    /// Overlay-local → view.
    pub transform: Affine,
    pub lang: String,
    pub direction: Direction,
    pub baseline: Baseline,
    pub font: String,
    pub value: String,
    /// Distance from the top of the box down to the baseline, in local units.
    baseline_offset: f64,
}

/// Result of committing the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Nothing to write (no overlay, or an empty new span).
    Nothing,
    Created(SpanId),
    Updated(SpanId),
    Deleted(SpanId),
}

/// What a press-and-drag with a drawing tool lays out.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftKind {
    /// A box the new overlay fills.
    Box,
    /// A baseline the new text runs along.
    Baseline,
    /// A line whose length becomes the session font size.
    Measure { previous_font: String },
}

/// A drawing drag in progress. Both ends are in view space so the drawn
/// shape stays put under any pan, zoom or rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub kind: DraftKind,
    pub start: Point,
    pub current: Point,
}

impl Draft {
    /// Box spanned by the two ends.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.start, self.current)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance(self.current)
    }

    /// Pixel size a measuring line asks for, if it is long enough to mean one.
    #[must_use]
    pub fn measured_px(&self) -> Option<f64> {
        let px = self.length().round();
        (matches!(self.kind, DraftKind::Measure { .. }) && px >= 1.0).then_some(px)
    }
}

#[derive(Debug, Clone)]
pub struct TextInput {
    overlay: Option<Overlay>,
    draft: Option<Draft>,
    focused: bool,
    min_box_size: f64,
}

impl TextInput {
    #[must_use]
    pub fn new(min_box_size: f64) -> Self {
        Self { overlay: None, draft: None, focused: false, min_box_size }
    }

    #[must_use]
    pub fn state(&self) -> TextInputState {
        match (&self.overlay, self.focused) {
            (None, _) => TextInputState::Idle,
            (Some(_), false) => TextInputState::Positioning,
            (Some(_), true) => TextInputState::Editing,
        }
    }

    #[must_use]
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.overlay.is_some()
    }

    #[must_use]
    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// Start a drawing drag at `start` (view space).
    pub fn begin_draft(&mut self, kind: DraftKind, start: Point) {
        self.draft = Some(Draft { kind, start, current: start });
    }

    /// Move the free end of the drag. Returns the updated drag, if any.
    pub fn draft_to(&mut self, current: Point) -> Option<&Draft> {
        let draft = self.draft.as_mut()?;
        draft.current = current;
        Some(&*draft)
    }

    /// End the drag and hand it back.
    pub fn take_draft(&mut self) -> Option<Draft> {
        self.draft.take()
    }

    /// Place the overlay over a drawn box (view space). Returns false when the
    /// box is too small in either dimension to be intentional.
    ///
    /// The overlay is scaled uniformly so its natural line height fills the
    /// box height exactly.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SingularTransform`] when the font measures with no
    /// height, or any error from the measurement service.
    pub fn open_new(&mut self, rect: Rect, lang: &str, font: &str, measure: &dyn TextMeasure) -> Result<bool, EditorError> {
        if rect.width <= self.min_box_size || rect.height <= self.min_box_size {
            return Ok(false);
        }
        let metrics = measure.measure("", font)?;
        let natural = metrics.height();
        if natural < SINGULAR_EPSILON {
            return Err(EditorError::SingularTransform { det: natural });
        }
        let scale = rect.height / natural;
        let origin = Point::new(rect.x, rect.y);
        let script = Script::for_lang(lang);
        self.overlay = Some(Overlay {
            target: OverlayTarget::New,
            local: Rect::new(rect.x, rect.y, rect.width / scale, natural),
            transform: Affine::about(origin, Affine::scale(scale, scale)),
            lang: lang.to_owned(),
            direction: script.direction,
            baseline: script.baseline,
            font: font.to_owned(),
            value: String::new(),
            baseline_offset: metrics.baseline_offset(script.baseline),
        });
        self.focused = false;
        Ok(true)
    }

    /// Place the overlay on a drawn baseline from `start` to `end` (view
    /// space), at the font's natural size and turned to the baseline's angle.
    /// The new span's path is that baseline. Returns false when the line is
    /// too short to be intentional.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SingularTransform`] when the font measures with no
    /// height, or any error from the measurement service.
    pub fn open_on_baseline(&mut self, start: Point, end: Point, lang: &str, font: &str, measure: &dyn TextMeasure) -> Result<bool, EditorError> {
        let length = start.distance(end);
        if length <= self.min_box_size {
            return Ok(false);
        }
        let metrics = measure.measure("", font)?;
        let natural = metrics.height();
        if natural < SINGULAR_EPSILON {
            return Err(EditorError::SingularTransform { det: natural });
        }
        let run = end.sub(start);
        let angle = run.y.atan2(run.x).to_degrees();
        let script = Script::for_lang(lang);
        let offset = metrics.baseline_offset(script.baseline);
        self.overlay = Some(Overlay {
            target: OverlayTarget::New,
            local: Rect::new(0.0, -offset, length, natural),
            transform: Affine::translate(start.x, start.y).compose(&Affine::rotate_deg(angle)),
            lang: lang.to_owned(),
            direction: script.direction,
            baseline: script.baseline,
            font: font.to_owned(),
            value: String::new(),
            baseline_offset: offset,
        });
        self.focused = false;
        Ok(true)
    }

    /// Place the overlay over an existing span, pre-filled with its text.
    pub fn open_existing(&mut self, span: &Span) {
        let local = span.local_bounds().unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, span.ascent + span.descent));
        let script = span.script();
        self.overlay = Some(Overlay {
            target: OverlayTarget::Existing(span.id),
            local,
            transform: span.transform,
            lang: span.lang.clone(),
            direction: script.direction,
            baseline: script.baseline,
            font: span.font.clone(),
            value: span.text.clone(),
            baseline_offset: span.ascent,
        });
        self.focused = false;
    }

    /// The overlay received focus.
    pub fn focus(&mut self) {
        if self.overlay.is_some() {
            self.focused = true;
        }
    }

    /// Replace the overlay's text.
    pub fn set_value(&mut self, value: &str) {
        if let Some(overlay) = self.overlay.as_mut() {
            value.clone_into(&mut overlay.value);
        }
    }

    /// Hide the overlay without writing anything.
    pub fn cancel(&mut self) -> bool {
        self.focused = false;
        self.overlay.take().is_some()
    }

    /// Write the overlay's value into the store and hide it.
    ///
    /// Blank input deletes the span being edited (if any) and clears the
    /// selection. A new span becomes the sole selection. A re-edited span whose
    /// path was never hand-edited gets a fresh baseline matching the new text's
    /// natural width.
    ///
    /// # Errors
    ///
    /// Returns any error from the measurement service; the overlay stays open
    /// and the store is untouched in that case.
    pub fn commit(&mut self, store: &mut SpanStore, selection: &mut Selection, measure: &dyn TextMeasure) -> Result<Commit, EditorError> {
        let Some(overlay) = self.overlay.clone() else {
            return Ok(Commit::Nothing);
        };
        let text = overlay.value.trim();

        let outcome = if text.is_empty() {
            selection.clear(store);
            match overlay.target {
                OverlayTarget::New => Commit::Nothing,
                OverlayTarget::Existing(id) => {
                    selection.forget(&id);
                    match store.remove(&id) {
                        Some(_) => Commit::Deleted(id),
                        None => Commit::Nothing,
                    }
                }
            }
        } else {
            match overlay.target {
                OverlayTarget::New => {
                    let metrics = measure.measure(text, &overlay.font)?;
                    let span = new_span(&overlay, text, metrics.ascent + metrics.descent);
                    let id = span.id;
                    store.insert(span);
                    selection.select_only(store, id);
                    Commit::Created(id)
                }
                OverlayTarget::Existing(id) => {
                    let Some(span) = store.get_mut(&id) else {
                        self.cancel();
                        return Ok(Commit::Nothing);
                    };
                    if span.default_path {
                        let advance = measure.measure(text, &span.font)?.advance;
                        if let Some(start) = span.path.first_point() {
                            span.path = Path::line(start, Point::new(start.x + advance, start.y));
                        }
                    }
                    text.clone_into(&mut span.text);
                    span.sync_text_length();
                    Commit::Updated(id)
                }
            }
        };
        self.cancel();
        Ok(outcome)
    }
}

fn new_span(overlay: &Overlay, text: &str, natural: f64) -> Span {
    let y = overlay.local.y + overlay.baseline_offset;
    let path = Path::line(Point::new(overlay.local.x, y), Point::new(overlay.local.right(), y));
    Span {
        id: uuid::Uuid::new_v4(),
        transform: overlay.transform,
        text_length: path.length(),
        path,
        text: text.to_owned(),
        lang: overlay.lang.clone(),
        font: overlay.font.clone(),
        ascent: overlay.baseline_offset,
        descent: natural - overlay.baseline_offset,
        default_path: true,
        selected: false,
        z: 0,
    }
}

/// Emulated double-click: two presses close in time and space.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    last: Option<(Point, f64)>,
    window_ms: f64,
    radius_px: f64,
}

impl ClickTracker {
    #[must_use]
    pub fn new(window_ms: f64, radius_px: f64) -> Self {
        Self { last: None, window_ms, radius_px }
    }

    /// Record a pointer-down. Returns true when it completes a double-click on
    /// a span: within the window and radius of the previous press, on any target.
    pub fn register(&mut self, client: Point, now_ms: f64, target: Target) -> bool {
        let paired = self
            .last
            .is_some_and(|(at, when)| now_ms - when <= self.window_ms && now_ms >= when && client.distance(at) <= self.radius_px);
        if paired && matches!(target, Target::Span(_)) {
            self.last = None;
            return true;
        }
        self.last = Some((client, now_ms));
        false
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
