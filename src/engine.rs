//! Engine assembly: routes input through the controllers in priority order.
//!
//! Every pointer event is offered to the controllers as an ordered route list
//! (viewport, path edit, transform handles, selection, text input). The first
//! handler to claim the event wins. A handler error aborts the gesture in
//! progress and is logged; the event is dropped and state stays as it was.
//! A missing screen transform only drops the event, so a gesture survives a
//! momentary layout gap.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, warn};
use web_sys::SvgsvgElement;

use crate::config::EditorConfig;
use crate::dispatch::{try_handlers, Claim, Dispatch, Route};
use crate::error::EditorError;
use crate::geom::{Affine, Point};
use crate::handles::TransformHandles;
use crate::input::{Button, Buttons, CursorStyle, Key, Modifiers, PointerInput, Target, Tool, WheelDelta};
use crate::measure::{with_font_px, CanvasMeasure, FixedMeasure, TextMeasure};
use crate::path::parse_path;
use crate::path_edit::PathEdit;
use crate::render::Scene;
use crate::selection::Selection;
use crate::store::{Span, SpanId, SpanStore};
use crate::text_input::{ClickTracker, Commit, Draft, DraftKind, Overlay, TextInput};
use crate::viewport::{TouchPoint, Viewport};

/// Hebrew points and cantillation marks.
const DIACRITICS: std::ops::RangeInclusive<char> = '\u{0591}'..='\u{05C7}';

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    SetCursor(CursorStyle),
    SpanCreated(Span),
    SpanUpdated(SpanId),
    SpanDeleted(SpanId),
    SelectionChanged(Vec<SpanId>),
    TextInputShown(Overlay),
    TextInputHidden,
}

type PointerRoute = Route<EngineCore, PointerInput, Action>;

const DOWN_ROUTES: [PointerRoute; 5] = [
    ("viewport", viewport_down),
    ("path_edit", path_edit_down),
    ("handles", handles_down),
    ("selection", selection_down),
    ("text_input", text_input_down),
];

const MOVE_ROUTES: [PointerRoute; 5] = [
    ("viewport", viewport_move),
    ("path_edit", path_edit_move),
    ("handles", handles_move),
    ("selection", selection_move),
    ("text_input", text_input_move),
];

const UP_ROUTES: [PointerRoute; 5] = [
    ("viewport", viewport_up),
    ("path_edit", path_edit_up),
    ("handles", handles_up),
    ("selection", selection_up),
    ("text_input", text_input_up),
];

/// Core engine state: everything that doesn't depend on the DOM.
///
/// Separated from [`Engine`] so it can be driven and tested without a browser.
pub struct EngineCore {
    pub store: SpanStore,
    pub selection: Selection,
    pub viewport: Viewport,
    pub handles: TransformHandles,
    pub path_edit: PathEdit,
    pub text_input: TextInput,
    pub clicks: ClickTracker,
    pub tool: Tool,
    pub config: EditorConfig,
    /// Font for new spans. Starts as the configured font; the measure tool resizes it.
    font: String,
    screen: Option<Affine>,
    measure: Box<dyn TextMeasure>,
    seen_revision: u64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EditorConfig::default(), Box::new(FixedMeasure))
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EditorConfig, measure: Box<dyn TextMeasure>) -> Self {
        let tool = Tool::default();
        Self {
            store: SpanStore::new(),
            selection: Selection::new(),
            viewport: Viewport::new(&config, tool.resting_cursor()),
            handles: TransformHandles::new(),
            path_edit: PathEdit::new(),
            text_input: TextInput::new(config.min_box_size),
            clicks: ClickTracker::new(config.double_click_ms, config.double_click_radius_px),
            tool,
            font: config.font.clone(),
            config,
            screen: None,
            measure,
            seen_revision: 0,
        }
    }

    // --- Host surface ---

    /// Update the surface → client transform. `None` while the surface is not laid out.
    pub fn set_screen_transform(&mut self, screen: Option<Affine>) {
        self.screen = screen;
    }

    /// The current surface → client transform.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ViewportUnavailable`] until the host supplies one.
    pub fn screen(&self) -> Result<Affine, EditorError> {
        self.screen.ok_or(EditorError::ViewportUnavailable)
    }

    fn view_to_client(&self) -> Result<Affine, EditorError> {
        Ok(self.viewport.view_to_client(&self.screen()?))
    }

    fn client_to_view(&self, client: Point) -> Result<Point, EditorError> {
        self.viewport.client_to_view(client, &self.screen()?)
    }

    // --- Data ---

    /// Replace the session's spans. Clears the selection and any open editor.
    pub fn load_snapshot(&mut self, spans: Vec<Span>) -> Vec<Action> {
        let mut out = Vec::new();
        self.abort_gesture(&mut out);
        if self.text_input.cancel() {
            out.push(Action::TextInputHidden);
        }
        self.selection.clear(&mut self.store);
        self.store.load_snapshot(spans);
        self.selection.retain_existing(&self.store);
        self.flush_selection(&mut out);
        out.push(Action::RenderNeeded);
        out
    }

    /// Decode and load a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Snapshot`] if the document is invalid; the session
    /// is unchanged in that case.
    pub fn load_snapshot_json(&mut self, json: &str) -> Result<Vec<Action>, EditorError> {
        let spans = SpanStore::parse_snapshot(json)?;
        Ok(self.load_snapshot(spans))
    }

    /// Serialize the session's spans as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Snapshot`] if serialization fails.
    pub fn snapshot_json(&self) -> Result<String, EditorError> {
        self.store.to_json()
    }

    // --- Tool / view ---

    /// Set the active tool and show its resting cursor.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.tool = tool;
        let mut out = Vec::new();
        if let Some(cursor) = self.viewport.set_resting_cursor(tool.resting_cursor()) {
            out.push(Action::SetCursor(cursor));
        }
        out
    }

    /// Font shorthand new spans are created with.
    #[must_use]
    pub fn font(&self) -> &str {
        &self.font
    }

    /// Set the pixel size of the font for new spans.
    pub fn set_font_px(&mut self, px: f64) {
        self.font = with_font_px(&self.font, px);
    }

    /// Return the viewport to identity.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.viewport.reset();
        vec![Action::RenderNeeded]
    }

    // --- Span edits ---

    /// Delete every selected span.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        let mut out = Vec::new();
        for id in self.selection.ids() {
            self.delete_span(id, &mut out);
        }
        self.flush_selection(&mut out);
        if !out.is_empty() {
            out.push(Action::RenderNeeded);
        }
        out
    }

    /// Remove Hebrew points and cantillation from a span's text. A span left
    /// blank is deleted.
    pub fn strip_diacritics(&mut self, id: &SpanId) -> Vec<Action> {
        let mut out = Vec::new();
        let Some(span) = self.store.get_mut(id) else {
            return out;
        };
        let stripped: String = span.text.chars().filter(|c| !DIACRITICS.contains(c)).collect();
        if stripped == span.text {
            return out;
        }
        if stripped.trim().is_empty() {
            self.delete_span(*id, &mut out);
            self.flush_selection(&mut out);
        } else {
            span.text = stripped;
            out.push(Action::SpanUpdated(*id));
        }
        out.push(Action::RenderNeeded);
        out
    }

    /// Replace a span's baseline with path data typed by the host. Malformed
    /// data is logged and the span keeps its current path.
    pub fn set_span_path(&mut self, id: &SpanId, d: &str) -> Vec<Action> {
        let Some(span) = self.store.get_mut(id) else {
            return Vec::new();
        };
        match parse_path(d) {
            Ok(path) => {
                span.path = path;
                span.default_path = false;
                span.sync_text_length();
                vec![Action::SpanUpdated(*id), Action::RenderNeeded]
            }
            Err(error) => {
                warn!(%id, %error, "path rejected");
                Vec::new()
            }
        }
    }

    fn delete_span(&mut self, id: SpanId, out: &mut Vec<Action>) {
        self.selection.forget(&id);
        if self.store.remove(&id).is_some() {
            out.push(Action::SpanDeleted(id));
        }
    }

    // --- Text overlay ---

    pub fn text_input_focused(&mut self) {
        self.text_input.focus();
    }

    pub fn text_input_changed(&mut self, value: &str) {
        self.text_input.set_value(value);
    }

    /// The overlay lost focus. Commits only when focus moved to another element.
    pub fn text_input_blurred(&mut self, has_related_target: bool) -> Vec<Action> {
        let mut out = Vec::new();
        if has_related_target {
            self.commit_text(&mut out);
        }
        out
    }

    /// The overlay's form was submitted.
    pub fn submit_text_input(&mut self) -> Vec<Action> {
        let mut out = Vec::new();
        self.commit_text(&mut out);
        out
    }

    /// Discard the overlay and deselect.
    pub fn cancel_text_input(&mut self) -> Vec<Action> {
        let mut out = Vec::new();
        if self.text_input.cancel() {
            out.push(Action::TextInputHidden);
            self.selection.clear(&mut self.store);
            self.flush_selection(&mut out);
            out.push(Action::RenderNeeded);
        }
        out
    }

    fn commit_text(&mut self, out: &mut Vec<Action>) {
        if !self.text_input.is_visible() {
            return;
        }
        match self.text_input.commit(&mut self.store, &mut self.selection, self.measure.as_ref()) {
            Ok(commit) => {
                match commit {
                    Commit::Nothing => {}
                    Commit::Created(id) => {
                        if let Some(span) = self.store.get(&id) {
                            out.push(Action::SpanCreated(span.clone()));
                        }
                    }
                    Commit::Updated(id) => out.push(Action::SpanUpdated(id)),
                    Commit::Deleted(id) => out.push(Action::SpanDeleted(id)),
                }
                out.push(Action::TextInputHidden);
                self.flush_selection(out);
                out.push(Action::RenderNeeded);
            }
            Err(error) => warn!(%error, "text commit failed; overlay left open"),
        }
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, mut ev: PointerInput) -> Vec<Action> {
        let mut out = Vec::new();
        if ev.target == Target::TextInput {
            return out;
        }
        if self.text_input.is_visible() {
            self.commit_text(&mut out);
        }
        ev.double_click = if ev.button == Button::Primary {
            self.clicks.register(ev.client, ev.now_ms, ev.target)
        } else {
            self.clicks.reset();
            false
        };
        self.route(&ev, &DOWN_ROUTES, &mut out);
        self.flush_selection(&mut out);
        out
    }

    pub fn on_pointer_move(&mut self, ev: PointerInput) -> Vec<Action> {
        let mut out = Vec::new();
        self.route(&ev, &MOVE_ROUTES, &mut out);
        self.flush_selection(&mut out);
        out
    }

    pub fn on_pointer_up(&mut self, ev: PointerInput) -> Vec<Action> {
        let mut out = Vec::new();
        self.route(&ev, &UP_ROUTES, &mut out);
        if self.selection.drag().is_some() {
            self.selection.end_drag();
            out.push(Action::RenderNeeded);
        }
        if self.cancel_draft() {
            out.push(Action::RenderNeeded);
        }
        self.flush_selection(&mut out);
        out
    }

    fn route(&mut self, ev: &PointerInput, routes: &[PointerRoute], out: &mut Vec<Action>) {
        match try_handlers(self, ev, out, routes) {
            Dispatch::Failed { by, error: EditorError::ViewportUnavailable } => {
                debug!(handler = by, "input dropped; screen transform unavailable");
            }
            Dispatch::Failed { by, error } => {
                report(by, &error);
                self.abort_gesture(out);
            }
            Dispatch::Claimed(_) | Dispatch::Unclaimed => {}
        }
    }

    // --- Wheel / touch ---

    pub fn on_wheel(&mut self, client: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        let result = self.screen().and_then(|screen| self.viewport.wheel(client, delta, modifiers, &screen));
        match result {
            Ok(true) => vec![Action::RenderNeeded],
            Ok(false) => Vec::new(),
            Err(error) => {
                report("viewport", &error);
                Vec::new()
            }
        }
    }

    pub fn on_touch_start(&mut self, touches: &[TouchPoint], now_ms: f64) -> Vec<Action> {
        let result = self.screen().and_then(|screen| self.viewport.touch_start(touches, &screen, now_ms));
        if let Err(error) = result {
            report("viewport", &error);
        }
        Vec::new()
    }

    pub fn on_touch_move(&mut self, touches: &[TouchPoint], now_ms: f64) -> Vec<Action> {
        let result = self.screen().and_then(|screen| self.viewport.touch_move(touches, &screen, now_ms));
        match result {
            Ok(true) => vec![Action::RenderNeeded],
            Ok(false) => Vec::new(),
            Err(error) => {
                report("viewport", &error);
                Vec::new()
            }
        }
    }

    pub fn on_touch_end(&mut self, now_ms: f64) -> Vec<Action> {
        if self.viewport.touch_end(now_ms) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.text_input.is_visible() {
            return match key.as_str() {
                "Escape" => self.cancel_text_input(),
                "Enter" => self.submit_text_input(),
                _ => Vec::new(),
            };
        }
        if key.as_str() == "Escape" && (self.tool == Tool::Measure || self.text_input.draft().is_some()) {
            let mut out = Vec::new();
            if self.cancel_draft() {
                out.push(Action::RenderNeeded);
            }
            if self.tool == Tool::Measure {
                out.extend(self.set_tool(Tool::Pan));
            }
            return out;
        }
        match key.as_str() {
            "Delete" | "Backspace" => self.delete_selection(),
            "Escape" => {
                let mut out = Vec::new();
                self.selection.clear(&mut self.store);
                self.flush_selection(&mut out);
                out
            }
            other if !(modifiers.ctrl || modifiers.meta || modifiers.alt) => match Tool::from_shortcut(other) {
                Some(tool) => self.set_tool(tool),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    // --- Queries ---

    /// Describe everything the presentation layer draws.
    #[must_use]
    pub fn scene(&self) -> Scene {
        Scene::build(self)
    }

    #[must_use]
    pub fn span(&self, id: &SpanId) -> Option<&Span> {
        self.store.get(id)
    }

    /// Selected span ids, sorted.
    #[must_use]
    pub fn selected(&self) -> Vec<SpanId> {
        self.selection.ids()
    }

    #[must_use]
    pub fn cursor(&self) -> CursorStyle {
        self.viewport.cursor()
    }

    // --- Internals ---

    /// Propagate a selection change: expose path handles for exactly one span
    /// and notify the host.
    fn flush_selection(&mut self, out: &mut Vec<Action>) {
        self.selection.retain_existing(&self.store);
        if self.selection.revision() == self.seen_revision {
            return;
        }
        self.seen_revision = self.selection.revision();
        match self.selection.single() {
            Some(id) => self.path_edit.activate(id),
            None => self.path_edit.deactivate(),
        }
        out.push(Action::SelectionChanged(self.selection.ids()));
        out.push(Action::RenderNeeded);
    }

    /// Drop any drawing drag. An unfinished measurement gives back the font
    /// it replaced.
    fn cancel_draft(&mut self) -> bool {
        let Some(draft) = self.text_input.take_draft() else {
            return false;
        };
        if let DraftKind::Measure { previous_font } = draft.kind {
            self.font = previous_font;
        }
        true
    }

    fn abort_gesture(&mut self, out: &mut Vec<Action>) {
        if self.cancel_draft() {
            out.push(Action::RenderNeeded);
        }
        self.handles.end();
        self.path_edit.end_drag();
        self.selection.end_drag();
        if self.viewport.is_panning() {
            if let Some(cursor) = self.viewport.end_pan() {
                out.push(Action::SetCursor(cursor));
            }
        }
    }
}

fn report(handler: &'static str, error: &EditorError) {
    match error {
        EditorError::ViewportUnavailable => debug!(handler, %error, "input dropped"),
        _ => warn!(handler, %error, "gesture aborted"),
    }
}

fn pan_allowed(tool: Tool, buttons: Buttons) -> bool {
    (tool == Tool::Pan && buttons.primary()) || buttons.secondary() || buttons.middle()
}

// =============================================================
// Pointer-down handlers
// =============================================================

fn viewport_down(core: &mut EngineCore, ev: &PointerInput, out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    let primary = ev.button == Button::Primary;
    if primary && (core.tool != Tool::Pan || ev.double_click) {
        return Ok(Claim::Pass);
    }
    if let Some(cursor) = core.viewport.begin_pan(ev.client) {
        out.push(Action::SetCursor(cursor));
    }
    Ok(Claim::Claimed)
}

fn path_edit_down(core: &mut EngineCore, ev: &PointerInput, _out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    let Target::PathHandle { command, point } = ev.target else {
        return Ok(Claim::Pass);
    };
    if core.path_edit.begin_drag(&core.store, command, point, ev.client) {
        Ok(Claim::Claimed)
    } else {
        Ok(Claim::Pass)
    }
}

fn handles_down(core: &mut EngineCore, ev: &PointerInput, _out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    if core.tool != Tool::Select {
        return Ok(Claim::Pass);
    }
    match ev.target {
        Target::ScaleHandle(edge) => {
            let Some(bounds) = core.selection.aggregate_bounds(&core.store) else {
                return Ok(Claim::Pass);
            };
            let pointer = core.client_to_view(ev.client)?;
            core.handles.begin_scale(&core.store, &core.selection.ids(), edge, bounds, pointer)?;
            Ok(Claim::Claimed)
        }
        Target::Span(id) if core.selection.contains(&id) && !ev.double_click && !ev.modifiers.shift => {
            let pointer = core.client_to_view(ev.client)?;
            core.handles.begin_translate(pointer);
            Ok(Claim::Claimed)
        }
        _ => Ok(Claim::Pass),
    }
}

fn selection_down(core: &mut EngineCore, ev: &PointerInput, out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    if ev.double_click && ev.target.span().is_some() {
        return Ok(Claim::Pass);
    }
    match (core.tool, ev.target) {
        (Tool::Select, Target::Span(id)) => {
            core.selection.toggle(&mut core.store, id, ev.modifiers.shift);
        }
        (Tool::Select, _) => {
            if !ev.modifiers.shift {
                core.selection.clear(&mut core.store);
            }
            core.selection.begin_drag(ev.client);
        }
        (Tool::Pan | Tool::Text | Tool::Path | Tool::Measure, _) => return Ok(Claim::Pass),
    }
    out.push(Action::RenderNeeded);
    Ok(Claim::Claimed)
}

fn text_input_down(core: &mut EngineCore, ev: &PointerInput, out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    if ev.double_click {
        let Some(span) = ev.target.span().and_then(|id| core.store.get(&id)) else {
            return Ok(Claim::Pass);
        };
        core.text_input.open_existing(span);
        if let Some(overlay) = core.text_input.overlay() {
            out.push(Action::TextInputShown(overlay.clone()));
        }
        return Ok(Claim::Claimed);
    }
    if ev.button != Button::Primary {
        return Ok(Claim::Pass);
    }
    let kind = match core.tool {
        Tool::Text => DraftKind::Box,
        Tool::Path => DraftKind::Baseline,
        Tool::Measure => DraftKind::Measure { previous_font: core.font.clone() },
        Tool::Pan | Tool::Select => return Ok(Claim::Pass),
    };
    let start = core.client_to_view(ev.client)?;
    if !ev.modifiers.shift {
        core.selection.clear(&mut core.store);
    }
    core.text_input.begin_draft(kind, start);
    out.push(Action::RenderNeeded);
    Ok(Claim::Claimed)
}

// =============================================================
// Pointer-move handlers
// =============================================================

fn viewport_move(core: &mut EngineCore, ev: &PointerInput, out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    if !core.viewport.is_panning() {
        return Ok(Claim::Pass);
    }
    if !pan_allowed(core.tool, ev.buttons) {
        if let Some(cursor) = core.viewport.end_pan() {
            out.push(Action::SetCursor(cursor));
        }
        return Ok(Claim::Pass);
    }
    let screen = core.screen()?;
    core.viewport.pan_to(ev.client, &screen)?;
    out.push(Action::RenderNeeded);
    Ok(Claim::Claimed)
}

fn path_edit_move(core: &mut EngineCore, ev: &PointerInput, out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    if !core.path_edit.is_dragging() {
        return Ok(Claim::Pass);
    }
    let view_to_client = core.view_to_client()?;
    if let Some(id) = core.path_edit.drag_to(&mut core.store, ev.client, &view_to_client)? {
        out.push(Action::SpanUpdated(id));
        out.push(Action::RenderNeeded);
    }
    Ok(Claim::Claimed)
}

fn handles_move(core: &mut EngineCore, ev: &PointerInput, out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    if !core.handles.is_active() {
        return Ok(Claim::Pass);
    }
    let pointer = core.client_to_view(ev.client)?;
    let changed = core.handles.drag_to(&mut core.store, &core.selection.ids(), pointer);
    if !changed.is_empty() {
        out.extend(changed.into_iter().map(Action::SpanUpdated));
        out.push(Action::RenderNeeded);
    }
    Ok(Claim::Claimed)
}

fn selection_move(core: &mut EngineCore, ev: &PointerInput, out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    if core.selection.drag().is_none() {
        return Ok(Claim::Pass);
    }
    let view_to_client = core.view_to_client()?;
    let live = core.tool == Tool::Select;
    core.selection.drag_to(&mut core.store, ev.client, &view_to_client, live);
    out.push(Action::RenderNeeded);
    Ok(Claim::Claimed)
}

fn text_input_move(core: &mut EngineCore, ev: &PointerInput, out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    if core.text_input.draft().is_none() {
        return Ok(Claim::Pass);
    }
    let pointer = core.client_to_view(ev.client)?;
    if let Some(px) = core.text_input.draft_to(pointer).and_then(Draft::measured_px) {
        core.set_font_px(px);
    }
    out.push(Action::RenderNeeded);
    Ok(Claim::Claimed)
}

// =============================================================
// Pointer-up handlers
// =============================================================

fn viewport_up(core: &mut EngineCore, _ev: &PointerInput, out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    if !core.viewport.is_panning() {
        return Ok(Claim::Pass);
    }
    if let Some(cursor) = core.viewport.end_pan() {
        out.push(Action::SetCursor(cursor));
    }
    Ok(Claim::Claimed)
}

fn path_edit_up(core: &mut EngineCore, _ev: &PointerInput, _out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    Ok(if core.path_edit.end_drag() { Claim::Claimed } else { Claim::Pass })
}

fn handles_up(core: &mut EngineCore, _ev: &PointerInput, _out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    Ok(if core.handles.end() { Claim::Claimed } else { Claim::Pass })
}

fn selection_up(core: &mut EngineCore, _ev: &PointerInput, out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    if core.tool != Tool::Select || core.selection.drag().is_none() {
        return Ok(Claim::Pass);
    }
    core.selection.end_drag();
    out.push(Action::RenderNeeded);
    Ok(Claim::Claimed)
}

fn text_input_up(core: &mut EngineCore, _ev: &PointerInput, out: &mut Vec<Action>) -> Result<Claim, EditorError> {
    let Some(draft) = core.text_input.take_draft() else {
        return Ok(Claim::Pass);
    };
    out.push(Action::RenderNeeded);
    let lang = &core.config.lang;
    let measure = core.measure.as_ref();
    let opened = match draft.kind {
        DraftKind::Box => core.text_input.open_new(draft.rect(), lang, &core.font, measure)?,
        DraftKind::Baseline => core.text_input.open_on_baseline(draft.start, draft.current, lang, &core.font, measure)?,
        DraftKind::Measure { .. } => {
            debug!(font = %core.font, "font size measured");
            out.extend(core.set_tool(Tool::Pan));
            return Ok(Claim::Claimed);
        }
    };
    if opened {
        if let Some(overlay) = core.text_input.overlay() {
            out.push(Action::TextInputShown(overlay.clone()));
        }
    }
    Ok(Claim::Claimed)
}

// =============================================================
// Browser binding
// =============================================================

/// The full engine. Wraps [`EngineCore`] and owns the root `<svg>` element.
pub struct Engine {
    svg: SvgsvgElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to `svg`, measuring text with an off-screen canvas
    /// in the same document.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Host`] if the element is detached or a canvas
    /// context cannot be created.
    pub fn new(svg: SvgsvgElement, config: EditorConfig) -> Result<Self, EditorError> {
        let document = svg.owner_document().ok_or_else(|| EditorError::Host("svg element has no document".into()))?;
        let measure = CanvasMeasure::new(&document)?;
        let mut engine = Self { svg, core: EngineCore::new(config, Box::new(measure)) };
        engine.sync_screen();
        Ok(engine)
    }

    /// Re-read the element's screen CTM. Call after layout changes.
    pub fn sync_screen(&mut self) {
        let screen = self.svg.get_screen_ctm().map(|m| {
            Affine::new(f64::from(m.a()), f64::from(m.b()), f64::from(m.c()), f64::from(m.d()), f64::from(m.e()), f64::from(m.f()))
        });
        self.core.set_screen_transform(screen);
    }

    fn pointer(client: Point, button: Button, buttons: Buttons, modifiers: Modifiers, target: Target) -> PointerInput {
        PointerInput::new(client, button, buttons, target, js_sys::Date::now()).with_modifiers(modifiers)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, client: Point, button: Button, buttons: Buttons, modifiers: Modifiers, target: Target) -> Vec<Action> {
        self.sync_screen();
        self.core.on_pointer_down(Self::pointer(client, button, buttons, modifiers, target))
    }

    pub fn on_pointer_move(&mut self, client: Point, buttons: Buttons, modifiers: Modifiers, target: Target) -> Vec<Action> {
        self.core.on_pointer_move(Self::pointer(client, Button::Primary, buttons, modifiers, target))
    }

    pub fn on_pointer_up(&mut self, client: Point, button: Button, buttons: Buttons, modifiers: Modifiers, target: Target) -> Vec<Action> {
        self.core.on_pointer_up(Self::pointer(client, button, buttons, modifiers, target))
    }

    pub fn on_wheel(&mut self, client: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.sync_screen();
        self.core.on_wheel(client, delta, modifiers)
    }

    pub fn on_touch_start(&mut self, touches: &[TouchPoint]) -> Vec<Action> {
        self.sync_screen();
        self.core.on_touch_start(touches, js_sys::Date::now())
    }

    pub fn on_touch_move(&mut self, touches: &[TouchPoint]) -> Vec<Action> {
        self.core.on_touch_move(touches, js_sys::Date::now())
    }

    pub fn on_touch_end(&mut self) -> Vec<Action> {
        self.core.on_touch_end(js_sys::Date::now())
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    // --- Delegated commands ---

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.core.reset_view()
    }

    #[must_use]
    pub fn font(&self) -> &str {
        self.core.font()
    }

    pub fn set_font_px(&mut self, px: f64) {
        self.core.set_font_px(px);
    }

    pub fn strip_diacritics(&mut self, id: &SpanId) -> Vec<Action> {
        self.core.strip_diacritics(id)
    }

    pub fn set_span_path(&mut self, id: &SpanId, d: &str) -> Vec<Action> {
        self.core.set_span_path(id, d)
    }

    /// Load a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Snapshot`] if the document is invalid.
    pub fn load_snapshot_json(&mut self, json: &str) -> Result<Vec<Action>, EditorError> {
        self.core.load_snapshot_json(json)
    }

    #[must_use]
    pub fn scene(&self) -> Scene {
        self.core.scene()
    }
}
