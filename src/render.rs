//! Render step: a pure description of everything the presentation layer draws.
//!
//! [`Scene::build`] reads engine state and never mutates it. The host diffs or
//! redraws its SVG from the scene after any [`crate::engine::Action::RenderNeeded`].

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::engine::EngineCore;
use crate::geom::{Affine, Rect};
use crate::handles::ScaleHandles;
use crate::input::{CursorStyle, Tool};
use crate::path::format_path;
use crate::path_edit::PathHandle;
use crate::store::{Baseline, Direction, Span, SpanId};
use crate::text_input::{Draft, Overlay};

/// One span as the host renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanView {
    pub id: SpanId,
    /// Local → view.
    pub transform: Affine,
    /// Baseline path data.
    pub d: String,
    pub text: String,
    pub lang: String,
    pub dir: Direction,
    pub baseline: Baseline,
    pub font: String,
    pub text_length: f64,
    pub selected: bool,
}

impl SpanView {
    fn from_span(span: &Span) -> Self {
        let script = span.script();
        Self {
            id: span.id,
            transform: span.transform,
            d: format_path(&span.path),
            text: span.text.clone(),
            lang: span.lang.clone(),
            dir: script.direction,
            baseline: script.baseline,
            font: span.font.clone(),
            text_length: span.text_length,
            selected: span.selected,
        }
    }

    /// `id` attribute of the span's `<path>`, referenced by its `<textPath>`.
    #[must_use]
    pub fn path_id(&self) -> String {
        format!("span-{}", self.id)
    }
}

/// Full frame description.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// View → surface transform for the pannable group.
    pub viewport: Affine,
    /// Spans in draw order.
    pub spans: Vec<SpanView>,
    /// Aggregate selection bounds in view space.
    pub selection_bounds: Option<Rect>,
    /// Scale handles (select tool only), view space.
    pub scale_handles: Option<ScaleHandles>,
    /// Control points of the path under edit, view space.
    pub path_handles: Vec<PathHandle>,
    /// Screen radius to draw scale and path handles with.
    pub handle_radius_px: f64,
    /// Live rubber-band box, client space.
    pub rubber_band: Option<Rect>,
    /// Text box, baseline or measuring line being drawn, view space.
    pub draft: Option<Draft>,
    pub overlay: Option<Overlay>,
    pub cursor: CursorStyle,
}

impl Scene {
    #[must_use]
    pub fn build(core: &EngineCore) -> Self {
        let selection_bounds = core.selection.aggregate_bounds(&core.store);
        let scale_handles = match core.tool {
            Tool::Select => selection_bounds.map(ScaleHandles::for_bounds),
            Tool::Pan | Tool::Text | Tool::Path | Tool::Measure => None,
        };
        Self {
            viewport: core.viewport.effective_transform(),
            spans: core.store.sorted_spans().into_iter().map(SpanView::from_span).collect(),
            selection_bounds,
            scale_handles,
            path_handles: core.path_edit.handles(&core.store),
            handle_radius_px: core.config.handle_radius_px,
            rubber_band: core.selection.drag().map(|drag| drag.rect()),
            draft: core.text_input.draft().cloned(),
            overlay: core.text_input.overlay().cloned(),
            cursor: core.viewport.cursor(),
        }
    }
}
