//! Transform handles: drag-to-translate and the two vertical scale handles on
//! the selection's aggregate bounds.
//!
//! Every update composes onto each span's existing transform. Spans keep
//! independent transforms; only the delta is shared. Scaling restarts from the
//! transforms captured at drag start so rounding never accumulates.

#[cfg(test)]
#[path = "handles_test.rs"]
mod handles_test;

use crate::consts::{MIN_SCALE_RATIO, SINGULAR_EPSILON};
use crate::error::EditorError;
use crate::geom::{Affine, Point, Rect};
use crate::store::{SpanId, SpanStore};

/// Which scale handle was grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleEdge {
    Top,
    Bottom,
}

impl HandleEdge {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Scale handle positions in view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleHandles {
    pub top: Point,
    pub bottom: Point,
}

impl ScaleHandles {
    /// Top-center and bottom-center of `bounds`.
    #[must_use]
    pub fn for_bounds(bounds: Rect) -> Self {
        let cx = bounds.x + bounds.width * 0.5;
        Self { top: Point::new(cx, bounds.top()), bottom: Point::new(cx, bounds.bottom()) }
    }

    #[must_use]
    pub fn at(&self, edge: HandleEdge) -> Point {
        match edge {
            HandleEdge::Top => self.top,
            HandleEdge::Bottom => self.bottom,
        }
    }
}

#[derive(Debug, Clone)]
enum HandleDrag {
    Translate { last: Point },
    Scale { anchor: Point, start_distance: f64, originals: Vec<(SpanId, Affine)> },
}

/// Active translate or scale drag, if any.
#[derive(Debug, Clone, Default)]
pub struct TransformHandles {
    drag: Option<HandleDrag>,
}

impl TransformHandles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    /// Start moving the selection from `pointer` (view space).
    pub fn begin_translate(&mut self, pointer: Point) {
        self.drag = Some(HandleDrag::Translate { last: pointer });
    }

    /// Start scaling `ids` by the `edge` handle of `bounds`, anchored at the
    /// opposite handle.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SingularTransform`] when the pointer starts on the
    /// anchor, since every later ratio would divide by zero.
    pub fn begin_scale(&mut self, store: &SpanStore, ids: &[SpanId], edge: HandleEdge, bounds: Rect, pointer: Point) -> Result<(), EditorError> {
        let anchor = ScaleHandles::for_bounds(bounds).at(edge.opposite());
        let start_distance = pointer.distance(anchor);
        if start_distance < SINGULAR_EPSILON {
            return Err(EditorError::SingularTransform { det: 0.0 });
        }
        let originals = ids.iter().filter_map(|id| store.get(id).map(|span| (*id, span.transform))).collect();
        self.drag = Some(HandleDrag::Scale { anchor, start_distance, originals });
        Ok(())
    }

    /// Apply the drag for the pointer now at `pointer` (view space). Returns the
    /// spans whose transform changed.
    pub fn drag_to(&mut self, store: &mut SpanStore, ids: &[SpanId], pointer: Point) -> Vec<SpanId> {
        match self.drag.as_mut() {
            None => Vec::new(),
            Some(HandleDrag::Translate { last }) => {
                let delta = pointer.sub(*last);
                *last = pointer;
                translate(store, ids, delta)
            }
            Some(HandleDrag::Scale { anchor, start_distance, originals }) => {
                let ratio = pointer.distance(*anchor) / *start_distance;
                if ratio < MIN_SCALE_RATIO {
                    return Vec::new();
                }
                let step = Affine::about(*anchor, Affine::scale(1.0, ratio));
                let mut changed = Vec::with_capacity(originals.len());
                for (id, original) in originals.iter() {
                    if let Some(span) = store.get_mut(id) {
                        span.transform = step.compose(original);
                        changed.push(*id);
                    }
                }
                changed
            }
        }
    }

    /// Finish the drag. Returns whether one was active.
    pub fn end(&mut self) -> bool {
        self.drag.take().is_some()
    }
}

/// Move every span in `ids` by `delta` (view space).
pub fn translate(store: &mut SpanStore, ids: &[SpanId], delta: Point) -> Vec<SpanId> {
    let step = Affine::translate(delta.x, delta.y);
    let mut changed = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(span) = store.get_mut(id) {
            span.transform = step.compose(&span.transform);
            changed.push(*id);
        }
    }
    changed
}
