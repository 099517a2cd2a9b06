//! Path edit controller: control-point handles for the single selected span.
//!
//! Handles are stored as (command, point) indices into the span's path, so a
//! drag can only move coordinates; the command list itself never changes shape.

#[cfg(test)]
#[path = "path_edit_test.rs"]
mod path_edit_test;

use crate::error::EditorError;
use crate::geom::{Affine, Point};
use crate::store::{SpanId, SpanStore};

/// One draggable control point, positioned in view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathHandle {
    pub command: usize,
    pub point: usize,
    pub position: Point,
}

#[derive(Debug, Clone, Copy)]
struct PointGrab {
    command: usize,
    point: usize,
    last_client: Point,
}

#[derive(Debug, Clone, Default)]
pub struct PathEdit {
    target: Option<SpanId>,
    grab: Option<PointGrab>,
}

impl PathEdit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The span whose handles are exposed.
    #[must_use]
    pub fn target(&self) -> Option<SpanId> {
        self.target
    }

    pub fn activate(&mut self, id: SpanId) {
        if self.target != Some(id) {
            self.grab = None;
        }
        self.target = Some(id);
    }

    pub fn deactivate(&mut self) {
        self.target = None;
        self.grab = None;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Handle positions for the active span, in view space.
    #[must_use]
    pub fn handles(&self, store: &SpanStore) -> Vec<PathHandle> {
        let Some(span) = self.target.and_then(|id| store.get(&id)) else {
            return Vec::new();
        };
        span.path
            .commands()
            .iter()
            .enumerate()
            .flat_map(|(command, cmd)| {
                cmd.points.iter().enumerate().map(move |(point, p)| PathHandle {
                    command,
                    point,
                    position: span.transform.apply(*p),
                })
            })
            .collect()
    }

    /// Grab control point (`command`, `point`) at `client`. Returns false when no
    /// span is active or the point does not exist.
    pub fn begin_drag(&mut self, store: &SpanStore, command: usize, point: usize, client: Point) -> bool {
        let exists = self.target.and_then(|id| store.get(&id)).and_then(|span| span.path.point(command, point)).is_some();
        if exists {
            self.grab = Some(PointGrab { command, point, last_client: client });
        }
        exists
    }

    /// Move the grabbed point by the client-space pointer delta. Returns the
    /// edited span.
    ///
    /// The delta goes through the inverse of the view → client transform first,
    /// then through the inverse of the span's own transform.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SingularTransform`] if either transform cannot be
    /// inverted and [`EditorError::MalformedPath`] if the new coordinate is
    /// rejected. The path is unchanged in both cases.
    pub fn drag_to(&mut self, store: &mut SpanStore, client: Point, view_to_client: &Affine) -> Result<Option<SpanId>, EditorError> {
        let (Some(id), Some(grab)) = (self.target, self.grab.as_mut()) else {
            return Ok(None);
        };
        let Some(span) = store.get_mut(&id) else {
            return Ok(None);
        };
        let view_delta = view_to_client.invert()?.apply_vector(client.sub(grab.last_client));
        let local_delta = span.transform.invert()?.apply_vector(view_delta);
        let Some(current) = span.path.point(grab.command, grab.point) else {
            return Err(missing_point(grab.command, grab.point));
        };
        if !span.path.set_point(grab.command, grab.point, current.add(local_delta)) {
            return Err(EditorError::MalformedPath {
                token: format!("{},{}", current.x + local_delta.x, current.y + local_delta.y),
                reason: "coordinate is not finite".into(),
            });
        }
        grab.last_client = client;
        span.default_path = false;
        span.sync_text_length();
        Ok(Some(id))
    }

    /// Release the grabbed point. Returns whether one was held.
    pub fn end_drag(&mut self) -> bool {
        self.grab.take().is_some()
    }
}

fn missing_point(command: usize, point: usize) -> EditorError {
    EditorError::MalformedPath { token: format!("#{command}.{point}"), reason: "no such control point".into() }
}
