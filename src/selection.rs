//! Selection manager: the set of selected spans, click toggling, and
//! rubber-band box selection with live preview.
//!
//! Membership is mirrored into each span's `selected` flag; every mutation goes
//! through this type with the store at hand so the two never disagree. Box
//! overlap is tested in client space against each span's rendered bounds.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::BTreeSet;

use crate::geom::{overlaps, Affine, Point, Rect};
use crate::store::{SpanId, SpanStore};

/// An in-progress rubber-band drag, in client space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxDrag {
    pub start: Point,
    pub current: Point,
}

impl BoxDrag {
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.start, self.current)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: BTreeSet<SpanId>,
    boxed: BTreeSet<SpanId>,
    drag: Option<BoxDrag>,
    revision: u64,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every membership change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn ids(&self) -> Vec<SpanId> {
        self.selected.iter().copied().collect()
    }

    #[must_use]
    pub fn contains(&self, id: &SpanId) -> bool {
        self.selected.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The selected span when exactly one is selected.
    #[must_use]
    pub fn single(&self) -> Option<SpanId> {
        match self.selected.len() {
            1 => self.selected.first().copied(),
            _ => None,
        }
    }

    /// Spans provisionally added by the current box drag.
    #[must_use]
    pub fn boxed(&self) -> &BTreeSet<SpanId> {
        &self.boxed
    }

    // ── Membership ──────────────────────────────────────────────

    /// Toggle `id`, clearing everything else first unless `additive`.
    pub fn toggle(&mut self, store: &mut SpanStore, id: SpanId, additive: bool) {
        if !additive {
            self.clear(store);
        }
        if self.selected.contains(&id) {
            self.unmark(store, id);
        } else {
            self.mark(store, id);
        }
    }

    /// Make `id` the only selected span.
    pub fn select_only(&mut self, store: &mut SpanStore, id: SpanId) {
        self.clear(store);
        self.mark(store, id);
    }

    pub fn clear(&mut self, store: &mut SpanStore) {
        for id in std::mem::take(&mut self.selected) {
            if let Some(span) = store.get_mut(&id) {
                span.selected = false;
            }
            self.revision += 1;
        }
        self.boxed.clear();
    }

    /// Drop `id` after it was removed from the store.
    pub fn forget(&mut self, id: &SpanId) {
        self.boxed.remove(id);
        if self.selected.remove(id) {
            self.revision += 1;
        }
    }

    /// Drop every id no longer present in the store.
    pub fn retain_existing(&mut self, store: &SpanStore) {
        let before = self.selected.len();
        self.selected.retain(|id| store.contains(id));
        self.boxed.retain(|id| store.contains(id));
        if self.selected.len() != before {
            self.revision += 1;
        }
    }

    fn mark(&mut self, store: &mut SpanStore, id: SpanId) -> bool {
        let Some(span) = store.get_mut(&id) else {
            return false;
        };
        span.selected = true;
        if self.selected.insert(id) {
            self.revision += 1;
        }
        true
    }

    fn unmark(&mut self, store: &mut SpanStore, id: SpanId) {
        if let Some(span) = store.get_mut(&id) {
            span.selected = false;
        }
        self.boxed.remove(&id);
        if self.selected.remove(&id) {
            self.revision += 1;
        }
    }

    // ── Box selection ───────────────────────────────────────────

    /// Reconcile the selection against a live box (client space): spans it
    /// overlaps are added and tagged boxed; boxed spans it no longer overlaps
    /// are removed again.
    pub fn preview_box(&mut self, store: &mut SpanStore, rect: Rect, view_to_client: &Affine) {
        let mut hits = Vec::new();
        let mut misses = Vec::new();
        for span in store.sorted_spans() {
            let Some(local) = span.local_bounds() else {
                continue;
            };
            let on_screen = local.transformed(&view_to_client.compose(&span.transform));
            if overlaps(&rect, &on_screen) {
                hits.push(span.id);
            } else {
                misses.push(span.id);
            }
        }
        for id in hits {
            if !self.selected.contains(&id) && self.mark(store, id) {
                self.boxed.insert(id);
            }
        }
        for id in misses {
            if self.boxed.contains(&id) {
                self.unmark(store, id);
            }
        }
    }

    /// Select every span overlapping `rect` (view space) in one step.
    pub fn box_select(&mut self, store: &mut SpanStore, rect: Rect, view_to_client: &Affine, additive: bool) {
        if !additive {
            self.clear(store);
        }
        self.preview_box(store, rect.transformed(view_to_client), view_to_client);
        self.boxed.clear();
    }

    #[must_use]
    pub fn drag(&self) -> Option<BoxDrag> {
        self.drag
    }

    /// Start a rubber-band drag at `client`.
    pub fn begin_drag(&mut self, client: Point) {
        self.drag = Some(BoxDrag { start: client, current: client });
        self.boxed.clear();
    }

    /// Extend the drag to `client`, previewing the box selection when `live`.
    pub fn drag_to(&mut self, store: &mut SpanStore, client: Point, view_to_client: &Affine, live: bool) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.current = client;
        let rect = drag.rect();
        if live {
            self.preview_box(store, rect, view_to_client);
        }
    }

    /// Finish the drag, committing boxed spans. Returns the final box in client space.
    pub fn end_drag(&mut self) -> Option<Rect> {
        self.boxed.clear();
        self.drag.take().map(|drag| drag.rect())
    }

    // ── Bounds ──────────────────────────────────────────────────

    /// Union of the selected spans' transformed bounds in view space; `None` when
    /// nothing is selected.
    #[must_use]
    pub fn aggregate_bounds(&self, store: &SpanStore) -> Option<Rect> {
        self.selected
            .iter()
            .filter_map(|id| store.get(id))
            .filter_map(crate::store::Span::bounds)
            .reduce(|acc, r| acc.union(&r))
    }
}
