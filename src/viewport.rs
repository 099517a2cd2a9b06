//! Viewport controller: pan, wheel zoom/rotate, and two-finger touch gestures.
//!
//! The viewport transform maps view space (the page image and every span) into
//! surface space (the root `<svg>`'s user space). The host supplies the screen
//! transform (surface → client) on every call that needs it, since it changes
//! whenever the page scrolls or re-lays out.
//!
//! Transform updates are always pre-multiplied: a gesture computed in surface
//! space is composed on the left of the current viewport transform.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::config::EditorConfig;
use crate::consts::SINGULAR_EPSILON;
use crate::error::EditorError;
use crate::geom::{Affine, Point};
use crate::input::{CursorStyle, Modifiers, WheelDelta};

/// One active touch contact in client space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: i32,
    pub client: Point,
}

/// Reference frame captured when a two-finger gesture starts, in surface space.
#[derive(Debug, Clone, Copy)]
struct TouchGesture {
    start_distance: f64,
    start_angle: f64,
    start_mid: Point,
}

/// Pan/zoom/rotate state for the whole page.
#[derive(Debug, Clone)]
pub struct Viewport {
    transform: Affine,
    pending: Option<Affine>,
    gesture: Option<TouchGesture>,
    touch_blocked_until: f64,
    last_client: Option<Point>,
    cursor: CursorStyle,
    saved_cursor: Option<CursorStyle>,
    zoom_factor: f64,
    rotate_step_deg: f64,
    touch_debounce_ms: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(config: &EditorConfig, cursor: CursorStyle) -> Self {
        Self {
            transform: Affine::IDENTITY,
            pending: None,
            gesture: None,
            touch_blocked_until: f64::NEG_INFINITY,
            last_client: None,
            cursor,
            saved_cursor: None,
            zoom_factor: config.zoom_factor,
            rotate_step_deg: config.rotate_step_deg,
            touch_debounce_ms: config.touch_debounce_ms,
        }
    }

    /// Committed view → surface transform, excluding any in-flight touch gesture.
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// View → surface transform including the in-flight touch gesture.
    #[must_use]
    pub fn effective_transform(&self) -> Affine {
        match self.pending {
            Some(pending) => pending.compose(&self.transform),
            None => self.transform,
        }
    }

    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    /// Back to identity, dropping any in-flight gesture.
    pub fn reset(&mut self) {
        self.transform = Affine::IDENTITY;
        self.pending = None;
        self.gesture = None;
    }

    // ── Coordinate conversion ───────────────────────────────────

    /// View → client transform under `screen`.
    #[must_use]
    pub fn view_to_client(&self, screen: &Affine) -> Affine {
        screen.compose(&self.effective_transform())
    }

    /// Map a client point into view space.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SingularTransform`] if the combined transform cannot be inverted.
    pub fn client_to_view(&self, client: Point, screen: &Affine) -> Result<Point, EditorError> {
        Ok(self.view_to_client(screen).invert()?.apply(client))
    }

    /// Map a client-space displacement into view space.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SingularTransform`] if the combined transform cannot be inverted.
    pub fn client_delta_to_view(&self, delta: Point, screen: &Affine) -> Result<Point, EditorError> {
        Ok(self.view_to_client(screen).invert()?.apply_vector(delta))
    }

    // ── Pointer pan ─────────────────────────────────────────────

    /// Start a drag-pan at `client`. Returns the cursor to show, if it changed.
    pub fn begin_pan(&mut self, client: Point) -> Option<CursorStyle> {
        self.last_client = Some(client);
        self.push_cursor(CursorStyle::Grabbing)
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.last_client.is_some()
    }

    /// Pan so the page follows the pointer to `client`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SingularTransform`] if the screen transform has zero scale.
    pub fn pan_to(&mut self, client: Point, screen: &Affine) -> Result<(), EditorError> {
        let Some(last) = self.last_client else {
            return Ok(());
        };
        let scale = screen.checked_scale_factor()?;
        let delta = client.sub(last);
        self.transform = Affine::translate(delta.x / scale, delta.y / scale).compose(&self.transform);
        self.last_client = Some(client);
        Ok(())
    }

    /// Finish a drag-pan. Returns the restored cursor, if it changed.
    pub fn end_pan(&mut self) -> Option<CursorStyle> {
        self.last_client = None;
        self.pop_cursor()
    }

    // ── Wheel ───────────────────────────────────────────────────

    /// Zoom (or, with shift, rotate) one notch about the cursor. Returns whether
    /// the transform changed.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SingularTransform`] if the screen transform cannot be inverted.
    pub fn wheel(&mut self, client: Point, delta: WheelDelta, modifiers: Modifiers, screen: &Affine) -> Result<bool, EditorError> {
        if delta.dy == 0.0 || !delta.dy.is_finite() {
            return Ok(false);
        }
        let zoom_in = delta.dy < 0.0;
        let origin = screen.invert()?.apply(client);
        let step = if modifiers.shift {
            let deg = if zoom_in { self.rotate_step_deg } else { -self.rotate_step_deg };
            Affine::rotate_deg(deg)
        } else {
            // Zoom out divides by the zoom-in factor so in/out pairs cancel exactly.
            let factor = if zoom_in { 1.0 + self.zoom_factor } else { 1.0 / (1.0 + self.zoom_factor) };
            Affine::scale(factor, factor)
        };
        self.transform = Affine::about(origin, step).compose(&self.transform);
        Ok(true)
    }

    // ── Touch ───────────────────────────────────────────────────

    #[must_use]
    pub fn touch_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Begin a two-finger gesture. Returns whether one started; starts inside the
    /// post-gesture debounce window are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SingularTransform`] if the screen transform cannot be inverted.
    pub fn touch_start(&mut self, touches: &[TouchPoint], screen: &Affine, now_ms: f64) -> Result<bool, EditorError> {
        if self.gesture.is_some() || now_ms < self.touch_blocked_until {
            return Ok(false);
        }
        let [t0, t1] = touches else {
            return Ok(false);
        };
        let to_surface = screen.invert()?;
        let (p0, p1) = (to_surface.apply(t0.client), to_surface.apply(t1.client));
        let start_distance = p0.distance(p1);
        if start_distance < SINGULAR_EPSILON {
            return Ok(false);
        }
        self.gesture = Some(TouchGesture { start_distance, start_angle: angle(p0, p1), start_mid: p0.midpoint(p1) });
        self.pending = Some(Affine::IDENTITY);
        Ok(true)
    }

    /// Update the in-flight gesture from the current two contacts. Returns
    /// whether the effective transform changed.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SingularTransform`] if the screen transform cannot be inverted.
    pub fn touch_move(&mut self, touches: &[TouchPoint], screen: &Affine, now_ms: f64) -> Result<bool, EditorError> {
        let Some(gesture) = self.gesture else {
            return self.touch_start(touches, screen, now_ms);
        };
        let [t0, t1] = touches else {
            return Ok(false);
        };
        let to_surface = screen.invert()?;
        let (p0, p1) = (to_surface.apply(t0.client), to_surface.apply(t1.client));
        let scale = p0.distance(p1) / gesture.start_distance;
        if scale < SINGULAR_EPSILON {
            return Err(EditorError::SingularTransform { det: scale * scale });
        }
        let rotation = (angle(p0, p1) - gesture.start_angle).to_degrees();
        let shift = p0.midpoint(p1).sub(gesture.start_mid);
        let origin = gesture.start_mid;
        let anchored = Affine::translate(origin.x + shift.x, origin.y + shift.y)
            .compose(&Affine::rotate_deg(rotation))
            .compose(&Affine::scale(scale, scale))
            .compose(&Affine::translate(-origin.x, -origin.y));
        self.pending = Some(anchored);
        Ok(true)
    }

    /// End the gesture, committing its delta and arming the debounce window.
    /// Returns whether a gesture was committed.
    pub fn touch_end(&mut self, now_ms: f64) -> bool {
        if self.gesture.take().is_none() {
            return false;
        }
        if let Some(pending) = self.pending.take() {
            self.transform = pending.compose(&self.transform);
        }
        self.touch_blocked_until = now_ms + self.touch_debounce_ms;
        true
    }

    // ── Cursor slot ─────────────────────────────────────────────

    #[must_use]
    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    /// Override the cursor, saving the current one unless an override is already active.
    pub fn push_cursor(&mut self, style: CursorStyle) -> Option<CursorStyle> {
        if self.saved_cursor.is_none() {
            self.saved_cursor = Some(self.cursor);
        }
        self.swap_cursor(style)
    }

    /// Restore the cursor saved by [`Viewport::push_cursor`].
    pub fn pop_cursor(&mut self) -> Option<CursorStyle> {
        let saved = self.saved_cursor.take()?;
        self.swap_cursor(saved)
    }

    /// Change the resting cursor. During an override the new style is restored on pop.
    pub fn set_resting_cursor(&mut self, style: CursorStyle) -> Option<CursorStyle> {
        if self.saved_cursor.is_some() {
            self.saved_cursor = Some(style);
            return None;
        }
        self.swap_cursor(style)
    }

    fn swap_cursor(&mut self, style: CursorStyle) -> Option<CursorStyle> {
        if self.cursor == style {
            return None;
        }
        self.cursor = style;
        Some(style)
    }
}

fn angle(p0: Point, p1: Point) -> f64 {
    (p1.y - p0.y).atan2(p1.x - p0.x)
}
