//! Shared numeric constants for the annotation engine.
//!
//! The `DEFAULT_*` values seed [`crate::config::EditorConfig`]; the rest are
//! fixed tolerances.

// ── Geometry ────────────────────────────────────────────────────

/// Determinants with magnitude below this are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-9;

/// Scale-handle ratios below this would collapse a span to a line.
pub const MIN_SCALE_RATIO: f64 = 1e-3;

// ── Viewport ────────────────────────────────────────────────────

/// Relative zoom per wheel notch.
pub const DEFAULT_ZOOM_FACTOR: f64 = 0.05;

/// Rotation per shift+wheel notch, in degrees.
pub const DEFAULT_ROTATE_STEP_DEG: f64 = 5.0;

/// Window after a two-finger gesture ends during which new gestures are ignored.
pub const DEFAULT_TOUCH_DEBOUNCE_MS: f64 = 200.0;

// ── Text input ──────────────────────────────────────────────────

/// Maximum delay between two presses that still counts as a double-click.
pub const DEFAULT_DOUBLE_CLICK_MS: f64 = 500.0;

/// Maximum client-space distance between two presses of a double-click.
pub const DEFAULT_DOUBLE_CLICK_RADIUS_PX: f64 = 8.0;

/// A drawn text box must exceed this in both dimensions (view units).
pub const DEFAULT_MIN_BOX_SIZE: f64 = 1.0;

/// CSS font shorthand used to measure and render transcriptions.
pub const DEFAULT_FONT: &str = "32px serif";

/// Language tag applied to new spans.
pub const DEFAULT_LANG: &str = "en";

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space radius of path and scale handles, in pixels.
pub const HANDLE_RADIUS_PX: f64 = 8.0;
