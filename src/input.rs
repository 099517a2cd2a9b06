//! Input model: tools, modifier keys, buttons, hit targets, and cursor hints.
//!
//! These are the types the host fills from raw DOM events. Hit-testing stays in
//! the host (it knows which SVG element was under the pointer); it reports the
//! result as a [`Target`]. All pointer positions are in client space.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geom::Point;
use crate::handles::HandleEdge;
use crate::store::SpanId;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Drag to pan the page (default).
    #[default]
    Pan,
    /// Drag a box to start a new transcription.
    Text,
    /// Click or rubber-band to select spans; drag to move them.
    Select,
    /// Drag a baseline, then type the text laid along it.
    Path,
    /// Drag a line across a letter to set the font size for new spans.
    Measure,
}

impl Tool {
    /// Cursor shown while the tool is idle.
    #[must_use]
    pub fn resting_cursor(self) -> CursorStyle {
        match self {
            Self::Pan => CursorStyle::Grab,
            Self::Text | Self::Path | Self::Measure => CursorStyle::Crosshair,
            Self::Select => CursorStyle::Auto,
        }
    }

    /// Tool bound to a single-key shortcut, if any.
    #[must_use]
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key {
            "h" | "H" => Some(Self::Pan),
            "t" | "T" => Some(Self::Text),
            "v" | "V" => Some(Self::Select),
            "p" | "P" => Some(Self::Path),
            "m" | "M" => Some(Self::Measure),
            _ => None,
        }
    }
}

/// Pointer cursor hint for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorStyle {
    Auto,
    Grab,
    Grabbing,
    Crosshair,
}

impl CursorStyle {
    /// CSS `cursor` keyword.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Crosshair => "crosshair",
        }
    }
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// The button whose state changed in a pointer-down / pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

impl Button {
    /// Map a DOM `PointerEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Buttons held during a pointer event, as the DOM `buttons` bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons(pub u16);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const PRIMARY: Buttons = Buttons(1);
    pub const SECONDARY: Buttons = Buttons(2);
    pub const MIDDLE: Buttons = Buttons(4);

    #[must_use]
    pub fn primary(self) -> bool {
        self.0 & Self::PRIMARY.0 != 0
    }

    #[must_use]
    pub fn secondary(self) -> bool {
        self.0 & Self::SECONDARY.0 != 0
    }

    #[must_use]
    pub fn middle(self) -> bool {
        self.0 & Self::MIDDLE.0 != 0
    }
}

/// What the pointer hit, as reported by the host's hit-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Empty page area (or the page image).
    #[default]
    Background,
    /// Any part of a rendered span.
    Span(SpanId),
    /// A control-point handle of the span under path edit.
    PathHandle { command: usize, point: usize },
    /// One of the selection's scale handles.
    ScaleHandle(HandleEdge),
    /// The inline text-entry overlay itself.
    TextInput,
}

impl Target {
    #[must_use]
    pub fn span(self) -> Option<SpanId> {
        match self {
            Self::Span(id) => Some(id),
            _ => None,
        }
    }
}

/// A pointer-down, pointer-move, or pointer-up.
#[derive(Debug, Clone, Copy)]
pub struct PointerInput {
    /// Position in client space.
    pub client: Point,
    /// Button that changed (meaningful for down/up).
    pub button: Button,
    /// Buttons currently held.
    pub buttons: Buttons,
    pub modifiers: Modifiers,
    pub target: Target,
    /// Host clock in milliseconds.
    pub now_ms: f64,
    /// Set by the engine when this press completes a double-click on a span.
    pub double_click: bool,
}

impl PointerInput {
    #[must_use]
    pub fn new(client: Point, button: Button, buttons: Buttons, target: Target, now_ms: f64) -> Self {
        Self { client, button, buttons, modifiers: Modifiers::default(), target, now_ms, double_click: false }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Wheel / trackpad scroll delta in pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive is scrolling down.
    pub dy: f64,
}

/// A keyboard key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
