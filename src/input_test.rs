use super::*;

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_pan() {
    assert_eq!(Tool::default(), Tool::Pan);
}

#[test]
fn tool_resting_cursors() {
    assert_eq!(Tool::Pan.resting_cursor(), CursorStyle::Grab);
    assert_eq!(Tool::Text.resting_cursor(), CursorStyle::Crosshair);
    assert_eq!(Tool::Select.resting_cursor(), CursorStyle::Auto);
    assert_eq!(Tool::Path.resting_cursor(), CursorStyle::Crosshair);
    assert_eq!(Tool::Measure.resting_cursor(), CursorStyle::Crosshair);
}

#[test]
fn tool_shortcuts() {
    assert_eq!(Tool::from_shortcut("h"), Some(Tool::Pan));
    assert_eq!(Tool::from_shortcut("T"), Some(Tool::Text));
    assert_eq!(Tool::from_shortcut("v"), Some(Tool::Select));
    assert_eq!(Tool::from_shortcut("p"), Some(Tool::Path));
    assert_eq!(Tool::from_shortcut("M"), Some(Tool::Measure));
    assert_eq!(Tool::from_shortcut("x"), None);
}

#[test]
fn tool_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Tool::Select).unwrap(), "\"select\"");
    let back: Tool = serde_json::from_str("\"text\"").unwrap();
    assert_eq!(back, Tool::Text);
}

// =============================================================
// Cursor
// =============================================================

#[test]
fn cursor_css_keywords() {
    assert_eq!(CursorStyle::Grabbing.as_css(), "grabbing");
    assert_eq!(CursorStyle::Crosshair.as_css(), "crosshair");
}

// =============================================================
// Buttons
// =============================================================

#[test]
fn button_from_dom() {
    assert_eq!(Button::from_dom(0), Button::Primary);
    assert_eq!(Button::from_dom(1), Button::Middle);
    assert_eq!(Button::from_dom(2), Button::Secondary);
}

#[test]
fn buttons_mask_bits() {
    let held = Buttons(Buttons::PRIMARY.0 | Buttons::MIDDLE.0);
    assert!(held.primary());
    assert!(held.middle());
    assert!(!held.secondary());
    assert!(!Buttons::NONE.primary());
}

// =============================================================
// Target / PointerInput
// =============================================================

#[test]
fn target_span_accessor() {
    let id = uuid::Uuid::new_v4();
    assert_eq!(Target::Span(id).span(), Some(id));
    assert_eq!(Target::Background.span(), None);
    assert_eq!(Target::TextInput.span(), None);
}

#[test]
fn pointer_input_defaults() {
    let ev = PointerInput::new(Point::new(1.0, 2.0), Button::Primary, Buttons::PRIMARY, Target::Background, 10.0);
    assert!(!ev.double_click);
    assert_eq!(ev.modifiers, Modifiers::default());
    let shifted = ev.with_modifiers(Modifiers { shift: true, ..Modifiers::default() });
    assert!(shifted.modifiers.shift);
}
