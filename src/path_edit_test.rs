#![allow(clippy::float_cmp)]

use super::*;
use crate::path::{parse_path, Path};
use crate::store::Span;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn add_span(store: &mut SpanStore, path: Path, transform: Affine) -> SpanId {
    let span = Span {
        id: uuid::Uuid::new_v4(),
        transform,
        text_length: path.length(),
        path,
        text: "abc".into(),
        lang: "en".into(),
        font: "20px serif".into(),
        ascent: 16.0,
        descent: 4.0,
        default_path: true,
        selected: true,
        z: 0,
    };
    let id = span.id;
    store.insert(span);
    id
}

fn line_span(store: &mut SpanStore, transform: Affine) -> SpanId {
    add_span(store, Path::line(pt(0.0, 0.0), pt(100.0, 0.0)), transform)
}

// =============================================================
// Activation and handles
// =============================================================

#[test]
fn inactive_controller_has_no_handles() {
    let mut store = SpanStore::new();
    line_span(&mut store, Affine::IDENTITY);
    assert!(PathEdit::new().handles(&store).is_empty());
}

#[test]
fn one_handle_per_point_in_view_space() {
    let mut store = SpanStore::new();
    let path = parse_path("M0,0 L10,0,10,10").unwrap();
    let id = add_span(&mut store, path, Affine::translate(5.0, 5.0).compose(&Affine::scale(2.0, 2.0)));
    let mut edit = PathEdit::new();
    edit.activate(id);
    let handles = edit.handles(&store);
    assert_eq!(handles.len(), 3);
    assert_eq!(handles[0], PathHandle { command: 0, point: 0, position: pt(5.0, 5.0) });
    assert_eq!(handles[2], PathHandle { command: 1, point: 1, position: pt(25.0, 25.0) });
}

#[test]
fn deactivate_clears_handles_and_grab() {
    let mut store = SpanStore::new();
    let id = line_span(&mut store, Affine::IDENTITY);
    let mut edit = PathEdit::new();
    edit.activate(id);
    assert!(edit.begin_drag(&store, 1, 0, pt(100.0, 0.0)));
    edit.deactivate();
    assert!(edit.handles(&store).is_empty());
    assert!(!edit.is_dragging());
}

#[test]
fn begin_drag_rejects_missing_point() {
    let mut store = SpanStore::new();
    let id = line_span(&mut store, Affine::IDENTITY);
    let mut edit = PathEdit::new();
    assert!(!edit.begin_drag(&store, 0, 0, pt(0.0, 0.0)));
    edit.activate(id);
    assert!(!edit.begin_drag(&store, 4, 0, pt(0.0, 0.0)));
    assert!(!edit.begin_drag(&store, 0, 1, pt(0.0, 0.0)));
}

// =============================================================
// Dragging
// =============================================================

#[test]
fn drag_divides_out_view_then_span_scale() {
    let mut store = SpanStore::new();
    let id = line_span(&mut store, Affine::scale(2.0, 2.0));
    let mut edit = PathEdit::new();
    edit.activate(id);
    edit.begin_drag(&store, 1, 0, pt(400.0, 0.0));

    // View is zoomed 2x on screen, span 2x in view: 40 client px = 10 local units.
    let view_to_client = Affine::scale(2.0, 2.0);
    let edited = edit.drag_to(&mut store, pt(440.0, -40.0), &view_to_client).unwrap();
    assert_eq!(edited, Some(id));

    let span = store.get(&id).unwrap();
    assert_eq!(span.path.point(1, 0), Some(pt(110.0, -10.0)));
    assert!(!span.default_path);
    assert!(approx_eq(span.text_length, span.path.length()));
    assert!(approx_eq(span.text_length, 110.0_f64.hypot(10.0)));
}

#[test]
fn drag_respects_vertical_only_span_scale() {
    let mut store = SpanStore::new();
    let id = line_span(&mut store, Affine::scale(1.0, 4.0));
    let mut edit = PathEdit::new();
    edit.activate(id);
    edit.begin_drag(&store, 0, 0, pt(0.0, 0.0));
    edit.drag_to(&mut store, pt(8.0, 8.0), &Affine::IDENTITY).unwrap();
    assert_eq!(store.get(&id).unwrap().path.point(0, 0), Some(pt(8.0, 2.0)));
}

#[test]
fn drag_keeps_command_and_point_counts() {
    let mut store = SpanStore::new();
    let id = add_span(&mut store, parse_path("M0,0 L10,0,20,0 M30,0 L40,0").unwrap(), Affine::IDENTITY);
    let mut edit = PathEdit::new();
    edit.activate(id);
    edit.begin_drag(&store, 1, 1, pt(20.0, 0.0));
    edit.drag_to(&mut store, pt(25.0, 5.0), &Affine::IDENTITY).unwrap();
    edit.drag_to(&mut store, pt(30.0, 9.0), &Affine::IDENTITY).unwrap();
    let path = &store.get(&id).unwrap().path;
    let shape: Vec<usize> = path.commands().iter().map(|c| c.points.len()).collect();
    assert_eq!(shape, vec![1, 2, 1, 1]);
    assert_eq!(path.point(1, 1), Some(pt(30.0, 9.0)));
}

#[test]
fn singular_span_transform_aborts_without_change() {
    let mut store = SpanStore::new();
    let id = line_span(&mut store, Affine::scale(1.0, 0.0));
    let mut edit = PathEdit::new();
    edit.activate(id);
    edit.begin_drag(&store, 1, 0, pt(0.0, 0.0));
    let err = edit.drag_to(&mut store, pt(5.0, 5.0), &Affine::IDENTITY).unwrap_err();
    assert!(matches!(err, EditorError::SingularTransform { .. }));
    let span = store.get(&id).unwrap();
    assert_eq!(span.path, Path::line(pt(0.0, 0.0), pt(100.0, 0.0)));
    assert!(span.default_path);
}

#[test]
fn drag_without_grab_is_noop() {
    let mut store = SpanStore::new();
    let id = line_span(&mut store, Affine::IDENTITY);
    let mut edit = PathEdit::new();
    edit.activate(id);
    assert_eq!(edit.drag_to(&mut store, pt(5.0, 5.0), &Affine::IDENTITY).unwrap(), None);
    assert!(!edit.end_drag());
}
