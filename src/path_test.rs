#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn polyline() -> Path {
    Path::new(vec![
        PathCommand { op: PathOp::Move, points: vec![pt(0.0, 0.0)] },
        PathCommand { op: PathOp::Line, points: vec![pt(3.0, 4.0), pt(3.0, 10.0)] },
    ])
    .unwrap()
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn parse_simple_line() {
    let path = parse_path("M10,20 L110,20").unwrap();
    assert_eq!(path, Path::line(pt(10.0, 20.0), pt(110.0, 20.0)));
}

#[test]
fn parse_multi_point_command() {
    let path = parse_path("M0,0 L3,4,3,10").unwrap();
    assert_eq!(path, polyline());
}

#[test]
fn parse_tolerates_extra_whitespace() {
    let path = parse_path("  M1.5,-2   L3,4\n").unwrap();
    assert_eq!(path.point(0, 0), Some(pt(1.5, -2.0)));
    assert_eq!(path.point(1, 0), Some(pt(3.0, 4.0)));
}

#[test]
fn parse_rejects_unknown_command() {
    let err = parse_path("M0,0 Q1,1,2,2").unwrap_err();
    match err {
        EditorError::MalformedPath { token, .. } => assert_eq!(token, "Q1,1,2,2"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn parse_rejects_relative_commands() {
    assert!(parse_path("m0,0 l1,1").is_err());
}

#[test]
fn parse_rejects_odd_coordinates() {
    assert!(parse_path("M0,0 L1").is_err());
}

#[test]
fn parse_rejects_garbage_coordinate() {
    assert!(parse_path("M0,abc").is_err());
}

#[test]
fn parse_rejects_non_finite() {
    assert!(parse_path("M0,NaN").is_err());
    assert!(parse_path("M0,inf").is_err());
}

#[test]
fn parse_rejects_bare_command() {
    assert!(parse_path("M").is_err());
}

#[test]
fn parse_rejects_empty() {
    assert!(parse_path("").is_err());
    assert!(parse_path("   ").is_err());
}

// =============================================================
// Formatting and round trip
// =============================================================

#[test]
fn format_simple_line() {
    assert_eq!(format_path(&Path::line(pt(10.0, 20.0), pt(110.5, 20.0))), "M10,20 L110.5,20");
}

#[test]
fn format_multi_point_command() {
    assert_eq!(format_path(&polyline()), "M0,0 L3,4,3,10");
}

#[test]
fn round_trip_preserves_awkward_floats() {
    let path = Path::new(vec![
        PathCommand { op: PathOp::Move, points: vec![pt(0.1 + 0.2, -1e-7)] },
        PathCommand { op: PathOp::Line, points: vec![pt(1.0 / 3.0, 12_345_678.901), pt(-0.0, 2.5e10)] },
        PathCommand { op: PathOp::Move, points: vec![pt(7.0, 7.0)] },
        PathCommand { op: PathOp::Line, points: vec![pt(f64::MIN_POSITIVE, 9.999_999_999)] },
    ])
    .unwrap();
    assert_eq!(parse_path(&format_path(&path)).unwrap(), path);
}

#[test]
fn serde_uses_text_form() {
    let path = Path::line(pt(1.0, 2.0), pt(3.0, 4.0));
    let json = serde_json::to_string(&path).unwrap();
    assert_eq!(json, "\"M1,2 L3,4\"");
    let back: Path = serde_json::from_str(&json).unwrap();
    assert_eq!(back, path);
}

#[test]
fn serde_rejects_malformed_text() {
    assert!(serde_json::from_str::<Path>("\"M1,2 Z\"").is_err());
}

// =============================================================
// Construction and editing
// =============================================================

#[test]
fn new_rejects_empty_command_list() {
    assert!(Path::new(Vec::new()).is_err());
}

#[test]
fn new_rejects_pointless_command() {
    assert!(Path::new(vec![PathCommand { op: PathOp::Move, points: Vec::new() }]).is_err());
}

#[test]
fn set_point_changes_only_coordinates() {
    let mut path = polyline();
    assert!(path.set_point(1, 1, pt(8.0, 8.0)));
    assert_eq!(path.commands().len(), 2);
    assert_eq!(path.commands()[1].points.len(), 2);
    assert_eq!(path.point(1, 1), Some(pt(8.0, 8.0)));
}

#[test]
fn set_point_out_of_range_is_rejected() {
    let mut path = polyline();
    assert!(!path.set_point(5, 0, pt(1.0, 1.0)));
    assert!(!path.set_point(0, 3, pt(1.0, 1.0)));
    assert_eq!(path, polyline());
}

#[test]
fn set_point_rejects_non_finite() {
    let mut path = polyline();
    assert!(!path.set_point(0, 0, pt(f64::NAN, 0.0)));
    assert_eq!(path, polyline());
}

#[test]
fn simple_line_detection() {
    assert!(Path::line(pt(0.0, 0.0), pt(1.0, 0.0)).is_simple_line());
    assert!(!polyline().is_simple_line());
}

// =============================================================
// Measurement
// =============================================================

#[test]
fn length_of_line() {
    assert_eq!(Path::line(pt(0.0, 0.0), pt(3.0, 4.0)).length(), 5.0);
}

#[test]
fn length_of_polyline() {
    assert_eq!(polyline().length(), 11.0);
}

#[test]
fn length_skips_moves() {
    let path = parse_path("M0,0 L10,0 M100,100 L100,110").unwrap();
    assert_eq!(path.length(), 20.0);
}

#[test]
fn extra_move_points_draw_lines() {
    let path = parse_path("M0,0,0,5").unwrap();
    assert_eq!(path.length(), 5.0);
}

#[test]
fn bounds_cover_all_points() {
    let b = polyline().bounds().unwrap();
    assert_eq!(b, Rect { x: 0.0, y: 0.0, width: 3.0, height: 10.0 });
}
