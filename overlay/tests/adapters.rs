use overlay::geometry::intersect::segment_horizontal_ray_crossings;
use overlay::{
    path_boolean, path_from_path_data, path_to_path_data, BoolOp, FillRule, Path, PathDataError, Segment, Vec2,
};

fn inside(path: &Path, x: f64, y: f64) -> bool {
    let p = Vec2::new(x, y);
    let crossings: usize = path.iter().map(|seg| segment_horizontal_ray_crossings(seg, p)).sum();
    crossings % 2 == 1
}

#[test]
fn boolean_over_path_data_strings() {
    let a = path_from_path_data("M 0 0 L 10 0 L 10 10 L 0 10 Z").unwrap();
    let b = path_from_path_data("M 5 5 L 15 5 L 15 15 L 5 15 Z").unwrap();
    let out = path_boolean(&a, FillRule::NonZero, &b, FillRule::NonZero, BoolOp::Intersection).unwrap();
    assert_eq!(out.len(), 1);

    let d = path_to_path_data(&out[0], 1e-4);
    assert!(d.starts_with('M'), "{d}");
    let reparsed = path_from_path_data(&d).unwrap();
    assert!(inside(&reparsed, 7.5, 7.5));
    assert!(!inside(&reparsed, 2.0, 2.0));
}

#[test]
fn multi_subpath_output_roundtrips() {
    let a = path_from_path_data("M 0 0 H 10 V 10 H 0 Z").unwrap();
    let b = path_from_path_data("M 20 0 h 10 v 10 h -10 z").unwrap();
    let union = path_boolean(&a, FillRule::NonZero, &b, FillRule::NonZero, BoolOp::Union).unwrap();
    let d = path_to_path_data(&union[0], 1e-4);
    // Two disjoint loops: the formatter must re-derive the second move.
    assert_eq!(d.matches('M').count(), 2, "{d}");
    let reparsed = path_from_path_data(&d).unwrap();
    assert!(inside(&reparsed, 5.0, 5.0));
    assert!(inside(&reparsed, 25.0, 5.0));
    assert!(!inside(&reparsed, 15.0, 5.0));
}

#[test]
fn curved_input_survives_the_trip() {
    // Circle from two arc halves against a cubic-cornered rounded square.
    let a = path_from_path_data("M 10 0 A 10 10 0 0 1 -10 0 A 10 10 0 0 1 10 0 Z").unwrap();
    let b = path_from_path_data("M 0 -5 C 8 -5 8 -5 8 3 C 8 11 8 11 0 11 C -8 11 -8 11 -8 3 C -8 -5 -8 -5 0 -5 Z").unwrap();
    for op in [BoolOp::Union, BoolOp::Intersection, BoolOp::Difference] {
        let out = path_boolean(&a, FillRule::NonZero, &b, FillRule::NonZero, op).unwrap();
        let d = path_to_path_data(&out[0], 1e-4);
        let reparsed = path_from_path_data(&d).unwrap();
        assert_eq!(reparsed.len(), out[0].len(), "formatting must not drop segments");
    }
}

#[test]
fn bad_sequences_surface_one_error_kind() {
    assert!(matches!(path_from_path_data("L 0 0"), Err(PathDataError::BadSequence(_))));
    let commands = overlay::commands_from_path_data("Z").unwrap();
    assert!(matches!(
        overlay::path_from_commands(&commands),
        Err(PathDataError::BadSequence(_))
    ));
}

#[test]
fn segments_serialize_for_fixtures() {
    let path = path_from_path_data("M 0 0 Q 5 -5 10 0 A 3 4 30 1 0 0 0 Z").unwrap();
    let json = serde_json::to_string(&path).unwrap();
    let back: Vec<Segment> = serde_json::from_str(&json).unwrap();
    assert_eq!(path, back);
}
