use core2d_editor::path::{self, to_svg_path_data, Outline};
use core2d_editor::{Editor, PathConversion, PathOp, Point2, ShapeDefaults, ShapeKind, ShapeStore};

fn filled() -> ShapeDefaults {
    ShapeDefaults {
        is_filled: true,
        ..ShapeDefaults::default()
    }
}

#[test]
fn test_union_of_disjoint_rectangles_keeps_two_figures() {
    let mut store = ShapeStore::new();
    let a = store.create_rectangle(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0), filled());
    let b = store.create_rectangle(Point2::new(20.0, 0.0), Point2::new(30.0, 10.0), filled());

    let fragment = path::op(&store, &[a, b], PathOp::Union).unwrap();
    let roots = store.import_fragment(&fragment);
    let ShapeKind::Path(result) = &store.get(roots[0]).unwrap().kind else {
        panic!("expected a path");
    };
    assert_eq!(result.geometry.figures.len(), 2);
    assert!(result.geometry.figures.iter().all(|f| f.is_closed));
}

#[test]
fn test_exclude_cuts_hole() {
    let mut store = ShapeStore::new();
    let outer = store.create_rectangle(Point2::new(0.0, 0.0), Point2::new(30.0, 30.0), filled());
    let inner = store.create_rectangle(Point2::new(10.0, 10.0), Point2::new(20.0, 20.0), filled());

    let fragment = path::op(&store, &[outer, inner], PathOp::Exclude).unwrap();
    let roots = store.import_fragment(&fragment);
    let ShapeKind::Path(result) = &store.get(roots[0]).unwrap().kind else {
        panic!("expected a path");
    };
    assert_eq!(result.geometry.figures.len(), 2);
}

#[test]
fn test_svg_path_data_round_trip_through_editor() {
    let mut editor = Editor::default();
    editor.new_project("Svg");
    let id = editor
        .insert_svg_path("M 0 0 L 40 0 L 40 20 L 0 20 Z")
        .unwrap();
    let store = &editor.project().unwrap().store;
    let ShapeKind::Path(shape) = &store.get(id).unwrap().kind else {
        panic!("expected a path");
    };
    let outline = Outline::from_geometry(store, &shape.geometry).unwrap();
    let data = to_svg_path_data(&outline);
    assert!(data.starts_with("M0,0 L40,0"), "{}", data);
    assert!(data.ends_with('Z'), "{}", data);
}

#[test]
fn test_stroke_conversion_of_line() {
    let mut editor = Editor::default();
    editor.new_project("Stroke");
    let project = editor.project_mut().unwrap();
    let layer = project.current_layer_id().unwrap();
    let line = project.store.create_line(
        Point2::new(0.0, 0.0),
        Point2::new(100.0, 0.0),
        ShapeDefaults::default(),
    );
    project.add_shapes(layer, &[line]).unwrap();
    editor.select(&[line]);

    assert_eq!(editor.convert_selection(PathConversion::Stroke), 1);
    let converted = editor.selection()[0];
    let bounds = editor.project().unwrap().store.bounds(converted).unwrap();
    assert!(bounds.height > 0.0);
    assert!(bounds.width > 99.0);
}
