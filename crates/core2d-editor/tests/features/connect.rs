use core2d_editor::{Editor, Point2, ShapeDefaults, ShapeId, ShapeKind};

fn endpoints(editor: &Editor, id: ShapeId) -> (Point2, Point2) {
    let store = &editor.project().unwrap().store;
    let points = store.get(id).unwrap().kind.own_points();
    (
        store.point(points[0]).unwrap(),
        store.point(points[1]).unwrap(),
    )
}

/// Two unrelated lines plus a group with horizontal connectors at (10,0)
/// and (90,0) lying on the first line.
fn scene() -> (Editor, ShapeId, ShapeId, Vec<ShapeId>) {
    let mut editor = Editor::default();
    editor.new_project("Connect");
    let project = editor.project_mut().unwrap();
    let layer = project.current_layer_id().unwrap();
    let store = &mut project.store;
    let wire = store.create_line(
        Point2::new(0.0, 0.0),
        Point2::new(100.0, 0.0),
        ShapeDefaults::default(),
    );
    let other = store.create_line(
        Point2::new(0.0, 40.0),
        Point2::new(100.0, 40.0),
        ShapeDefaults::default(),
    );
    let c1 = store.create_point(10.0, 0.0);
    let c2 = store.create_point(90.0, 0.0);
    let body = store.create_rectangle(
        Point2::new(10.0, -5.0),
        Point2::new(90.0, 5.0),
        ShapeDefaults::default(),
    );
    let group = store.create_group("Part", vec![body], vec![c1, c2]);
    project.add_shapes(layer, &[wire, other, group]).unwrap();
    (editor, wire, other, vec![c1, c2])
}

#[test]
fn test_connect_lines_splits_wire_at_connectors() {
    let (mut editor, wire, other, connectors) = scene();
    assert!(editor.try_to_connect_lines(&connectors));

    let shapes = editor
        .project()
        .unwrap()
        .current_layer()
        .unwrap()
        .shapes
        .clone();
    assert_eq!(shapes.len(), 4);
    assert!(!shapes.contains(&wire));
    assert_eq!(shapes[2], other);

    assert_eq!(
        endpoints(&editor, shapes[0]),
        (Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))
    );
    assert_eq!(
        endpoints(&editor, shapes[1]),
        (Point2::new(90.0, 0.0), Point2::new(100.0, 0.0))
    );

    let store = &editor.project().unwrap().store;
    let left = store.get(shapes[0]).unwrap();
    let right = store.get(shapes[1]).unwrap();
    match (&left.kind, &right.kind) {
        (ShapeKind::Line(l), ShapeKind::Line(r)) => {
            assert_eq!(l.end, connectors[0]);
            assert_eq!(r.start, connectors[1]);
        }
        _ => panic!("expected two lines"),
    }
}

#[test]
fn test_connect_lines_is_one_undo_step() {
    let (mut editor, wire, other, connectors) = scene();
    assert!(editor.try_to_connect_lines(&connectors));
    assert!(editor.undo());
    let shapes = &editor.project().unwrap().current_layer().unwrap().shapes;
    assert_eq!(shapes[0], wire);
    assert_eq!(shapes[1], other);
}

#[test]
fn test_connect_lines_without_hits_does_nothing() {
    let (mut editor, ..) = scene();
    let stray = editor.project_mut().unwrap().store.create_point(50.0, 200.0);
    assert!(!editor.try_to_connect_lines(&[stray]));
}
