use core2d_editor::{Editor, Point2, ShapeDefaults, ShapeId, ShapeKind};

struct Scene {
    editor: Editor,
    first: ShapeId,
    second: ShapeId,
    third: ShapeId,
    shared: ShapeId,
}

/// Three lines, the first two joined at (10,0).
fn scene() -> Scene {
    let mut editor = Editor::default();
    editor.new_project("Grouping");
    let project = editor.project_mut().unwrap();
    project.options.snap_to_grid = false;
    let layer = project.current_layer_id().unwrap();
    let store = &mut project.store;
    let a = store.create_point(0.0, 0.0);
    let shared = store.create_point(10.0, 0.0);
    let b = store.create_point(20.0, 0.0);
    let first = store.create_line_between(a, shared, ShapeDefaults::default());
    let second = store.create_line_between(shared, b, ShapeDefaults::default());
    let third = store.create_line(
        Point2::new(0.0, 30.0),
        Point2::new(20.0, 30.0),
        ShapeDefaults::default(),
    );
    project.add_shapes(layer, &[first, second, third]).unwrap();
    project.history.reset();
    Scene {
        editor,
        first,
        second,
        third,
        shared,
    }
}

fn layer(editor: &Editor) -> Vec<ShapeId> {
    editor
        .project()
        .unwrap()
        .current_layer()
        .unwrap()
        .shapes
        .clone()
}

#[test]
fn test_moving_group_drags_shared_endpoint() {
    let Scene {
        mut editor,
        first,
        second,
        shared,
        ..
    } = scene();
    editor.select(&[first]);
    let group = editor.group_selected("Left").unwrap();

    let store = &editor.project().unwrap().store;
    assert!(store.get(shared).unwrap().is_connector());
    let ShapeKind::Group(g) = &store.get(group).unwrap().kind else {
        panic!("expected a group");
    };
    assert_eq!(g.connectors, vec![shared]);

    assert!(editor.move_selection(5.0, 0.0));
    let store = &editor.project().unwrap().store;
    assert_eq!(store.point(shared), Some(Point2::new(15.0, 0.0)));
    let second_points = store.get(second).unwrap().kind.own_points();
    assert_eq!(second_points[0], shared);
    assert_eq!(store.point(second_points[1]), Some(Point2::new(20.0, 0.0)));
}

#[test]
fn test_ungroup_is_inverse_of_group() {
    let Scene {
        mut editor,
        first,
        second,
        third,
        shared,
    } = scene();
    editor.select(&[first, third]);
    let group = editor.group_selected("Outer").unwrap();
    assert_eq!(layer(&editor), vec![second, group]);

    assert!(editor.ungroup_selected());
    assert_eq!(layer(&editor), vec![second, first, third]);
    let store = &editor.project().unwrap().store;
    assert!(!store.get(shared).unwrap().is_connector());

    assert!(editor.undo());
    assert!(editor.undo());
    assert_eq!(layer(&editor), vec![first, second, third]);
    assert!(!editor.can_undo());
}
