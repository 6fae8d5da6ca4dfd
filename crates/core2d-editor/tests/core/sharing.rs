use core2d_editor::{Point2, ShapeDefaults, ShapeKind, ShapeStore};

#[test]
fn test_duplicate_keeps_shared_point_shared() {
    let mut store = ShapeStore::new();
    let style = store.create_style("Shared");
    let defaults = ShapeDefaults {
        style: Some(style),
        ..ShapeDefaults::default()
    };
    let a = store.create_point(0.0, 0.0);
    let b = store.create_point(10.0, 0.0);
    let c = store.create_point(10.0, 10.0);
    let first = store.create_line_between(a, b, defaults);
    let second = store.create_line_between(b, c, defaults);

    let copies = store.duplicate(&[first, second]);
    assert_eq!(copies.len(), 2);
    let first_points = store.get(copies[0]).unwrap().kind.own_points();
    let second_points = store.get(copies[1]).unwrap().kind.own_points();
    assert_eq!(first_points[1], second_points[0]);
    assert_ne!(first_points[1], b);
    assert_eq!(store.point(first_points[1]), Some(Point2::new(10.0, 0.0)));

    // Identical styles are reused rather than copied.
    assert_eq!(store.get(copies[0]).unwrap().style, Some(style));
    assert_eq!(store.get(copies[1]).unwrap().style, Some(style));
}

#[test]
fn test_fragment_json_round_trip_keeps_sharing() {
    let mut store = ShapeStore::new();
    let a = store.create_point(0.0, 0.0);
    let b = store.create_point(5.0, 5.0);
    let c = store.create_point(10.0, 0.0);
    let first = store.create_line_between(a, b, ShapeDefaults::default());
    let second = store.create_line_between(b, c, ShapeDefaults::default());
    let group = store.create_group("Pair", vec![first, second], vec![]);

    let fragment = store.export_fragment(&[group], &[]);
    let json = serde_json::to_string(&fragment).unwrap();
    let restored: core2d_editor::ShapeFragment = serde_json::from_str(&json).unwrap();

    let mut target = ShapeStore::new();
    let roots = target.import_fragment(&restored);
    let ShapeKind::Group(copy) = &target.get(roots[0]).unwrap().kind else {
        panic!("expected a group");
    };
    let lines: Vec<_> = copy
        .shapes
        .iter()
        .map(|id| target.get(*id).unwrap().kind.own_points())
        .collect();
    assert_eq!(lines[0][1], lines[1][0]);
    assert_eq!(target.get_points(roots[0]).len(), 3);
}
