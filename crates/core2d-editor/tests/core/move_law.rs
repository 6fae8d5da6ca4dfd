use core2d_editor::{Point2, ShapeDefaults, ShapeState, ShapeStore};
use proptest::prelude::*;

fn close(a: Point2, b: Point2) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

proptest! {
    #[test]
    fn move_translates_every_owned_point(
        x1 in -1000.0f64..1000.0,
        y1 in -1000.0f64..1000.0,
        x2 in -1000.0f64..1000.0,
        y2 in -1000.0f64..1000.0,
        dx in -500.0f64..500.0,
        dy in -500.0f64..500.0,
    ) {
        let mut store = ShapeStore::new();
        let line = store.create_line(Point2::new(x1, y1), Point2::new(x2, y2), ShapeDefaults::default());
        let points = store.get(line).unwrap().kind.own_points();

        store.move_shapes(&[line], dx, dy);

        prop_assert!(close(store.point(points[0]).unwrap(), Point2::new(x1 + dx, y1 + dy)));
        prop_assert!(close(store.point(points[1]).unwrap(), Point2::new(x2 + dx, y2 + dy)));
    }

    #[test]
    fn move_leaves_connector_points(
        dx in -500.0f64..500.0,
        dy in -500.0f64..500.0,
    ) {
        let mut store = ShapeStore::new();
        let line = store.create_line(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0), ShapeDefaults::default());
        let points = store.get(line).unwrap().kind.own_points();
        store.get_mut(points[1]).unwrap().state |= ShapeState::CONNECTOR;

        store.move_shapes(&[line], dx, dy);

        prop_assert!(close(store.point(points[0]).unwrap(), Point2::new(dx, dy)));
        prop_assert_eq!(store.point(points[1]).unwrap(), Point2::new(10.0, 10.0));
    }

    #[test]
    fn shared_point_moves_once(dx in 1.0f64..100.0) {
        let mut store = ShapeStore::new();
        let a = store.create_point(0.0, 0.0);
        let b = store.create_point(10.0, 0.0);
        let c = store.create_point(20.0, 0.0);
        let first = store.create_line_between(a, b, ShapeDefaults::default());
        let second = store.create_line_between(b, c, ShapeDefaults::default());

        store.move_shapes(&[first, second], dx, 0.0);

        prop_assert!(close(store.point(b).unwrap(), Point2::new(10.0 + dx, 0.0)));
    }
}
