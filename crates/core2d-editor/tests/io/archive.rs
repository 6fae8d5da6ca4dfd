use core2d_core::StdFileSystem;
use core2d_editor::{Point2, Project, ProjectArchive, ShapeDefaults, ShapeKind};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_archive_round_trip_keeps_shared_points_and_images() {
    let dir = TempDir::new().unwrap();
    let fs = StdFileSystem::new(dir.path());

    let mut project = Project::with_defaults("Archive");
    let layer = project.current_layer_id().unwrap();
    let key = project.images.add_image("photo.png", vec![1, 2, 3, 4]);
    let unused = project.images.add_image("unused.png", vec![9, 9]);
    let shared = project.store.create_point(10.0, 10.0);
    let a = project.store.create_point(0.0, 0.0);
    let b = project.store.create_point(20.0, 0.0);
    let first = project.store.create_line_between(a, shared, ShapeDefaults::default());
    let second = project.store.create_line_between(shared, b, ShapeDefaults::default());
    let image = project.store.create_image(
        Point2::new(0.0, 0.0),
        Point2::new(5.0, 5.0),
        &key,
        ShapeDefaults::default(),
    );
    project.add_shapes(layer, &[first, second, image]).unwrap();

    let archive = ProjectArchive::new(&fs);
    archive.save(Path::new("diagram.zip"), &project).unwrap();
    assert!(dir.path().join("diagram.zip").exists());
    let loaded = archive.load(Path::new("diagram.zip")).unwrap();

    assert_eq!(loaded.name, "Archive");
    let shapes = &loaded.current_layer().unwrap().shapes;
    assert_eq!(shapes.len(), 3);
    let (ShapeKind::Line(l1), ShapeKind::Line(l2)) = (
        &loaded.store.get(shapes[0]).unwrap().kind,
        &loaded.store.get(shapes[1]).unwrap().kind,
    ) else {
        panic!("expected two lines");
    };
    assert_eq!(l1.end, l2.start);
    assert_eq!(loaded.images.get_image(&key), Some(&[1u8, 2, 3, 4][..]));
    assert!(loaded.images.get_image(&unused).is_none());
    assert!(!loaded.can_undo());
}

#[test]
fn test_load_of_garbage_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.zip"), b"not a zip").unwrap();
    let fs = StdFileSystem::new(dir.path());
    assert!(ProjectArchive::new(&fs).load(Path::new("broken.zip")).is_err());
    assert!(ProjectArchive::new(&fs).load(Path::new("absent.zip")).is_err());
}
