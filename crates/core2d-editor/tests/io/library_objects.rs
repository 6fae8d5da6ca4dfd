use core2d_editor::{
    export_json, import_json, Column, Database, Editor, LibraryObject, Point2, Record,
    ShapeDefaults,
};

#[test]
fn test_database_object_pastes_as_database() {
    let mut db = Database::new("Parts", vec![Column::new("Name"), Column::new("Qty")]);
    db.records.push(Record::new(vec!["Bolt".into(), "4".into()]));
    let text = export_json(&LibraryObject::Database(db.clone())).unwrap();

    let mut editor = Editor::default();
    editor.new_project("Objects");
    assert!(editor.paste_text(&text).unwrap());
    let project = editor.project().unwrap();
    assert_eq!(project.databases.len(), 1);
    assert_eq!(project.databases[0].records[0].values[0], "Bolt");
    assert_eq!(project.current_database, Some(db.id));
}

#[test]
fn test_fragment_with_bound_record_restores_database() {
    let mut source = Editor::default();
    source.new_project("Source");
    let mut db = Database::new("People", vec![Column::new("Name")]);
    let record = Record::new(vec!["Ada".into()]);
    let record_id = record.id;
    db.records.push(record);
    assert!(source.add_database(db));
    let project = source.project_mut().unwrap();
    let layer = project.current_layer_id().unwrap();
    let text = project.store.create_text(
        Point2::new(0.0, 0.0),
        Point2::new(50.0, 20.0),
        "{Name}",
        ShapeDefaults::default(),
    );
    project.store.get_mut(text).unwrap().data.record = Some(record_id);
    project.add_shapes(layer, &[text]).unwrap();
    source.select(&[text]);
    let clip = source.copy_text().unwrap();

    let mut target = Editor::default();
    target.new_project("Target");
    assert!(target.paste_text(&clip).unwrap());
    let project = target.project().unwrap();
    assert_eq!(project.databases.len(), 1);
    assert!(project.databases[0].contains_record(record_id));
    let pasted = target.selection()[0];
    assert_eq!(target.bound_text(pasted).unwrap(), "Ada");
}

#[test]
fn test_unknown_kind_is_not_supported() {
    let mut editor = Editor::default();
    editor.new_project("Objects");
    let err = editor.paste_text(r#"{"kind":"macro"}"#).unwrap_err();
    assert!(err.is_not_supported());
    assert!(!editor.paste_text("not json at all").unwrap());
}
