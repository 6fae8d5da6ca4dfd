use core2d_editor::{Editor, Nudge, Point2, Rect2, ShapeDefaults, ShapeId};
use proptest::prelude::*;

fn editor_with_rectangle() -> (Editor, ShapeId) {
    let mut editor = Editor::default();
    editor.new_project("History");
    let project = editor.project_mut().unwrap();
    project.options.snap_to_grid = false;
    let layer = project.current_layer_id().unwrap();
    let rect = project.store.create_rectangle(
        Point2::new(0.0, 0.0),
        Point2::new(40.0, 20.0),
        ShapeDefaults::default(),
    );
    project.add_shapes(layer, &[rect]).unwrap();
    project.history.reset();
    editor.select(&[rect]);
    (editor, rect)
}

fn bounds(editor: &Editor, id: ShapeId) -> Rect2 {
    editor.project().unwrap().store.bounds(id).unwrap()
}

#[derive(Debug, Clone)]
enum Step {
    Move(f64, f64),
    Nudge(Nudge),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (-50i32..50, -50i32..50).prop_map(|(dx, dy)| Step::Move(dx as f64, dy as f64)),
        prop_oneof![
            Just(Nudge::Left),
            Just(Nudge::Right),
            Just(Nudge::Up),
            Just(Nudge::Down)
        ]
        .prop_map(Step::Nudge),
    ]
}

proptest! {
    #[test]
    fn undo_all_restores_and_redo_all_replays(steps in prop::collection::vec(step(), 1..12)) {
        let (mut editor, rect) = editor_with_rectangle();
        let initial = bounds(&editor, rect);

        let mut committed = 0;
        for step in &steps {
            let done = match step {
                Step::Move(dx, dy) => editor.move_selection(*dx, *dy),
                Step::Nudge(direction) => editor.nudge(*direction),
            };
            if done {
                committed += 1;
            }
        }
        let last = bounds(&editor, rect);

        for _ in 0..committed {
            prop_assert!(editor.undo());
        }
        prop_assert!(!editor.can_undo());
        prop_assert_eq!(bounds(&editor, rect), initial);

        for _ in 0..committed {
            prop_assert!(editor.redo());
        }
        prop_assert!(!editor.can_redo());
        prop_assert_eq!(bounds(&editor, rect), last);
    }
}

#[test]
fn test_new_edit_clears_redo() {
    let (mut editor, _) = editor_with_rectangle();
    assert!(editor.move_selection(5.0, 0.0));
    assert!(editor.undo());
    assert!(editor.can_redo());
    assert!(editor.move_selection(0.0, 5.0));
    assert!(!editor.can_redo());
}

#[test]
fn test_history_depth_is_bounded() {
    let (mut editor, _) = editor_with_rectangle();
    editor
        .project_mut()
        .unwrap()
        .history
        .set_max_depth(3);
    for _ in 0..5 {
        assert!(editor.move_selection(1.0, 0.0));
    }
    let history = &editor.project().unwrap().history;
    assert_eq!(history.undo_depth(), 3);
    assert_eq!(history.undo_name(), Some("Move"));
}
