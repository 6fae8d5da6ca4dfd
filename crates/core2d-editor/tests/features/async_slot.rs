use async_trait::async_trait;
use core2d_core::{Clipboard, ImagePicker, MemoryClipboard, PickedImage, Result, ScriptRunner};
use core2d_editor::{Editor, Point2, ShapeDefaults};
use std::sync::atomic::{AtomicUsize, Ordering};

fn editor_with_line() -> Editor {
    let mut editor = Editor::default();
    editor.new_project("Async");
    let project = editor.project_mut().unwrap();
    let layer = project.current_layer_id().unwrap();
    let line = project.store.create_line(
        Point2::new(0.0, 0.0),
        Point2::new(50.0, 0.0),
        ShapeDefaults::default(),
    );
    project.add_shapes(layer, &[line]).unwrap();
    editor.select(&[line]);
    editor
}

fn layer_len(editor: &Editor) -> usize {
    editor
        .project()
        .unwrap()
        .current_layer()
        .unwrap()
        .shapes
        .len()
}

#[tokio::test]
async fn test_copy_then_paste_through_clipboard() {
    let clipboard = MemoryClipboard::new();
    let mut editor = editor_with_line();
    assert!(editor.copy(&clipboard).await);
    assert!(clipboard.get_text().await.unwrap().is_some());
    assert!(editor.paste(&clipboard).await.unwrap());
    assert_eq!(layer_len(&editor), 2);
    assert!(!editor.is_pending());
}

#[tokio::test]
async fn test_stale_paste_is_dropped() {
    let clipboard = MemoryClipboard::new();
    let mut editor = editor_with_line();
    assert!(editor.copy(&clipboard).await);

    let ticket = editor.begin_async().unwrap();
    assert!(editor.begin_async().is_none());
    let text = clipboard.get_text().await;

    editor.new_project("Other");
    assert!(!editor.complete_paste(ticket, text).unwrap());
    assert_eq!(layer_len(&editor), 0);
    assert!(!editor.is_pending());
    assert!(editor.begin_async().is_some());
}

#[tokio::test]
async fn test_unknown_clipboard_kind_is_not_supported() {
    let clipboard = MemoryClipboard::new();
    clipboard
        .set_text(r#"{"kind":"spreadsheet","value":{}}"#)
        .await
        .unwrap();
    let mut editor = editor_with_line();
    let err = editor.paste(&clipboard).await.unwrap_err();
    assert!(err.is_not_supported());
    assert!(!editor.is_pending());
}

struct CountingRunner {
    runs: AtomicUsize,
}

#[async_trait]
impl ScriptRunner for CountingRunner {
    async fn execute(&self, _code: &str) -> Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_run_script_needs_open_project() {
    let runner = CountingRunner {
        runs: AtomicUsize::new(0),
    };
    let mut editor = Editor::default();
    assert!(!editor.run_script(&runner, "print('x')").await);
    assert_eq!(runner.runs.load(Ordering::SeqCst), 0);

    editor.new_project("Scripts");
    assert!(editor.run_script(&runner, "print('x')").await);
    assert_eq!(runner.runs.load(Ordering::SeqCst), 1);
}

struct FixedPicker;

#[async_trait]
impl ImagePicker for FixedPicker {
    async fn pick_image(&self) -> Result<Option<PickedImage>> {
        Ok(Some(PickedImage {
            name: "logo.png".to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }))
    }
}

#[tokio::test]
async fn test_acquired_image_feeds_image_tool() {
    let mut editor = editor_with_line();
    assert!(editor.acquire_image(&FixedPicker).await);
    let key = editor.image_key().unwrap().to_string();
    assert!(editor.project().unwrap().images.get_image(&key).is_some());
}
