use core2d_editor::{render_page, Editor, Point2, RasterRenderer, ShapeDefaults, SvgRenderer};

fn editor_with_shapes() -> Editor {
    let mut editor = Editor::default();
    editor.new_project("Export");
    let project = editor.project_mut().unwrap();
    let layer = project.current_layer_id().unwrap();
    let line = project.store.create_line(
        Point2::new(0.0, 0.0),
        Point2::new(100.0, 50.0),
        ShapeDefaults::default(),
    );
    let ellipse = project.store.create_ellipse(
        Point2::new(200.0, 200.0),
        Point2::new(300.0, 260.0),
        ShapeDefaults {
            is_filled: true,
            ..ShapeDefaults::default()
        },
    );
    project.add_shapes(layer, &[line, ellipse]).unwrap();
    editor
}

#[test]
fn test_svg_export_of_current_page() {
    let editor = editor_with_shapes();
    let project = editor.project().unwrap();
    let mut svg = SvgRenderer::new();
    render_page(&mut svg, project, project.current_page().unwrap());
    let out = svg.finish();
    assert!(out.contains("<line"));
    assert!(out.contains("<ellipse"));
}

#[test]
fn test_hidden_layer_is_not_exported() {
    let mut editor = editor_with_shapes();
    let project = editor.project_mut().unwrap();
    let layer = project.current_layer_id().unwrap();
    project.layer_mut(layer).unwrap().is_visible = false;
    let project = editor.project().unwrap();
    let mut svg = SvgRenderer::new();
    render_page(&mut svg, project, project.current_page().unwrap());
    let out = svg.finish();
    assert!(!out.contains("<line"));
}

#[test]
fn test_png_export_has_signature() {
    let editor = editor_with_shapes();
    let project = editor.project().unwrap();
    let page = project.current_page().unwrap();
    let mut png = RasterRenderer::new(page.width, page.height, 1.0).unwrap();
    render_page(&mut png, project, page);
    let bytes = png.encode_png().unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
