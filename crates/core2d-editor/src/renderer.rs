//! Renderer abstraction and the page draw pass.
//!
//! A [`ShapeRenderer`] receives resolved geometry, one call per shape kind;
//! it never sees the store. [`render_page`] walks a page (template first,
//! then the page's visible layers) and dispatches each visible shape,
//! recursing into groups.

use tracing::trace;

use crate::data::DataFlow;
use crate::geometry::{ArcEllipse, Point2, Rect2};
use crate::model::{Shape, ShapeId, ShapeKind, ShapeStore, StyleId};
use crate::path::Outline;
use crate::project::{ImageCache, Layer, Page, Project};
use crate::style::{ArgbColor, ShapeStyle};

/// Appearance of the shape being drawn.
#[derive(Debug, Clone, Copy)]
pub struct DrawStyle<'a> {
    pub style: &'a ShapeStyle,
    pub is_stroked: bool,
    pub is_filled: bool,
}

/// Sink for one draw pass.
pub trait ShapeRenderer {
    /// Drop cached resources such as decoded images.
    fn clear_cache(&mut self) {}

    /// Called once per pass before any shape.
    fn draw_page(&mut self, width: f64, height: f64, background: ArgbColor);

    fn draw_point(&mut self, at: Point2, style: &DrawStyle<'_>);

    fn draw_line(&mut self, start: Point2, end: Point2, style: &DrawStyle<'_>);

    fn draw_arc(&mut self, arc: &ArcEllipse, style: &DrawStyle<'_>);

    fn draw_cubic_bezier(&mut self, points: [Point2; 4], style: &DrawStyle<'_>);

    fn draw_quadratic_bezier(&mut self, points: [Point2; 3], style: &DrawStyle<'_>);

    fn draw_rectangle(&mut self, rect: Rect2, style: &DrawStyle<'_>);

    fn draw_ellipse(&mut self, rect: Rect2, style: &DrawStyle<'_>);

    /// `text` is already bound against the shape's data.
    fn draw_text(&mut self, rect: Rect2, text: &str, style: &DrawStyle<'_>);

    /// `bytes` is `None` when the image cache has no entry for `key`.
    fn draw_image(&mut self, rect: Rect2, key: &str, bytes: Option<&[u8]>, style: &DrawStyle<'_>);

    fn draw_path(&mut self, outline: &Outline, style: &DrawStyle<'_>);
}

/// Borrowed state shared by every shape of a pass.
pub struct DrawContext<'a> {
    pub store: &'a ShapeStore,
    pub images: &'a ImageCache,
    pub flow: DataFlow<'a>,
    default_style: ShapeStyle,
}

impl<'a> DrawContext<'a> {
    pub fn new(store: &'a ShapeStore, images: &'a ImageCache, flow: DataFlow<'a>) -> Self {
        Self {
            store,
            images,
            flow,
            default_style: ShapeStyle::new(StyleId::default(), "Default"),
        }
    }

    fn style_for(&self, shape: &Shape) -> DrawStyle<'_> {
        DrawStyle {
            style: shape
                .style
                .and_then(|id| self.store.style(id))
                .unwrap_or(&self.default_style),
            is_stroked: shape.is_stroked,
            is_filled: shape.is_filled,
        }
    }

    fn rect(&self, a: ShapeId, b: ShapeId) -> Option<Rect2> {
        Some(Rect2::from_points(self.store.point(a)?, self.store.point(b)?))
    }
}

/// Draw `page` with its template underneath.
pub fn render_page<R: ShapeRenderer + ?Sized>(renderer: &mut R, project: &Project, page: &Page) {
    let template = page.template.and_then(|id| project.template(id));
    let background = template.map_or(page.background, |t| t.background);
    renderer.draw_page(page.width, page.height, background);

    let flow = DataFlow::new(&project.databases, Some(&page.data));
    let ctx = DrawContext::new(&project.store, &project.images, flow);
    if let Some(template) = template {
        draw_layers(renderer, &ctx, &template.layers);
    }
    draw_layers(renderer, &ctx, &page.layers);
}

fn draw_layers<R: ShapeRenderer + ?Sized>(renderer: &mut R, ctx: &DrawContext<'_>, layers: &[Layer]) {
    for layer in layers.iter().filter(|l| l.is_visible) {
        draw_shapes(renderer, ctx, &layer.shapes);
    }
}

/// Draw a shape sequence in order; later shapes paint over earlier ones.
pub fn draw_shapes<R: ShapeRenderer + ?Sized>(
    renderer: &mut R,
    ctx: &DrawContext<'_>,
    shapes: &[ShapeId],
) {
    for id in shapes {
        match ctx.store.get(*id) {
            Some(shape) if shape.is_visible() => draw_shape(renderer, ctx, shape),
            Some(_) => {}
            None => trace!("Skipping missing shape {}", id),
        }
    }
}

fn draw_shape<R: ShapeRenderer + ?Sized>(renderer: &mut R, ctx: &DrawContext<'_>, shape: &Shape) {
    let style = ctx.style_for(shape);
    let store = ctx.store;
    let drawn = match &shape.kind {
        ShapeKind::Point(p) => {
            renderer.draw_point(Point2::new(p.x, p.y), &style);
            Some(())
        }
        ShapeKind::Line(line) => store
            .point(line.start)
            .zip(store.point(line.end))
            .map(|(a, b)| renderer.draw_line(a, b, &style)),
        ShapeKind::Arc(arc) => store
            .points_at(&[arc.point1, arc.point2, arc.point3, arc.point4])
            .map(|p| renderer.draw_arc(&ArcEllipse::from_points(p[0], p[1], p[2], p[3]), &style)),
        ShapeKind::CubicBezier(c) => store
            .points_at(&[c.point1, c.point2, c.point3, c.point4])
            .map(|p| renderer.draw_cubic_bezier([p[0], p[1], p[2], p[3]], &style)),
        ShapeKind::QuadraticBezier(q) => store
            .points_at(&[q.point1, q.point2, q.point3])
            .map(|p| renderer.draw_quadratic_bezier([p[0], p[1], p[2]], &style)),
        ShapeKind::Rectangle(r) => ctx
            .rect(r.top_left, r.bottom_right)
            .map(|rect| renderer.draw_rectangle(rect, &style)),
        ShapeKind::Ellipse(e) => ctx
            .rect(e.top_left, e.bottom_right)
            .map(|rect| renderer.draw_ellipse(rect, &style)),
        ShapeKind::Text(t) => ctx.rect(t.top_left, t.bottom_right).map(|rect| {
            let text = ctx.flow.bind_text(&t.text, &shape.data);
            renderer.draw_text(rect, &text, &style)
        }),
        ShapeKind::Image(i) => ctx.rect(i.top_left, i.bottom_right).map(|rect| {
            renderer.draw_image(rect, &i.key, ctx.images.get_image(&i.key), &style)
        }),
        ShapeKind::Path(path) => Outline::from_geometry(store, &path.geometry)
            .map(|outline| renderer.draw_path(&outline, &style)),
        ShapeKind::Group(group) => {
            draw_shapes(renderer, ctx, &group.shapes);
            Some(())
        }
    };
    if drawn.is_none() {
        trace!("Shape {} references a missing point", shape.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ShapeDefaults, ShapeState};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl ShapeRenderer for Recorder {
        fn draw_page(&mut self, _: f64, _: f64, _: ArgbColor) {
            self.calls.push("page".into());
        }
        fn draw_point(&mut self, _: Point2, _: &DrawStyle<'_>) {
            self.calls.push("point".into());
        }
        fn draw_line(&mut self, _: Point2, _: Point2, _: &DrawStyle<'_>) {
            self.calls.push("line".into());
        }
        fn draw_arc(&mut self, _: &ArcEllipse, _: &DrawStyle<'_>) {
            self.calls.push("arc".into());
        }
        fn draw_cubic_bezier(&mut self, _: [Point2; 4], _: &DrawStyle<'_>) {
            self.calls.push("cubic".into());
        }
        fn draw_quadratic_bezier(&mut self, _: [Point2; 3], _: &DrawStyle<'_>) {
            self.calls.push("quad".into());
        }
        fn draw_rectangle(&mut self, _: Rect2, _: &DrawStyle<'_>) {
            self.calls.push("rect".into());
        }
        fn draw_ellipse(&mut self, _: Rect2, _: &DrawStyle<'_>) {
            self.calls.push("ellipse".into());
        }
        fn draw_text(&mut self, _: Rect2, text: &str, _: &DrawStyle<'_>) {
            self.calls.push(format!("text:{}", text));
        }
        fn draw_image(&mut self, _: Rect2, _: &str, _: Option<&[u8]>, _: &DrawStyle<'_>) {
            self.calls.push("image".into());
        }
        fn draw_path(&mut self, _: &Outline, _: &DrawStyle<'_>) {
            self.calls.push("path".into());
        }
    }

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn test_template_drawn_before_page() {
        let mut project = Project::with_defaults("Test");
        let page = project.current_page().map(|p| p.id).unwrap();
        let template = project.page(page).and_then(|p| p.template).unwrap();
        let template_layer = project.template(template).unwrap().layers[0].id;
        let layer = project.current_layer_id().unwrap();

        let rect = project
            .store
            .create_rectangle(p(0.0, 0.0), p(800.0, 600.0), ShapeDefaults::default());
        project.add_shape(template_layer, rect).unwrap();
        let line = project
            .store
            .create_line(p(0.0, 0.0), p(10.0, 10.0), ShapeDefaults::default());
        project.add_shape(layer, line).unwrap();

        let mut recorder = Recorder::default();
        render_page(&mut recorder, &project, project.page(page).unwrap());
        assert_eq!(recorder.calls, vec!["page", "rect", "line"]);
    }

    #[test]
    fn test_invisible_shapes_and_layers_skipped() {
        let mut project = Project::with_defaults("Test");
        let layer = project.current_layer_id().unwrap();
        let hidden = project
            .store
            .create_line(p(0.0, 0.0), p(10.0, 10.0), ShapeDefaults::default());
        if let Some(shape) = project.store.get_mut(hidden) {
            shape.state.remove(ShapeState::VISIBLE);
        }
        let shown = project
            .store
            .create_ellipse(p(0.0, 0.0), p(10.0, 10.0), ShapeDefaults::default());
        project.add_shapes(layer, &[hidden, shown]).unwrap();

        let mut recorder = Recorder::default();
        render_page(&mut recorder, &project, project.current_page().unwrap());
        assert_eq!(recorder.calls, vec!["page", "ellipse"]);

        project.layer_mut(layer).unwrap().is_visible = false;
        let mut recorder = Recorder::default();
        render_page(&mut recorder, &project, project.current_page().unwrap());
        assert_eq!(recorder.calls, vec!["page"]);
    }

    #[test]
    fn test_text_is_bound_and_groups_recurse() {
        let mut project = Project::with_defaults("Test");
        let layer = project.current_layer_id().unwrap();
        let text = project
            .store
            .create_text(p(0.0, 0.0), p(50.0, 20.0), "Rev {Rev}", ShapeDefaults::default());
        if let Some(shape) = project.store.get_mut(text) {
            shape.data.set_property("Rev", "C");
        }
        let group = project.store.create_group("G", vec![text], vec![]);
        project.add_shape(layer, group).unwrap();

        let mut recorder = Recorder::default();
        render_page(&mut recorder, &project, project.current_page().unwrap());
        assert_eq!(recorder.calls, vec!["page", "text:Rev C"]);
    }
}
