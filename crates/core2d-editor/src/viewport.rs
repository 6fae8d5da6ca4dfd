//! Viewport zoom and pan.
//!
//! Maps between screen pixels and page coordinates. Both spaces have the
//! origin at the top-left with Y growing downwards:
//!
//! ```text
//! screen = world * zoom + pan
//! world  = (screen - pan) / zoom
//! ```

use std::fmt;

use core2d_core::constants::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

use crate::geometry::{Point2, Rect2};

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    width: f64,
    height: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            width,
            height,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    /// Replace the zoom limits; the current zoom is clamped into them.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        if min_zoom > 0.0 && min_zoom <= max_zoom {
            self.min_zoom = min_zoom;
            self.max_zoom = max_zoom;
            self.zoom = self.zoom.clamp(min_zoom, max_zoom);
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom factor, clamped to the limits.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    pub fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn screen_to_world(&self, x: f64, y: f64) -> Point2 {
        Point2::new((x - self.pan_x) / self.zoom, (y - self.pan_y) / self.zoom)
    }

    pub fn world_to_screen(&self, p: Point2) -> (f64, f64) {
        (p.x * self.zoom + self.pan_x, p.y * self.zoom + self.pan_y)
    }

    /// Zoom to `zoom` keeping the world point under screen position
    /// (`x`, `y`) fixed.
    pub fn zoom_at(&mut self, x: f64, y: f64, zoom: f64) {
        let anchor = self.screen_to_world(x, y);
        self.set_zoom(zoom);
        self.pan_x = x - anchor.x * self.zoom;
        self.pan_y = y - anchor.y * self.zoom;
    }

    pub fn zoom_in_at(&mut self, x: f64, y: f64) {
        self.zoom_at(x, y, self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out_at(&mut self, x: f64, y: f64) {
        self.zoom_at(x, y, self.zoom / ZOOM_STEP);
    }

    /// Fit `bounds` into the view, centred, leaving `padding` (a fraction
    /// of the view) on each side.
    pub fn fit(&mut self, bounds: Rect2, padding: f64) {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return;
        }
        let factor = (1.0 - padding * 2.0).max(0.1);
        let zoom = (self.width * factor / bounds.width).min(self.height * factor / bounds.height);
        self.set_zoom(zoom);
        let center = bounds.center();
        self.pan_x = self.width / 2.0 - center.x * self.zoom;
        self.pan_y = self.height / 2.0 - center.y * self.zoom;
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_world_inverse() {
        let mut viewport = Viewport::new(800.0, 600.0);
        viewport.set_zoom(2.0);
        viewport.set_pan(10.0, -20.0);
        let world = viewport.screen_to_world(110.0, 80.0);
        assert_eq!(world, Point2::new(50.0, 50.0));
        assert_eq!(viewport.world_to_screen(world), (110.0, 80.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(1e6);
        assert_eq!(viewport.zoom(), MAX_ZOOM);
        viewport.set_zoom(-1.0);
        assert_eq!(viewport.zoom(), MAX_ZOOM);
        viewport.set_zoom_limits(0.5, 4.0);
        assert_eq!(viewport.zoom(), 4.0);
    }

    #[test]
    fn test_zoom_at_keeps_anchor() {
        let mut viewport = Viewport::default();
        let before = viewport.screen_to_world(300.0, 200.0);
        viewport.zoom_in_at(300.0, 200.0);
        let after = viewport.screen_to_world(300.0, 200.0);
        assert!(before.distance_to(after) < 1e-9);
        assert!((viewport.zoom() - ZOOM_STEP).abs() < 1e-12);
    }

    #[test]
    fn test_fit_centres_bounds() {
        let mut viewport = Viewport::new(200.0, 100.0);
        viewport.fit(Rect2::new(0.0, 0.0, 100.0, 100.0), 0.0);
        assert_eq!(viewport.zoom(), 1.0);
        assert_eq!(viewport.world_to_screen(Point2::new(50.0, 50.0)), (100.0, 50.0));
    }
}
