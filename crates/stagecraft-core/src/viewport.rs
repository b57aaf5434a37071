//! Viewport module for the screen/world transform under pan and zoom.
//!
//! The level scrolls horizontally: the camera carries an X offset only, and
//! world Y is the screen Y (relative to the canvas origin) divided by zoom.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default zoom bounds.
pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 2.0;

/// Viewport manages the view transform for the editing canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen position of the canvas origin.
    pub origin: Point,
    /// World X shown at the canvas origin.
    pub camera_x: f64,
    /// Current zoom factor.
    zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            camera_x: 0.0,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Viewport {
    /// Create a viewport at zoom 1 with default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport with custom zoom bounds.
    pub fn with_zoom_limits(min_zoom: f64, max_zoom: f64) -> Self {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        Self {
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom, clamped to the allowed range. Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    /// World-to-screen transform for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2())
            * Affine::scale(self.zoom)
            * Affine::translate(Vec2::new(-self.camera_x, 0.0))
    }

    /// Screen-to-world transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.camera_x, 0.0))
            * Affine::scale(1.0 / self.zoom)
            * Affine::translate(-self.origin.to_vec2())
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.origin.x) / self.zoom + self.camera_x,
            (screen_point.y - self.origin.y) / self.zoom,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            (world_point.x - self.camera_x) * self.zoom + self.origin.x,
            world_point.y * self.zoom + self.origin.y,
        )
    }

    /// Convert a screen-space length to world units.
    pub fn screen_to_world_length(&self, length: f64) -> f64 {
        length / self.zoom
    }

    /// Pan by a delta in screen coordinates. Only the X component scrolls.
    pub fn pan(&mut self, delta: Vec2) {
        if delta.x.is_finite() {
            self.camera_x -= delta.x / self.zoom;
        }
    }

    /// Zoom by `factor`, keeping the world point under `screen_point` fixed horizontally.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        self.set_zoom_at(screen_point, self.zoom * factor);
    }

    /// Set an absolute zoom, keeping the world point under `screen_point` fixed horizontally.
    pub fn set_zoom_at(&mut self, screen_point: Point, zoom: f64) {
        if !zoom.is_finite() || !screen_point.x.is_finite() {
            return;
        }
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        // World point under the cursor before zoom
        let world_point = self.screen_to_world(screen_point);

        self.zoom = new_zoom;

        // Solve (sx - origin.x) / zoom + camera_x = world.x for camera_x
        self.camera_x = world_point.x - (screen_point.x - self.origin.x) / self.zoom;
    }

    /// World rectangle visible in a canvas of the given screen size.
    pub fn visible_world_rect(&self, size: Size) -> Rect {
        let top_left = self.screen_to_world(self.origin);
        let bottom_right =
            self.screen_to_world(Point::new(self.origin.x + size.width, self.origin.y + size.height));
        Rect::from_points(top_left, bottom_right)
    }

    /// Reset camera to the level start at zoom 1.
    pub fn reset(&mut self) {
        self.camera_x = 0.0;
        self.set_zoom(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::new();
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(viewport.camera_x, 0.0);
    }

    #[test]
    fn test_screen_to_world_formula() {
        let mut viewport = Viewport::new();
        viewport.origin = Point::new(10.0, 20.0);
        viewport.camera_x = 300.0;
        viewport.set_zoom(2.0);

        let world = viewport.screen_to_world(Point::new(110.0, 220.0));
        assert!((world.x - 350.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_affine_matches_formula() {
        let mut viewport = Viewport::new();
        viewport.origin = Point::new(15.0, -5.0);
        viewport.camera_x = 42.0;
        viewport.set_zoom(1.5);

        let screen = Point::new(123.0, 456.0);
        let direct = viewport.screen_to_world(screen);
        let via_affine = viewport.inverse_transform() * screen;
        assert!((direct.x - via_affine.x).abs() < 1e-9);
        assert!((direct.y - via_affine.y).abs() < 1e-9);

        let back = viewport.transform() * direct;
        assert!((back.x - screen.x).abs() < 1e-9);
        assert!((back.y - screen.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new();
        viewport.zoom_at(Point::ZERO, 0.001);
        assert!((viewport.zoom() - MIN_ZOOM).abs() < f64::EPSILON);

        viewport.zoom_at(Point::ZERO, 1000.0);
        assert!((viewport.zoom() - MAX_ZOOM).abs() < f64::EPSILON);

        viewport.set_zoom(f64::NAN);
        assert!((viewport.zoom() - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_keeps_point_fixed() {
        let mut viewport = Viewport::new();
        viewport.origin = Point::new(20.0, 0.0);
        viewport.camera_x = 100.0;

        let cursor = Point::new(420.0, 300.0);
        let before = viewport.screen_to_world(cursor);
        viewport.zoom_at(cursor, 1.6);
        let after = viewport.screen_to_world(cursor);

        assert!((viewport.zoom() - 1.6).abs() < 1e-12);
        assert!((before.x - after.x).abs() < 1e-9);
    }

    #[test]
    fn test_pan() {
        let mut viewport = Viewport::new();
        viewport.set_zoom(2.0);
        viewport.pan(Vec2::new(-40.0, 25.0));
        assert!((viewport.camera_x - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_visible_world_rect() {
        let mut viewport = Viewport::new();
        viewport.camera_x = 50.0;
        viewport.set_zoom(0.5);
        let rect = viewport.visible_world_rect(Size::new(400.0, 300.0));
        assert!((rect.x0 - 50.0).abs() < f64::EPSILON);
        assert!((rect.width() - 800.0).abs() < f64::EPSILON);
        assert!((rect.height() - 600.0).abs() < f64::EPSILON);
    }
}
