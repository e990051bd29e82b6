/// Camera state and perspective projection
use nalgebra::{Point2, Vector2};

use crate::geometry::Vertex;

/// Pixel dimensions of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Zoom distance and screen-space pan offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub distance: f64,
    pub offset: Vector2<f64>,
}

impl Camera {
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            offset: Vector2::zeros(),
        }
    }

    /// Set the zoom distance, clamped into `[min, max]`
    pub fn set_distance(&mut self, distance: f64, min: f64, max: f64) {
        if distance.is_nan() {
            return;
        }
        self.distance = distance.max(min).min(max);
    }

    /// Move the zoom distance by `delta`, clamped into `[min, max]`
    pub fn zoom_by(&mut self, delta: f64, min: f64, max: f64) {
        self.set_distance(self.distance + delta, min, max);
    }

    pub fn pan(&mut self, delta: Vector2<f64>) {
        self.offset += delta;
    }
}

/// Perspective-project a rotated vertex onto the screen.
///
/// Points at or behind the camera collapse to the screen origin instead of
/// being clipped, so an edge touching one is drawn to `(0, 0)`.
pub fn project(v: Vertex, camera: &Camera, fov: f64, viewport: &Viewport) -> Point2<f64> {
    let z_factor = camera.distance - v.z;
    if z_factor <= 0.0 {
        return Point2::origin();
    }

    let scale = fov / z_factor;
    viewport.center() + v.xy().coords * scale + camera.offset
}
