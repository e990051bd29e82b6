/// Rotation state and the per-vertex rotation pipeline
use crate::geometry::Vertex;

/// View orientation in radians. `x` pitches, `y` yaws. Never wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub x: f64,
    pub y: f64,
}

impl Orientation {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

/// Angular momentum applied to [`Orientation`] once per frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_at_rest(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Rotate about the X axis; `x` is unchanged
pub fn rotate_x(v: Vertex, theta: f64) -> Vertex {
    let (sin, cos) = theta.sin_cos();
    Vertex::new(v.x, v.y * cos - v.z * sin, v.y * sin + v.z * cos)
}

/// Rotate about the Y axis; `y` is unchanged
pub fn rotate_y(v: Vertex, theta: f64) -> Vertex {
    let (sin, cos) = theta.sin_cos();
    Vertex::new(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos)
}

/// Apply the view orientation: X rotation first, then Y. The order matters.
pub fn rotate(v: Vertex, orientation: &Orientation) -> Vertex {
    rotate_y(rotate_x(v, orientation.x), orientation.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: Vertex, b: Vertex) {
        assert!((a - b).norm() < 1e-12, "{a:?} != {b:?}");
    }

    #[test]
    fn test_orientation_rotate() {
        let mut orientation = Orientation::zero();
        orientation.rotate(0.1, 0.2);
        assert!((orientation.x - 0.1).abs() < 1e-12);
        assert!((orientation.y - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_x_quarter_turn() {
        let v = rotate_x(Vertex::new(1.0, 1.0, 0.0), FRAC_PI_2);
        assert_close(v, Vertex::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        let v = rotate_y(Vertex::new(1.0, 1.0, 0.0), FRAC_PI_2);
        assert_close(v, Vertex::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_identity_rotation() {
        let v = Vertex::new(0.3, -0.4, 0.5);
        assert_close(rotate(v, &Orientation::zero()), v);
    }

    #[test]
    fn test_rotation_order_is_x_then_y() {
        let v = Vertex::new(0.0, 1.0, 0.0);
        let orientation = Orientation::new(FRAC_PI_2, FRAC_PI_2);
        // X takes (0,1,0) to (0,0,1); Y then takes it to (-1,0,0)
        assert_close(rotate(v, &orientation), Vertex::new(-1.0, 0.0, 0.0));
        // The reverse order would leave the point on the Z axis
        assert_close(
            rotate_x(rotate_y(v, orientation.y), orientation.x),
            Vertex::new(0.0, 0.0, 1.0),
        );
    }

    #[test]
    fn test_rotation_preserves_length() {
        let v = Vertex::new(0.7, -0.2, 0.9);
        let r = rotate(v, &Orientation::new(1.3, -2.1));
        assert!((r.coords.norm() - v.coords.norm()).abs() < 1e-12);
    }
}
