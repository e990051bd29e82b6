/// Per-frame momentum and auto-rotation
use crate::config::ViewerConfig;
use crate::transform::{Orientation, Velocity};

/// Continuous yaw rotation independent of pointer input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoRotate {
    pub enabled: bool,
    pub speed: f64,
}

impl AutoRotate {
    pub fn new(enabled: bool, speed: f64) -> Self {
        Self { enabled, speed }
    }
}

/// Advance one frame: apply velocity, decay it by `friction`, then add the
/// auto-rotate step to yaw. Callers skip this while a drag is in progress.
///
/// Each axis snaps to exactly zero once it falls below `snap_epsilon`.
pub fn step(
    orientation: &mut Orientation,
    velocity: &mut Velocity,
    auto_rotate: &AutoRotate,
    config: &ViewerConfig,
) {
    orientation.rotate(velocity.x, velocity.y);

    velocity.x = decay(velocity.x, config.friction, config.snap_epsilon);
    velocity.y = decay(velocity.y, config.friction, config.snap_epsilon);

    if auto_rotate.enabled {
        orientation.y += auto_rotate.speed;
    }
}

fn decay(v: f64, friction: f64, epsilon: f64) -> f64 {
    let next = v * friction;
    if next.abs() < epsilon {
        0.0
    } else {
        next
    }
}
