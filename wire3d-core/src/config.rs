/// Viewer tuning and drawing style
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tuning constants for the camera, input handling and momentum physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Perspective scale in pixels at unit depth
    pub fov: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Distance change per wheel delta unit
    pub wheel_sensitivity: f64,
    /// Distance change per pixel of pinch separation
    pub pinch_sensitivity: f64,
    /// Radians per dragged pixel
    pub drag_sensitivity: f64,
    /// Per-frame velocity multiplier, below 1
    pub friction: f64,
    /// Velocity magnitude below which momentum snaps to rest
    pub snap_epsilon: f64,
    pub initial_distance: f64,
    /// Fitted camera distance as a multiple of the geometry radius
    pub fit_factor: f64,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov: 350.0,
            zoom_min: 0.5,
            zoom_max: 50.0,
            wheel_sensitivity: 0.005,
            pinch_sensitivity: 0.1,
            drag_sensitivity: 0.01,
            friction: 0.95,
            snap_epsilon: 1e-5,
            initial_distance: 4.0,
            fit_factor: 4.0,
            auto_rotate: true,
            auto_rotate_speed: 0.01,
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov > 0.0) {
            return Err(ConfigError::Invalid(format!("fov must be positive, got {}", self.fov)));
        }
        if !(self.zoom_min > 0.0 && self.zoom_min <= self.zoom_max) {
            return Err(ConfigError::Invalid(format!(
                "zoom range [{}, {}] is empty or not positive",
                self.zoom_min, self.zoom_max
            )));
        }
        if !(0.0..1.0).contains(&self.friction) {
            return Err(ConfigError::Invalid(format!(
                "friction must be in [0, 1), got {}",
                self.friction
            )));
        }
        if !(self.snap_epsilon >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "snap_epsilon must be non-negative, got {}",
                self.snap_epsilon
            )));
        }
        Ok(())
    }

    /// Clamp a camera distance into the configured zoom range
    pub fn clamp_distance(&self, distance: f64) -> f64 {
        distance.max(self.zoom_min).min(self.zoom_max)
    }
}

/// Stroke and background settings pushed in by the widget layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub stroke_color: String,
    pub line_width: f64,
    pub background: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#00ff00".to_string(),
            line_width: 1.0,
            background: "#000000".to_string(),
        }
    }
}
