/// The viewer engine: owns the geometry, view state, gesture controller and
/// drawing style. Hosts feed it input events and call [`Viewer::run_frame`]
/// once per displayed frame.
use std::collections::VecDeque;

use nalgebra::{Point2, Vector2};
use tracing::{debug, info, warn};

use crate::config::{RenderStyle, ViewerConfig};
use crate::error::{ConfigError, LoadError};
use crate::geometry::{Geometry, MeshStatus};
use crate::input::{InputEvent, InputState, InteractionController, ViewState};
use crate::obj;
use crate::physics::{self, AutoRotate};
use crate::projection::{project, Camera, Viewport};
use crate::surface::Surface;
use crate::transform::{rotate, Orientation, Velocity};

/// What a successful [`Viewer::load_mesh`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The geometry was replaced
    Replaced(MeshStatus),
    /// The text held no vertices; the previous geometry is still shown
    Unchanged(MeshStatus),
}

impl LoadOutcome {
    pub fn status(&self) -> MeshStatus {
        match self {
            Self::Replaced(status) | Self::Unchanged(status) => *status,
        }
    }
}

pub struct Viewer {
    config: ViewerConfig,
    geometry: Geometry,
    view: ViewState,
    controller: InteractionController,
    auto_rotate: AutoRotate,
    style: RenderStyle,
    pending: VecDeque<InputEvent>,
    projected: Vec<Point2<f64>>,
}

impl Viewer {
    /// Validate `config`, then start with the default cube
    pub fn try_new(config: ViewerConfig) -> Result<Self, ConfigError> {
        config
            .validate()
            .inspect_err(|err| warn!(error = %err, "viewer config rejected"))?;
        Ok(Self::new(config))
    }

    /// Start with the default cube at the configured camera distance.
    ///
    /// `config` is trusted as given; use [`Viewer::try_new`] for configs that
    /// have not been through [`ViewerConfig::validate`].
    pub fn new(config: ViewerConfig) -> Self {
        let distance = config.clamp_distance(config.initial_distance);
        let auto_rotate = AutoRotate::new(config.auto_rotate, config.auto_rotate_speed);
        Self {
            geometry: Geometry::cube(),
            view: ViewState::new(distance),
            controller: InteractionController::new(),
            auto_rotate,
            style: RenderStyle::default(),
            pending: VecDeque::new(),
            projected: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn orientation(&self) -> Orientation {
        self.view.orientation
    }

    pub fn velocity(&self) -> Velocity {
        self.view.velocity
    }

    pub fn camera(&self) -> Camera {
        self.view.camera
    }

    pub fn input_state(&self) -> InputState {
        self.controller.state()
    }

    pub fn auto_rotate(&self) -> AutoRotate {
        self.auto_rotate
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    // --- Mesh ---

    /// Replace the geometry from mesh text.
    ///
    /// The current geometry and view are only touched once the whole text
    /// parses. Text without vertices leaves everything as it was.
    pub fn load_mesh(&mut self, text: &str) -> Result<LoadOutcome, LoadError> {
        let parsed = obj::parse_obj(text).inspect_err(|err| {
            warn!(error = %err, "mesh load rejected");
        })?;

        if parsed.is_empty() {
            debug!("mesh text had no vertices, keeping current geometry");
            return Ok(LoadOutcome::Unchanged(self.status()));
        }

        self.geometry = parsed.into_geometry();
        self.view.orientation = Orientation::zero();
        self.fit_view();

        let status = self.status();
        info!(
            vertices = status.vertex_count,
            edges = status.edge_count,
            "mesh loaded"
        );
        Ok(LoadOutcome::Replaced(status))
    }

    pub fn status(&self) -> MeshStatus {
        self.geometry.status()
    }

    // --- View ---

    pub fn set_zoom_distance(&mut self, distance: f64) {
        self.view
            .camera
            .set_distance(distance, self.config.zoom_min, self.config.zoom_max);
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate.enabled = enabled;
    }

    pub fn set_auto_rotate_speed(&mut self, speed: f64) {
        if speed.is_finite() {
            self.auto_rotate.speed = speed;
        }
    }

    /// Zero orientation, momentum and pan, then refit the zoom
    pub fn reset_view(&mut self) {
        self.view.velocity = Velocity::zero();
        self.fit_view();
        debug!("view reset");
    }

    /// Frame the geometry: distance from its radius, no pan, no rotation
    pub fn fit_view(&mut self) {
        let distance = self.geometry.radius * self.config.fit_factor;
        self.view.camera.distance = self.config.clamp_distance(distance);
        self.view.camera.offset = Vector2::zeros();
        self.view.orientation = Orientation::zero();
        debug!(distance = self.view.camera.distance, "view fitted");
    }

    // --- Style ---

    pub fn set_stroke_color(&mut self, color: impl Into<String>) {
        self.style.stroke_color = color.into();
    }

    pub fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.style.line_width = width;
        }
    }

    pub fn set_background(&mut self, color: impl Into<String>) {
        self.style.background = color.into();
    }

    // --- Input ---

    /// Queue an event; it takes effect at the start of the next frame
    pub fn push_event(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    /// Apply an event immediately
    pub fn handle_event(&mut self, event: &InputEvent) {
        self.controller.handle(event, &mut self.view, &self.config);
    }

    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            self.controller.handle(&event, &mut self.view, &self.config);
        }
    }

    // --- Frame ---

    /// Advance momentum and auto-rotation by one frame. Skipped mid-drag.
    pub fn integrate(&mut self) {
        if self.controller.state().is_dragging() {
            return;
        }
        physics::step(
            &mut self.view.orientation,
            &mut self.view.velocity,
            &self.auto_rotate,
            &self.config,
        );
    }

    /// Rotate and project every vertex for the given viewport
    pub fn project_vertices(&mut self, viewport: &Viewport) -> &[Point2<f64>] {
        let orientation = self.view.orientation;
        let camera = self.view.camera;
        let fov = self.config.fov;

        self.projected.clear();
        self.projected.extend(
            self.geometry
                .vertices
                .iter()
                .map(|v| project(rotate(*v, &orientation), &camera, fov, viewport)),
        );
        &self.projected
    }

    /// Run one frame: apply queued input, integrate, then draw every edge
    pub fn run_frame<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.drain_events();
        self.integrate();

        let viewport = surface.viewport();
        self.project_vertices(&viewport);

        surface.clear(&self.style.background);
        surface.set_stroke_color(&self.style.stroke_color);
        surface.set_stroke_width(self.style.line_width);
        surface.begin_path();
        for edge in &self.geometry.edges {
            let (Some(a), Some(b)) = (self.projected.get(edge.start()), self.projected.get(edge.end()))
            else {
                continue;
            };
            surface.move_to(a.x, a.y);
            surface.line_to(b.x, b.y);
        }
        surface.stroke();
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerButton;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn still_viewer() -> Viewer {
        Viewer::new(ViewerConfig {
            auto_rotate: false,
            ..ViewerConfig::default()
        })
    }

    #[test]
    fn test_starts_with_cube() {
        let viewer = Viewer::default();
        assert_eq!(viewer.status(), MeshStatus { vertex_count: 8, edge_count: 12 });
        assert_eq!(viewer.camera().distance, 4.0);
        assert!(viewer.auto_rotate().enabled);
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let endless = ViewerConfig {
            friction: 1.0,
            ..ViewerConfig::default()
        };
        assert!(matches!(Viewer::try_new(endless), Err(ConfigError::Invalid(_))));

        let inverted = ViewerConfig {
            zoom_min: 10.0,
            zoom_max: 1.0,
            ..ViewerConfig::default()
        };
        assert!(Viewer::try_new(inverted).is_err());

        let viewer = Viewer::try_new(ViewerConfig::default()).unwrap();
        assert_eq!(viewer.camera().distance, 4.0);
    }

    #[test]
    fn test_frame_draw_protocol() {
        let mut viewer = still_viewer();
        viewer.set_stroke_color("#ff00ff");
        viewer.set_line_width(2.5);
        let mut surface = RecordingSurface::new(800.0, 600.0);

        viewer.run_frame(&mut surface);

        let commands = surface.commands.clone();
        assert_eq!(commands[0], DrawCommand::Clear("#000000".to_string()));
        assert_eq!(commands[1], DrawCommand::StrokeColor("#ff00ff".to_string()));
        assert_eq!(commands[2], DrawCommand::StrokeWidth(2.5));
        assert_eq!(commands[3], DrawCommand::BeginPath);
        assert_eq!(commands.last(), Some(&DrawCommand::Stroke));
        assert_eq!(surface.segments().len(), 12);
    }

    #[test]
    fn test_queued_events_apply_before_render() {
        let mut viewer = still_viewer();
        viewer.push_event(InputEvent::PointerDown {
            position: Point2::new(0.0, 0.0),
            button: PointerButton::Secondary,
        });
        viewer.push_event(InputEvent::PointerMove { position: Point2::new(20.0, 10.0) });
        assert_eq!(viewer.pending_events(), 2);
        assert_eq!(viewer.camera().offset, Vector2::zeros());

        viewer.run_frame(&mut RecordingSurface::new(800.0, 600.0));

        assert_eq!(viewer.pending_events(), 0);
        assert_eq!(viewer.camera().offset, Vector2::new(20.0, 10.0));
    }

    #[test]
    fn test_physics_paused_while_dragging() {
        let mut viewer = Viewer::default();
        viewer.handle_event(&InputEvent::PointerDown {
            position: Point2::new(0.0, 0.0),
            button: PointerButton::Primary,
        });
        viewer.handle_event(&InputEvent::PointerMove { position: Point2::new(10.0, 0.0) });
        let held = viewer.orientation();

        let mut surface = RecordingSurface::new(800.0, 600.0);
        viewer.run_frame(&mut surface);
        viewer.run_frame(&mut surface);
        assert_eq!(viewer.orientation(), held);

        viewer.handle_event(&InputEvent::PointerUp);
        viewer.run_frame(&mut surface);
        // Momentum 0.1 plus auto-rotate 0.01
        assert!((viewer.orientation().y - (held.y + 0.11)).abs() < 1e-12);
    }

    #[test]
    fn test_set_zoom_distance_clamps() {
        let mut viewer = Viewer::default();
        viewer.set_zoom_distance(1000.0);
        assert_eq!(viewer.camera().distance, 50.0);
        viewer.set_zoom_distance(0.0);
        assert_eq!(viewer.camera().distance, 0.5);
        viewer.set_zoom_distance(7.0);
        assert_eq!(viewer.camera().distance, 7.0);
    }

    #[test]
    fn test_reset_view() {
        let mut viewer = still_viewer();
        viewer.handle_event(&InputEvent::PointerDown {
            position: Point2::new(0.0, 0.0),
            button: PointerButton::Primary,
        });
        viewer.handle_event(&InputEvent::PointerMove { position: Point2::new(30.0, 20.0) });
        viewer.handle_event(&InputEvent::PointerDown {
            position: Point2::new(0.0, 0.0),
            button: PointerButton::Secondary,
        });
        viewer.handle_event(&InputEvent::PointerMove { position: Point2::new(5.0, 5.0) });
        viewer.handle_event(&InputEvent::Wheel { delta_y: 600.0 });

        viewer.reset_view();

        assert_eq!(viewer.orientation(), Orientation::zero());
        assert!(viewer.velocity().is_at_rest());
        assert_eq!(viewer.camera().offset, Vector2::zeros());
        assert_eq!(viewer.camera().distance, 4.0);
    }

    #[test]
    fn test_fit_view_keeps_momentum() {
        let mut viewer = still_viewer();
        viewer.handle_event(&InputEvent::PointerDown {
            position: Point2::new(0.0, 0.0),
            button: PointerButton::Primary,
        });
        viewer.handle_event(&InputEvent::PointerMove { position: Point2::new(30.0, 20.0) });
        viewer.fit_view();
        assert_eq!(viewer.orientation(), Orientation::zero());
        assert!(!viewer.velocity().is_at_rest());
    }

    #[test]
    fn test_fit_view_respects_zoom_bounds() {
        let mut viewer = Viewer::new(ViewerConfig {
            zoom_min: 5.0,
            ..ViewerConfig::default()
        });
        viewer.fit_view();
        assert_eq!(viewer.camera().distance, 5.0);
    }

    #[test]
    fn test_style_rejects_bad_width() {
        let mut viewer = Viewer::default();
        viewer.set_line_width(-1.0);
        viewer.set_line_width(f64::NAN);
        assert_eq!(viewer.style().line_width, 1.0);
    }
}
