/// Pointer, touch and wheel handling: raw host events come in as [`InputEvent`]
/// and the [`InteractionController`] gesture state machine applies them to the
/// [`ViewState`]
use nalgebra::{center, distance, Point2};
use tracing::debug;

use crate::config::ViewerConfig;
use crate::projection::Camera;
use crate::transform::{Orientation, Velocity};

/// Which button started a pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Rotates the model
    Primary,
    /// Pans the view
    Secondary,
}

/// A single input event in screen-space pixels
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        position: Point2<f64>,
        button: PointerButton,
    },
    PointerMove {
        position: Point2<f64>,
    },
    PointerUp,
    /// Contacts currently on the surface after a new one landed
    TouchStart {
        touches: Vec<Point2<f64>>,
    },
    TouchMove {
        touches: Vec<Point2<f64>>,
    },
    TouchEnd,
    Wheel {
        delta_y: f64,
    },
}

/// Gesture state machine state, with the baselines each gesture tracks
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    #[default]
    Idle,
    Dragging {
        last: Point2<f64>,
    },
    Panning {
        last: Point2<f64>,
    },
    /// Two contacts. `distance` of 0 means no pinch baseline yet.
    PanAndPinch {
        midpoint: Point2<f64>,
        distance: f64,
    },
}

impl InputState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging { .. } => "dragging",
            Self::Panning { .. } => "panning",
            Self::PanAndPinch { .. } => "pan-and-pinch",
        }
    }
}

/// The mutable view parameters input events act on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub orientation: Orientation,
    pub velocity: Velocity,
    pub camera: Camera,
}

impl ViewState {
    pub fn new(distance: f64) -> Self {
        Self {
            orientation: Orientation::zero(),
            velocity: Velocity::zero(),
            camera: Camera::new(distance),
        }
    }
}

/// Gesture state machine driving a [`ViewState`]
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InputState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    /// Apply one event. Events carrying non-finite coordinates are dropped.
    pub fn handle(&mut self, event: &InputEvent, view: &mut ViewState, config: &ViewerConfig) {
        match event {
            InputEvent::PointerDown { position, button } => {
                if !is_finite(position) {
                    return;
                }
                match button {
                    PointerButton::Primary => self.begin_drag(*position, view),
                    PointerButton::Secondary => self.transition(InputState::Panning { last: *position }),
                }
            }
            InputEvent::PointerMove { position } => {
                if is_finite(position) {
                    self.pointer_moved(*position, view, config);
                }
            }
            InputEvent::PointerUp | InputEvent::TouchEnd => self.transition(InputState::Idle),
            InputEvent::TouchStart { touches } => {
                if !touches.iter().all(is_finite) {
                    return;
                }
                match touches.as_slice() {
                    [] => {}
                    [only] => self.begin_drag(*only, view),
                    [a, b, ..] => self.transition(InputState::PanAndPinch {
                        midpoint: center(a, b),
                        distance: distance(a, b),
                    }),
                }
            }
            InputEvent::TouchMove { touches } => {
                if !touches.iter().all(is_finite) {
                    return;
                }
                match touches.as_slice() {
                    [] => {}
                    [only] => {
                        if self.state.is_dragging() {
                            self.pointer_moved(*only, view, config);
                        }
                    }
                    [a, b, ..] => self.pan_and_pinch(*a, *b, view, config),
                }
            }
            InputEvent::Wheel { delta_y } => {
                if delta_y.is_finite() {
                    view.camera.zoom_by(
                        delta_y * config.wheel_sensitivity,
                        config.zoom_min,
                        config.zoom_max,
                    );
                }
            }
        }
    }

    fn transition(&mut self, next: InputState) {
        if self.state.name() != next.name() {
            debug!(from = self.state.name(), to = next.name(), "input state changed");
        }
        self.state = next;
    }

    /// Grabbing the model cancels any momentum left from the last drag
    fn begin_drag(&mut self, position: Point2<f64>, view: &mut ViewState) {
        view.velocity = Velocity::zero();
        self.transition(InputState::Dragging { last: position });
    }

    fn pointer_moved(&mut self, position: Point2<f64>, view: &mut ViewState, config: &ViewerConfig) {
        match &mut self.state {
            InputState::Dragging { last } => {
                let delta = position - *last;
                *last = position;

                let dx = delta.x * config.drag_sensitivity;
                let dy = delta.y * config.drag_sensitivity;
                view.orientation.rotate(dy, dx);
                // Set, not accumulated: the last step is what carries on after release
                view.velocity = Velocity::new(dy, dx);
            }
            InputState::Panning { last } => {
                let delta = position - *last;
                *last = position;
                view.camera.pan(delta);
            }
            InputState::Idle | InputState::PanAndPinch { .. } => {}
        }
    }

    fn pan_and_pinch(
        &mut self,
        a: Point2<f64>,
        b: Point2<f64>,
        view: &mut ViewState,
        config: &ViewerConfig,
    ) {
        // A second finger can arrive without a fresh touch start
        if !matches!(self.state, InputState::PanAndPinch { .. }) {
            self.transition(InputState::PanAndPinch {
                midpoint: center(&a, &b),
                distance: 0.0,
            });
        }

        if let InputState::PanAndPinch { midpoint, distance: baseline } = &mut self.state {
            let mid = center(&a, &b);
            view.camera.pan(mid - *midpoint);
            *midpoint = mid;

            let separation = distance(&a, &b);
            if *baseline > 0.0 {
                // Fingers moving apart zoom in
                view.camera.zoom_by(
                    -(separation - *baseline) * config.pinch_sensitivity,
                    config.zoom_min,
                    config.zoom_max,
                );
            }
            *baseline = separation;
        }
    }
}

fn is_finite(p: &Point2<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (InteractionController, ViewState, ViewerConfig) {
        (InteractionController::new(), ViewState::new(4.0), ViewerConfig::default())
    }

    fn touches(points: &[(f64, f64)]) -> Vec<Point2<f64>> {
        points.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn test_drag_rotates_and_sets_velocity() {
        let (mut controller, mut view, config) = setup();
        controller.handle(
            &InputEvent::PointerDown { position: Point2::new(100.0, 100.0), button: PointerButton::Primary },
            &mut view,
            &config,
        );
        controller.handle(&InputEvent::PointerMove { position: Point2::new(110.0, 115.0) }, &mut view, &config);

        assert!((view.orientation.y - 0.10).abs() < 1e-12);
        assert!((view.orientation.x - 0.15).abs() < 1e-12);
        assert!((view.velocity.x - 0.15).abs() < 1e-12);
        assert!((view.velocity.y - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_is_set_not_accumulated() {
        let (mut controller, mut view, config) = setup();
        controller.handle(
            &InputEvent::PointerDown { position: Point2::new(0.0, 0.0), button: PointerButton::Primary },
            &mut view,
            &config,
        );
        controller.handle(&InputEvent::PointerMove { position: Point2::new(50.0, 0.0) }, &mut view, &config);
        controller.handle(&InputEvent::PointerMove { position: Point2::new(52.0, 0.0) }, &mut view, &config);

        assert!((view.orientation.y - 0.52).abs() < 1e-12);
        assert!((view.velocity.y - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_press_cancels_momentum() {
        let (mut controller, mut view, config) = setup();
        view.velocity = Velocity::new(0.3, 0.4);
        controller.handle(&InputEvent::TouchStart { touches: touches(&[(5.0, 5.0)]) }, &mut view, &config);
        assert!(view.velocity.is_at_rest());
        assert!(controller.state().is_dragging());
    }

    #[test]
    fn test_secondary_button_pans_without_rotation() {
        let (mut controller, mut view, config) = setup();
        controller.handle(
            &InputEvent::PointerDown { position: Point2::new(10.0, 10.0), button: PointerButton::Secondary },
            &mut view,
            &config,
        );
        controller.handle(&InputEvent::PointerMove { position: Point2::new(40.0, -10.0) }, &mut view, &config);

        assert_eq!(view.camera.offset.x, 30.0);
        assert_eq!(view.camera.offset.y, -20.0);
        assert_eq!(view.orientation, Orientation::zero());
    }

    #[test]
    fn test_moves_while_idle_are_ignored() {
        let (mut controller, mut view, config) = setup();
        let before = view;
        controller.handle(&InputEvent::PointerMove { position: Point2::new(40.0, 40.0) }, &mut view, &config);
        assert_eq!(view, before);
    }

    #[test]
    fn test_release_returns_to_idle() {
        let (mut controller, mut view, config) = setup();
        controller.handle(&InputEvent::TouchStart { touches: touches(&[(0.0, 0.0), (10.0, 0.0)]) }, &mut view, &config);
        controller.handle(&InputEvent::TouchEnd, &mut view, &config);
        assert_eq!(controller.state(), InputState::Idle);
    }

    #[test]
    fn test_pinch_zooms_and_pans_by_midpoint() {
        let (mut controller, mut view, config) = setup();
        controller.handle(&InputEvent::TouchStart { touches: touches(&[(0.0, 0.0), (100.0, 0.0)]) }, &mut view, &config);
        assert_eq!(
            controller.state(),
            InputState::PanAndPinch { midpoint: Point2::new(50.0, 0.0), distance: 100.0 }
        );

        // Spread by 10px and shift the midpoint by (5, 3)
        controller.handle(&InputEvent::TouchMove { touches: touches(&[(0.0, 3.0), (110.0, 3.0)]) }, &mut view, &config);

        assert!((view.camera.distance - 3.0).abs() < 1e-12);
        assert!((view.camera.offset.x - 5.0).abs() < 1e-12);
        assert!((view.camera.offset.y - 3.0).abs() < 1e-12);
        assert_eq!(
            controller.state(),
            InputState::PanAndPinch { midpoint: Point2::new(55.0, 3.0), distance: 110.0 }
        );
    }

    #[test]
    fn test_first_pinch_step_without_baseline_is_suppressed() {
        let (mut controller, mut view, config) = setup();
        controller.handle(&InputEvent::TouchMove { touches: touches(&[(0.0, 0.0), (100.0, 0.0)]) }, &mut view, &config);
        assert_eq!(view.camera.distance, 4.0);
        controller.handle(&InputEvent::TouchMove { touches: touches(&[(0.0, 0.0), (90.0, 0.0)]) }, &mut view, &config);
        // Midpoint moved by -5 and fingers closed by 10
        assert!((view.camera.distance - 5.0).abs() < 1e-12);
        assert!((view.camera.offset.x + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_pinch_from_drag_keeps_velocity() {
        let (mut controller, mut view, config) = setup();
        controller.handle(&InputEvent::TouchStart { touches: touches(&[(0.0, 0.0)]) }, &mut view, &config);
        controller.handle(&InputEvent::TouchMove { touches: touches(&[(4.0, 2.0)]) }, &mut view, &config);
        let velocity = view.velocity;
        controller.handle(&InputEvent::TouchStart { touches: touches(&[(4.0, 2.0), (60.0, 2.0)]) }, &mut view, &config);
        assert_eq!(view.velocity, velocity);
        assert!(!controller.state().is_dragging());
    }

    #[test]
    fn test_wheel_zoom() {
        let (mut controller, mut view, config) = setup();
        controller.handle(&InputEvent::Wheel { delta_y: 1000.0 }, &mut view, &config);
        assert!((view.camera.distance - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_stays_clamped_after_every_step() {
        let (mut controller, mut view, config) = setup();
        let deltas = [5000.0, 20000.0, -100000.0, 300.0, -7.0, f64::NAN, 1e9];
        for delta_y in deltas {
            controller.handle(&InputEvent::Wheel { delta_y }, &mut view, &config);
            assert!(view.camera.distance >= config.zoom_min && view.camera.distance <= config.zoom_max);
        }

        controller.handle(&InputEvent::TouchStart { touches: touches(&[(0.0, 0.0), (1.0, 0.0)]) }, &mut view, &config);
        for spread in [1000.0, 2.0, 5000.0, 1.5] {
            controller.handle(&InputEvent::TouchMove { touches: touches(&[(0.0, 0.0), (spread, 0.0)]) }, &mut view, &config);
            assert!(view.camera.distance >= config.zoom_min && view.camera.distance <= config.zoom_max);
        }
    }

    #[test]
    fn test_non_finite_positions_are_dropped() {
        let (mut controller, mut view, config) = setup();
        controller.handle(
            &InputEvent::PointerDown { position: Point2::new(f64::NAN, 0.0), button: PointerButton::Primary },
            &mut view,
            &config,
        );
        assert_eq!(controller.state(), InputState::Idle);
    }
}
