/// Wire3D Core Library - Wireframe geometry, input and projection engine
///
/// This library owns everything a host needs to show an interactive wireframe:
/// mesh text loading, normalization, the rotation/projection pipeline, the
/// pointer and touch gesture state machine, and momentum physics. Hosts supply
/// a [`Surface`] to draw on and call [`Viewer::run_frame`] once per frame.

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod obj;
pub mod physics;
pub mod projection;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use config::{RenderStyle, ViewerConfig};
pub use engine::{LoadOutcome, Viewer};
pub use error::{ConfigError, LoadError};
pub use geometry::{Edge, Geometry, MeshStatus, Vertex};
pub use input::{InputEvent, InputState, InteractionController, PointerButton, ViewState};
pub use physics::AutoRotate;
pub use projection::{Camera, Viewport};
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use transform::{Orientation, Velocity};
pub use nalgebra::{Point2, Vector2};
