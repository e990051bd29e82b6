/// The drawing surface contract the render loop talks to
use crate::projection::Viewport;

/// A 2D line-drawing target owned by the host
pub trait Surface {
    /// Current pixel dimensions
    fn viewport(&self) -> Viewport;

    /// Fill the whole surface with `color`
    fn clear(&mut self, color: &str);

    fn set_stroke_color(&mut self, color: &str);

    fn set_stroke_width(&mut self, width: f64);

    fn begin_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    /// Draw every segment added since `begin_path`
    fn stroke(&mut self);
}

/// A recorded call on a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(String),
    StrokeColor(String),
    StrokeWidth(f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
}

/// Headless surface that records draw calls, for tests and offline hosts
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            commands: Vec::new(),
        }
    }

    /// Segments drawn in the most recent frame as `(start, end)` pairs
    pub fn segments(&self) -> Vec<((f64, f64), (f64, f64))> {
        let frame_start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
            .unwrap_or(0);

        let mut segments = Vec::new();
        let mut pen = None;
        for command in &self.commands[frame_start..] {
            match *command {
                DrawCommand::MoveTo(x, y) => pen = Some((x, y)),
                DrawCommand::LineTo(x, y) => {
                    if let Some(start) = pen {
                        segments.push((start, (x, y)));
                    }
                    pen = Some((x, y));
                }
                _ => {}
            }
        }
        segments
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self, color: &str) {
        self.commands.push(DrawCommand::Clear(color.to_string()));
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.commands.push(DrawCommand::StrokeColor(color.to_string()));
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::StrokeWidth(width));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
}
