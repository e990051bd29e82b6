/// Wire3D Web - WASM host driving a 2D canvas
///
/// The JS glue forwards DOM pointer, touch and wheel events to [`WebViewer`]
/// and calls [`WebViewer::frame`] from `requestAnimationFrame`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wire3d_core::{InputEvent, Point2, PointerButton, Surface, Viewer, ViewerConfig, Viewport};

/// [`Surface`] over a canvas 2D context
struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl Surface for CanvasSurface {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self, color: &str) {
        let viewport = self.viewport();
        self.context.set_fill_style_str(color);
        self.context
            .fill_rect(0.0, 0.0, viewport.width, viewport.height);
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.context.set_stroke_style_str(color);
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.context.set_line_width(width);
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }
}

/// Browser-facing viewer bound to one canvas element
#[wasm_bindgen]
pub struct WebViewer {
    viewer: Viewer,
    surface: CanvasSurface,
}

#[wasm_bindgen]
impl WebViewer {
    /// Bind to the canvas with id `canvas_id`. `config_json` may be empty.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_json: &str) -> Result<WebViewer, JsValue> {
        let config = if config_json.trim().is_empty() {
            ViewerConfig::default()
        } else {
            ViewerConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id `{canvas_id}`")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("`{canvas_id}` is not a canvas")))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        tracing::info!(canvas = canvas_id, "web viewer attached");
        let viewer = Viewer::try_new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WebViewer {
            viewer,
            surface: CanvasSurface { canvas, context },
        })
    }

    /// Render one frame
    pub fn frame(&mut self) {
        self.viewer.run_frame(&mut self.surface);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.canvas.set_width(width);
        self.surface.canvas.set_height(height);
    }

    /// `button` follows `MouseEvent.button`: 2 pans, anything else rotates
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16) {
        let button = if button == 2 {
            PointerButton::Secondary
        } else {
            PointerButton::Primary
        };
        self.viewer.push_event(InputEvent::PointerDown {
            position: Point2::new(x, y),
            button,
        });
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.viewer.push_event(InputEvent::PointerMove {
            position: Point2::new(x, y),
        });
    }

    pub fn pointer_up(&mut self) {
        self.viewer.push_event(InputEvent::PointerUp);
    }

    /// Touch coordinates as a flat `[x0, y0, x1, y1, ...]` list
    pub fn touch_start(&mut self, coords: &[f64]) {
        self.viewer.push_event(InputEvent::TouchStart {
            touches: touch_points(coords),
        });
    }

    pub fn touch_move(&mut self, coords: &[f64]) {
        self.viewer.push_event(InputEvent::TouchMove {
            touches: touch_points(coords),
        });
    }

    pub fn touch_end(&mut self) {
        self.viewer.push_event(InputEvent::TouchEnd);
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.viewer.push_event(InputEvent::Wheel { delta_y });
    }

    /// Replace the mesh from OBJ text; returns the status line or throws
    pub fn load_mesh(&mut self, text: &str) -> Result<String, JsValue> {
        self.viewer
            .load_mesh(text)
            .map(|outcome| outcome.status().to_string())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn status(&self) -> String {
        self.viewer.status().to_string()
    }

    /// Current zoom distance, for syncing a zoom slider
    pub fn zoom_distance(&self) -> f64 {
        self.viewer.camera().distance
    }

    pub fn set_zoom_distance(&mut self, distance: f64) {
        self.viewer.set_zoom_distance(distance);
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.viewer.set_auto_rotate(enabled);
    }

    pub fn set_auto_rotate_speed(&mut self, speed: f64) {
        self.viewer.set_auto_rotate_speed(speed);
    }

    pub fn reset_view(&mut self) {
        self.viewer.reset_view();
    }

    pub fn fit_view(&mut self) {
        self.viewer.fit_view();
    }

    pub fn set_stroke_color(&mut self, color: &str) {
        self.viewer.set_stroke_color(color);
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.viewer.set_line_width(width);
    }

    pub fn set_background(&mut self, color: &str) {
        self.viewer.set_background(color);
    }
}

/// Pair up flat coordinates; a trailing odd value is dropped
fn touch_points(coords: &[f64]) -> Vec<Point2<f64>> {
    coords
        .chunks_exact(2)
        .map(|pair| Point2::new(pair[0], pair[1]))
        .collect()
}

/// Initialize WASM module with panic hook and logging
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("Wire3D web module initialized");
    Ok(())
}
