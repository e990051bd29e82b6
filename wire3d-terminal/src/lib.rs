/// Terminal host for the wireframe viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::fs;
use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use wire3d_core::{InputEvent, Point2, PointerButton, Viewer, ViewerConfig};

pub mod renderer;

pub use renderer::CharSurface;
use renderer::ROW_SCALE;

/// Wheel delta sent per scroll notch; terminals report notches, not pixels
const SCROLL_STEP: f64 = 100.0;
/// Cells moved by a synthetic drag when an arrow key is pressed
const NUDGE_CELLS: f64 = 4.0;
const AUTO_ROTATE_STEP: f64 = 0.005;

/// Tuning that suits character cells rather than pixels
pub fn terminal_config() -> ViewerConfig {
    ViewerConfig {
        fov: 40.0,
        drag_sensitivity: 0.05,
        pinch_sensitivity: 0.5,
        ..ViewerConfig::default()
    }
}

/// Command-line options: `[mesh.obj] [--config viewer.json]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub mesh: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl Options {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, String> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().ok_or("--config needs a path")?;
                    options.config = Some(PathBuf::from(path));
                }
                flag if flag.starts_with('-') => return Err(format!("unknown option `{flag}`")),
                _ if options.mesh.is_some() => return Err(format!("unexpected argument `{arg}`")),
                _ => options.mesh = Some(PathBuf::from(&arg)),
            }
        }
        Ok(options)
    }

    /// Build the viewer these options describe
    pub fn build_viewer(&self) -> io::Result<Viewer> {
        let config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                ViewerConfig::from_json(&text)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
            }
            None => terminal_config(),
        };

        let mut viewer =
            Viewer::try_new(config).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if let Some(path) = &self.mesh {
            let text = fs::read_to_string(path)?;
            let outcome = viewer
                .load_mesh(&text)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            info!(path = %path.display(), status = %outcome.status(), "mesh file loaded");
        }
        Ok(viewer)
    }
}

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp {
    viewer: Viewer,
    surface: CharSurface,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(viewer: Viewer) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            viewer,
            surface: CharSurface::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Queue everything that arrived since the last frame
            while event::poll(Duration::from_millis(0))? {
                self.handle_input(event::read()?);
            }

            self.viewer.run_frame(&mut self.surface);
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Translate one terminal event into viewer calls
    pub fn handle_input(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.on_key(key),
            Event::Mouse(mouse) => self.on_mouse(mouse),
            Event::Resize(width, height) => self.surface.resize(width as usize, height as usize),
            _ => {}
        }
    }

    fn on_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('r') => self.viewer.reset_view(),
            KeyCode::Char('f') => self.viewer.fit_view(),
            KeyCode::Char(' ') => {
                let enabled = !self.viewer.auto_rotate().enabled;
                self.viewer.set_auto_rotate(enabled);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let speed = self.viewer.auto_rotate().speed + AUTO_ROTATE_STEP;
                self.viewer.set_auto_rotate_speed(speed);
            }
            KeyCode::Char('-') => {
                let speed = self.viewer.auto_rotate().speed - AUTO_ROTATE_STEP;
                self.viewer.set_auto_rotate_speed(speed);
            }
            KeyCode::Up | KeyCode::Char('w') => self.nudge(0.0, -NUDGE_CELLS),
            KeyCode::Down | KeyCode::Char('s') => self.nudge(0.0, NUDGE_CELLS),
            KeyCode::Left | KeyCode::Char('a') => self.nudge(-NUDGE_CELLS, 0.0),
            KeyCode::Right | KeyCode::Char('d') => self.nudge(NUDGE_CELLS, 0.0),
            _ => {}
        }
    }

    /// A short drag-and-release, so arrow keys flick the model with momentum
    fn nudge(&mut self, dx: f64, dy: f64) {
        let origin = Point2::origin();
        self.viewer.push_event(InputEvent::PointerDown {
            position: origin,
            button: PointerButton::Primary,
        });
        self.viewer.push_event(InputEvent::PointerMove {
            position: Point2::new(dx, dy * ROW_SCALE),
        });
        self.viewer.push_event(InputEvent::PointerUp);
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let position = Point2::new(mouse.column as f64, mouse.row as f64 * ROW_SCALE);
        let event = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => InputEvent::PointerDown {
                position,
                button: PointerButton::Primary,
            },
            MouseEventKind::Down(_) => InputEvent::PointerDown {
                position,
                button: PointerButton::Secondary,
            },
            MouseEventKind::Drag(_) => InputEvent::PointerMove { position },
            MouseEventKind::Up(_) => InputEvent::PointerUp,
            MouseEventKind::ScrollDown => InputEvent::Wheel {
                delta_y: SCROLL_STEP,
            },
            MouseEventKind::ScrollUp => InputEvent::Wheel {
                delta_y: -SCROLL_STEP,
            },
            _ => return,
        };
        self.viewer.push_event(event);
    }

    fn render(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.surface.draw(&mut stdout)?;

        // Draw UI overlay
        let auto_rotate = self.viewer.auto_rotate();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Wire3D | {} | Zoom {:.2} | Auto-rotate {} ({:.3}) | FPS: {:.1} | Drag=Rotate Right-drag=Pan Wheel=Zoom R=Reset F=Fit Space=Spin Q=Quit",
                self.viewer.status(),
                self.viewer.camera().distance,
                if auto_rotate.enabled { "on" } else { "off" },
                auto_rotate.speed,
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseEvent};

    fn app() -> TerminalApp {
        TerminalApp {
            viewer: Viewer::new(terminal_config()),
            surface: CharSurface::new(80, 24),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_parse_options() {
        let args = ["bunny.obj", "--config", "viewer.json"].map(String::from);
        let options = Options::parse(args).unwrap();
        assert_eq!(options.mesh, Some(PathBuf::from("bunny.obj")));
        assert_eq!(options.config, Some(PathBuf::from("viewer.json")));

        assert_eq!(Options::parse(Vec::new()).unwrap(), Options::default());
        assert!(Options::parse(["--config".to_string()]).is_err());
        assert!(Options::parse(["--verbose".to_string()]).is_err());
        assert!(Options::parse(["a.obj", "b.obj"].map(String::from)).is_err());
    }

    #[test]
    fn test_build_viewer_uses_terminal_tuning() {
        let viewer = Options::default().build_viewer().unwrap();
        assert_eq!(viewer.config(), &terminal_config());
    }

    #[test]
    fn test_right_drag_pans() {
        let mut app = app();
        app.handle_input(mouse(MouseEventKind::Down(MouseButton::Right), 10, 5));
        app.handle_input(mouse(MouseEventKind::Drag(MouseButton::Right), 14, 6));
        app.handle_input(mouse(MouseEventKind::Up(MouseButton::Right), 14, 6));
        app.viewer.run_frame(&mut app.surface);

        let offset = app.viewer().camera().offset;
        assert_eq!((offset.x, offset.y), (4.0, 2.0));
    }

    #[test]
    fn test_scroll_zooms() {
        let mut app = app();
        app.handle_input(mouse(MouseEventKind::ScrollDown, 0, 0));
        app.viewer.run_frame(&mut app.surface);
        assert!((app.viewer().camera().distance - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_quit_key() {
        let mut app = app();
        app.handle_input(Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(!app.running);
    }

    #[test]
    fn test_space_toggles_auto_rotate() {
        let mut app = app();
        assert!(app.viewer().auto_rotate().enabled);
        app.handle_input(Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert!(!app.viewer().auto_rotate().enabled);
    }

    #[test]
    fn test_frame_draws_cube_into_cells() {
        let mut app = app();
        app.viewer.set_auto_rotate(false);
        app.viewer.run_frame(&mut app.surface);
        let drawn = (0..24)
            .flat_map(|row| (0..80).map(move |col| (col, row)))
            .filter(|&(col, row)| app.surface.cell(col, row) != Some(' '))
            .count();
        assert!(drawn > 0);
    }
}
