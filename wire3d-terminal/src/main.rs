/// Wire3D Terminal Viewer
///
/// Usage: wire3d-terminal [mesh.obj] [--config viewer.json]
///
/// Controls:
///   - Left drag: Rotate (releases keep spinning)
///   - Right/middle drag: Pan
///   - Scroll: Zoom
///   - Arrows / WASD: Flick the model
///   - R: Reset view, F: Fit view
///   - Space: Toggle auto-rotate, +/-: Auto-rotate speed
///   - Q/ESC: Quit

use std::io;
use tracing_subscriber::EnvFilter;
use wire3d_terminal::{Options, TerminalApp};

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let options = Options::parse(std::env::args().skip(1))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let viewer = options.build_viewer()?;

    println!("Wire3D Terminal Viewer | {}", viewer.status());
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(viewer)?;
    app.run()?;

    println!("Thank you for using Wire3D!");
    Ok(())
}
