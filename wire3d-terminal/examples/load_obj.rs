/// Example: Load an OBJ file, or a built-in tetrahedron, and view it in the terminal
///
/// Usage: cargo run --example load_obj -- path/to/file.obj

use std::env;
use std::fs;
use std::io;
use wire3d_core::Viewer;
use wire3d_terminal::{terminal_config, TerminalApp};

const TETRAHEDRON: &str = "\
# regular tetrahedron
v 1 1 1
v -1 -1 1
v -1 1 -1
v 1 -1 -1
f 1 2 3
f 1 4 2
f 1 3 4
f 2 4 3
";

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let text = match args.get(1) {
        Some(path) => {
            println!("Loading OBJ file: {}", path);
            fs::read_to_string(path)
                .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("Failed to read OBJ file: {}", e)))?
        }
        None => {
            eprintln!("Usage: {} <obj-file>", args[0]);
            eprintln!("\nNo OBJ file provided, using a tetrahedron...");
            TETRAHEDRON.to_string()
        }
    };

    let mut viewer = Viewer::new(terminal_config());
    let outcome = viewer
        .load_mesh(&text)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Failed to parse OBJ: {}", e)))?;

    println!("Loaded {}", outcome.status());
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(viewer)?;
    app.run()?;

    println!("Thank you for using Wire3D!");
    Ok(())
}
