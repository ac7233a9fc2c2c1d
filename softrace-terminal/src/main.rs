//! softrace terminal viewer
//!
//! Renders an OBJ mesh (or a built-in cube) as ASCII art.
//! Controls:
//!   - W/S or Up/Down: move forward/back
//!   - A/D: strafe
//!   - Space/C: move up/down
//!   - Left/Right: turn
//!   - Q/ESC: quit

use clap::Parser;
use nalgebra::Vector3;
use softrace_core::{obj, Mesh, RendererConfig};
use softrace_terminal::TerminalApp;
use std::error::Error;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "softrace-terminal")]
#[command(about = "Software 3D renderer for the terminal", long_about = None)]
struct Cli {
    /// OBJ mesh to display (defaults to a cube)
    #[arg(short, long)]
    mesh: Option<PathBuf>,

    /// Vertical field of view in degrees
    #[arg(long, default_value = "90")]
    fov: f64,

    /// Near clip plane distance
    #[arg(long, default_value = "0.1")]
    near: f64,

    /// Far clip plane distance
    #[arg(long, default_value = "1000")]
    far: f64,

    /// Camera movement speed in units per second
    #[arg(long, default_value = "10")]
    speed: f64,

    /// Distance from the camera start to the mesh origin
    #[arg(long, default_value = "5")]
    distance: f64,

    /// Model spin around the Y axis in radians per second
    #[arg(long, default_value = "0.5")]
    spin: f64,

    /// Suppress all log output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Warn)
            .parse_default_env()
            .init();
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mesh = match &cli.mesh {
        Some(path) => obj::load(path)?,
        None => Mesh::cube(2.0),
    };

    let config = RendererConfig {
        fov: cli.fov,
        near: cli.near,
        far: cli.far,
        speed: cli.speed,
        model_translation: Vector3::new(0.0, 0.0, cli.distance),
        ..RendererConfig::default()
    };
    config.validate()?;

    log::info!("Starting with {} triangles", mesh.len());

    let mut app = TerminalApp::new(mesh, config, cli.spin)?;
    app.run()?;
    Ok(())
}
