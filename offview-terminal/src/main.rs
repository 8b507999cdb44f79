/// offview - render an OFF mesh as ASCII art and explode it interactively
///
/// Controls:
///   - B: Play the explode animation
///   - +/- or Up/Down: Step the explode factor
///   - X: Reset the explosion
///   - R: Toggle auto-rotation
///   - Space: Cycle rotation axis (X, Y, Z)
///   - Left/Right: Rotate manually
///   - C: Toggle depth shading
///   - Q/ESC: Quit
use clap::Parser;
use offview_core::{Mesh, Model, ViewerConfig};
use offview_terminal::{summarize, AppError, TerminalApp};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "offview")]
#[command(version, about = "Terminal viewer for OFF meshes with an explode effect")]
struct Cli {
    /// OFF file to load. A unit cube is shown when omitted.
    path: Option<PathBuf>,

    /// Viewer settings (RON).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print mesh statistics and exit instead of opening the viewer.
    #[arg(short, long)]
    summary: bool,

    /// Initial explode factor in [0, 1].
    #[arg(short, long)]
    explode: Option<f32>,

    /// Check polygons for planarity and convexity.
    #[arg(long, requires = "summary")]
    validate: bool,

    /// Write logs to this file.
    #[arg(long)]
    log: Option<PathBuf>,
}

fn init_logging(cli: &Cli) -> Result<(), AppError> {
    // The interactive viewer owns the terminal, so it only logs to a file.
    let stderr_layer = cli
        .summary
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let file_layer = match &cli.log {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(File::create(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "offview_core=info,offview_terminal=info".into()),
        )
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    init_logging(&cli)?;

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let mut mesh = match &cli.path {
        Some(path) => Mesh::load(path)?,
        None => {
            tracing::info!("No mesh given, showing the default cube");
            Mesh::new(Model::cube(1.0))
        }
    };

    if cli.summary {
        print!("{}", summarize(&mut mesh, cli.validate, cli.explode));
        return Ok(());
    }

    if let Some(factor) = cli.explode {
        mesh.initialize_explosion();
        mesh.set_explode_factor(factor);
    }

    let app = TerminalApp::new(mesh, &config)?;
    let mesh = app.run()?;
    tracing::info!("{} closed", mesh.id());
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_validate_needs_summary() {
        assert!(Cli::try_parse_from(["offview", "--validate"]).is_err());

        let cli = Cli::try_parse_from(["offview", "--summary", "--validate", "cube.off"]).unwrap();
        assert!(cli.summary && cli.validate);
        assert_eq!(cli.path, Some(PathBuf::from("cube.off")));
    }

    #[test]
    fn test_explode_factor() {
        let cli = Cli::try_parse_from(["offview", "--explode", "0.25"]).unwrap();
        assert_eq!(cli.explode, Some(0.25));
        assert!(cli.path.is_none());
    }
}
