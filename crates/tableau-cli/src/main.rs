use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tableau_core::{LoadedScene, Renderer, SceneDescription};
use tracing::info;

#[derive(Parser)]
#[command(name = "tableau")]
#[command(about = "Render Tableau scene descriptions to PNG frames")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single frame
    Render {
        /// Scene description (JSON)
        scene: PathBuf,

        /// Timeline position in milliseconds
        #[arg(short, long, default_value_t = 0.0)]
        time: f64,

        /// Output PNG file
        #[arg(short, long, default_value = "frame.png")]
        out: PathBuf,
    },

    /// Render a numbered frame sequence
    Frames {
        /// Scene description (JSON)
        scene: PathBuf,

        /// Frames per second
        #[arg(long, default_value_t = 30)]
        fps: u32,

        /// Length in milliseconds (defaults to the scene duration)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Output directory
        #[arg(short, long, default_value = "frames")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tableau=info,tableau_core=warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { scene, time, out } => cmd_render(&scene, time, &out),
        Commands::Frames {
            scene,
            fps,
            duration,
            out_dir,
        } => cmd_frames(&scene, fps, duration, &out_dir),
    }
}

fn load_scene(path: &Path) -> Result<LoadedScene> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read scene file {}", path.display()))?;
    let scene = SceneDescription::from_json(&json)
        .and_then(SceneDescription::build)
        .with_context(|| format!("failed to load scene {}", path.display()))?;
    Ok(scene)
}

fn cmd_render(scene_path: &Path, time: f64, out: &Path) -> Result<()> {
    let LoadedScene {
        mut graph,
        root,
        surface,
        ..
    } = load_scene(scene_path)?;

    let mut renderer = Renderer::from_config(&surface).context("failed to create surface")?;
    renderer.render_frame(&mut graph, root, time)?;
    renderer
        .surface()
        .save_png(out)
        .with_context(|| format!("failed to write {}", out.display()))?;

    info!(time, out = %out.display(), "rendered frame");
    Ok(())
}

fn cmd_frames(scene_path: &Path, fps: u32, duration: Option<f64>, out_dir: &Path) -> Result<()> {
    if fps == 0 {
        bail!("--fps must be at least 1");
    }
    let LoadedScene {
        mut graph,
        root,
        surface,
        duration: scene_duration,
    } = load_scene(scene_path)?;
    let duration = duration.unwrap_or(scene_duration);
    if !(duration >= 0.0) {
        bail!("duration must be >= 0, got {duration}");
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let frame_ms = 1000.0 / f64::from(fps);
    let count = (duration / frame_ms).floor() as u64 + 1;
    let mut renderer = Renderer::from_config(&surface).context("failed to create surface")?;

    for frame in 0..count {
        let time = frame as f64 * frame_ms;
        renderer.render_frame(&mut graph, root, time)?;
        let path = out_dir.join(format!("frame_{frame:05}.png"));
        renderer
            .surface()
            .save_png(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    info!(count, fps, duration, out_dir = %out_dir.display(), "rendered frames");
    Ok(())
}
