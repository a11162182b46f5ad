mod script;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_assets::{demo_scene, load_scene};
use folio_render::DebugTextRenderer;
use folio_session::{Session, SessionConfig};
use folio_tools::{FrameTimer, SessionInspector};
use tracing_subscriber::EnvFilter;

use crate::script::parse_script;

#[derive(Parser)]
#[command(name = "folio-cli", about = "Inspect portfolio scenes and run them headless")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the default configuration
    Info,
    /// Load a scene and print node roles, collision and interaction setup
    Inspect {
        /// Scene document (JSON)
        scene: PathBuf,
    },
    /// Drive the frame loop headless and print UI events
    Simulate {
        /// Scene document, or `demo` for the built-in scene
        #[arg(long, default_value = "demo")]
        scene: String,
        /// Session config (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Frames per second of simulated wall time
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Scripted input, e.g. `10:key=w,20:pointer=400x300,21:click`
        #[arg(long, default_value = "")]
        script: String,
        /// Print a text rendering of the final frame
        #[arg(long)]
        render: bool,
    },
    /// Write the built-in demo scene as JSON
    ExportDemo {
        /// Output path
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("folio-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", folio_common::crate_info());
            println!("scene: {}", folio_scene::crate_info());
            println!("assets: {}", folio_assets::crate_info());
            println!("collide: {}", folio_collide::crate_info());
            println!("input: {}", folio_input::crate_info());
            println!("character: {}", folio_character::crate_info());
            println!("picking: {}", folio_picking::crate_info());
            println!("render: {}", folio_render::crate_info());
            println!("session: {}", folio_session::crate_info());
            println!("tools: {}", folio_tools::crate_info());
            println!("\nDefault configuration:");
            print!("{}", SessionConfig::default().to_yaml_string()?);
        }
        Commands::Inspect { scene } => {
            let loaded = load_scene(&scene)
                .with_context(|| format!("loading scene {}", scene.display()))?;
            let digest = loaded.id;
            let config = SessionConfig::default();
            let session = Session::new(config, Ok(loaded));
            let graph = session
                .scene()
                .context("scene loaded but session is inert")?;

            println!("Scene '{}' digest={digest}", graph.name());
            println!("\nNodes:");
            for node in SessionInspector::node_roles(graph, &session.config().naming) {
                println!("  {node}");
            }
            if let Some(index) = session.spatial_index() {
                let stats = index.stats();
                println!(
                    "\nSpatial index: triangles={} dropped={} nodes={} depth={}",
                    stats.triangles, stats.dropped_degenerate, stats.nodes, stats.depth
                );
            }
            println!("\nInteractables:");
            for entry in SessionInspector::interactables(&session) {
                println!("  {entry}");
            }
            println!("\n{}", SessionInspector::summary(&session));
        }
        Commands::Simulate {
            scene,
            config,
            frames,
            fps,
            script,
            render,
        } => {
            if !(fps.is_finite() && fps > 0.0) {
                anyhow::bail!("--fps must be positive, got {fps}");
            }
            let mut cfg = match &config {
                Some(path) => SessionConfig::load(path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None if scene == "demo" => SessionConfig::demo(),
                None => SessionConfig::default(),
            };
            if scene != "demo" {
                cfg.asset_path = Some(PathBuf::from(&scene));
            } else if config.is_none() {
                cfg.asset_path = None;
            }
            let steps = parse_script(&script).context("parsing --script")?;

            let mut session = Session::open(cfg);
            if session.is_inert() {
                anyhow::bail!("scene failed to load; see the error above");
            }
            println!("Simulating {frames} frames at {fps} fps");

            let dt = 1.0 / fps;
            let mut timer = FrameTimer::new(frames.clamp(1, 1024) as usize);
            let mut pending = steps.iter().peekable();
            for frame in 0..frames {
                while let Some(step) = pending.next_if(|s| s.frame <= frame) {
                    tracing::debug!(frame, event = ?step.event, "scripted input");
                    session.handle_input(step.event.clone());
                }
                timer.time_frame(&mut session, dt);
                for event in session.drain_ui_events() {
                    println!("[frame {frame:>4}] {event}");
                }
            }
            if pending.peek().is_some() {
                tracing::warn!(
                    remaining = pending.count(),
                    "script steps past the last frame were not delivered"
                );
            }

            println!("\n{}", SessionInspector::summary(&session));
            println!("Timing: {}", timer.stats());
            if render {
                if let Some(text) = session.render(&DebugTextRenderer::new()) {
                    println!("\n{text}");
                }
            }
        }
        Commands::ExportDemo { path } => {
            demo_scene()
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote demo scene to {}", path.display());
        }
    }

    Ok(())
}
