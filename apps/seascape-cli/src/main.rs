use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use seascape_common::{CameraInfo, ProceduralSampler};
use seascape_stream::{FramePipeline, LodSelector, SeascapeConfig};
use seascape_tools::{LodInspector, WaveInspector};
use seascape_wave::{WaveSimulator, as_bytes};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seascape-cli", about = "Drive the seascape LOD and wave core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file; defaults are used when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info and the derived LOD distances
    Info,
    /// Print the effective configuration as JSON
    Config,
    /// Run the wave simulation and check it replays identically
    Simulate {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "100")]
        ticks: u64,
        /// Override the configured seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Write the final visualization (RG8, row-major) to this file
        #[arg(short, long)]
        dump: Option<PathBuf>,
    },
    /// Run one LOD selection over procedural terrain
    Select {
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        x: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        y: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        z: f32,
        /// Override the number of LOD levels
        #[arg(long)]
        lods: Option<u32>,
        /// Override the deepest level's refine distance
        #[arg(long)]
        range: Option<f32>,
    },
    /// Fly a camera across the surface through the full frame pipeline
    Fly {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// World units travelled per frame
        #[arg(short, long, default_value = "16")]
        speed: f32,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SeascapeConfig> {
    let Some(path) = path else {
        return Ok(SeascapeConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    SeascapeConfig::from_json(&text).with_context(|| format!("loading config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("seascape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", seascape_common::crate_info());
            println!("wave: {}", seascape_wave::crate_info());
            println!("stream: {}", seascape_stream::crate_info());
            println!("tools: {}", seascape_tools::crate_info());
            let selector = LodSelector::new(&config.lod)?;
            println!("lod distances: {:?}", selector.distances());
            println!(
                "wave grid: {0}x{0} cells, {1:.1} world units, courant {2:.3}",
                config.wave.grid_side(),
                config.wave.world_extent(),
                config.wave.courant()
            );
        }
        Commands::Config => {
            println!("{}", config.to_json()?);
        }
        Commands::Simulate { ticks, seed, dump } => {
            if let Some(seed) = seed {
                config.wave.seed = seed;
            }
            println!("Wave simulation: seed={}, ticks={ticks}", config.wave.seed);

            let mut first = WaveSimulator::new(config.wave.clone())?;
            let mut second = WaveSimulator::new(config.wave.clone())?;
            for _ in 0..ticks {
                first.step();
                second.step();
            }
            let summary = WaveInspector::summary(&first);
            println!("{summary}");
            println!(
                "Replay: {}",
                if summary.hash == second.state_hash() {
                    "OK"
                } else {
                    "MISMATCH"
                }
            );

            if let Some(path) = dump {
                let image = first.render_visualization();
                std::fs::write(&path, as_bytes(&image))
                    .with_context(|| format!("writing {}", path.display()))?;
                println!(
                    "Wrote {0}x{0} RG8 image to {1}",
                    first.grid_side(),
                    path.display()
                );
            }
        }
        Commands::Select {
            x,
            y,
            z,
            lods,
            range,
        } => {
            if let Some(lods) = lods {
                config.lod.max_depth = lods;
            }
            if let Some(range) = range {
                config.lod.lod_zero_range = range;
            }
            let mut selector = LodSelector::new(&config.lod)?;
            let sampler = ProceduralSampler::default();
            let camera = CameraInfo::at(Vec3::new(x, y, z));
            let visible = selector.select(&camera, &sampler);

            println!("Camera: ({x}, {y}, {z})");
            println!("Distances: {:?}", selector.distances());
            println!("{}", LodInspector::summary(&visible, &camera));
            if let Some(node) = LodInspector::node_at(&visible, camera.position) {
                println!(
                    "Under camera: depth={} position={} size={}",
                    node.depth, node.bounds.position, node.bounds.size
                );
            }
        }
        Commands::Fly { frames, speed } => {
            let start_x = config.lod.root.min().x;
            let mut pipeline = FramePipeline::new(config)?;
            println!("Fly-through: frames={frames}, speed={speed}");

            for _ in 0..frames {
                let x = start_x + pipeline.frame() as f32 * speed;
                let camera = CameraInfo::at(Vec3::new(x, 24.0, 0.0));
                let report = pipeline.run_frame(&camera);
                println!(
                    "frame {:>4} tick {:>5}: visible={:>4} +{:<3} -{:<3} pool={}/{} in {:?}",
                    report.frame,
                    report.tick,
                    report.visible.len(),
                    report.loads.len(),
                    report.unloads.len(),
                    report.stats.pool_total as usize - report.stats.pool_free,
                    report.stats.pool_total,
                    report.timings.total()
                );
            }

            let avg = pipeline.timer().average();
            println!(
                "Average: simulate={:?} select={:?} diff={:?} apply={:?}, worst frame {:?}",
                avg.simulate,
                avg.select,
                avg.diff,
                avg.apply,
                pipeline.timer().worst()
            );
            println!("{}", WaveInspector::summary(pipeline.simulator()));
            if pipeline.streamer().stats().desyncs > 0 {
                anyhow::bail!(
                    "{} tile bookkeeping desyncs",
                    pipeline.streamer().stats().desyncs
                );
            }
        }
    }

    Ok(())
}
