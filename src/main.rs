use std::f32::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use image::imageops::{self, FilterType};
use image::RgbImage;
use stable_fluids::{
    blend_into, density_to_rgb, velocity_to_rgb, FluidConfig, FluidSim, FrameInput,
    PointerButton, Vec2,
};

/// Headless stable-fluids runner: drags a scripted pointer through the tank
/// and writes colormapped PNG frames.
#[derive(Parser, Debug)]
#[command(name = "stable-fluids", version, about)]
struct Cli {
    /// JSON file with a `FluidConfig`; missing fields take their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of simulation steps to run
    #[arg(long, default_value_t = 240)]
    frames: u64,

    /// Directory for PNG frames; nothing is written when omitted
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Write every Nth frame
    #[arg(long, default_value_t = 10)]
    every: u64,

    /// Blend the speed heat map over the dye
    #[arg(long)]
    velocity: bool,

    /// Override the interior width in cells
    #[arg(long)]
    nx: Option<usize>,

    /// Override the interior height in cells
    #[arg(long)]
    ny: Option<usize>,
}

fn load_config(cli: &Cli) -> Result<FluidConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            FluidConfig::from_json(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => FluidConfig::default(),
    };
    if let Some(nx) = cli.nx {
        // Keep the cell size when only the resolution changes.
        config.domain_width = config.cell_size() * nx as f32;
        config.nx = nx;
    }
    if let Some(ny) = cli.ny {
        config.ny = ny;
    }
    Ok(config)
}

/// Pointer path: two laps around the tank center, painting on the first lap
/// and only stirring on the second.
struct ScriptedPointer {
    center: Vec2,
    radius: f32,
    frames: u64,
    previous: Option<Vec2>,
}

impl ScriptedPointer {
    fn new(config: &FluidConfig, frames: u64) -> Self {
        let px = config.emitter.cell_pixels;
        let width = px * (config.nx + 2) as f32;
        let height = px * (config.ny + 2) as f32;
        Self {
            center: Vec2::new(width * 0.5, height * 0.5),
            radius: width.min(height) * 0.25,
            frames: frames.max(1),
            previous: None,
        }
    }

    fn input(&mut self, frame: u64) -> FrameInput {
        let t = frame as f32 / self.frames as f32;
        let angle = 2.0 * TAU * t;
        let position = Vec2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        );
        let previous = self.previous.replace(position).unwrap_or(position);
        let button = if t < 0.5 {
            PointerButton::Primary
        } else {
            PointerButton::Secondary
        };
        FrameInput::drag(previous, position, button)
    }
}

fn write_frame(sim: &FluidSim, velocity: bool, path: &Path) -> Result<()> {
    let grid = sim.grid();
    let mut rgb = Vec::new();
    density_to_rgb(sim.density(), &mut rgb);
    if velocity {
        let mut speed = Vec::new();
        velocity_to_rgb(
            sim.velocity_u(),
            sim.velocity_v(),
            sim.params().emitter.velocity_scale,
            &mut speed,
        );
        blend_into(&mut rgb, &speed, 0.5);
    }
    let width = grid.stride() as u32;
    let height = grid.padded_height() as u32;
    let image = RgbImage::from_raw(width, height, rgb)
        .context("frame buffer does not match grid dimensions")?;
    let scale = sim.params().emitter.cell_pixels.round().max(1.0) as u32;
    let image = imageops::resize(&image, width * scale, height * scale, FilterType::Nearest);
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let mut sim = FluidSim::new(&config).context("invalid fluid configuration")?;
    if let Some(dir) = &cli.out {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    log::info!(
        "running {} frames on a {}x{} grid",
        cli.frames,
        config.nx,
        config.ny
    );

    let every = cli.every.max(1);
    let mut pointer = ScriptedPointer::new(&config, cli.frames);
    for frame in 0..cli.frames {
        sim.step(&pointer.input(frame));
        let stats = sim.stats();
        log::debug!(
            "frame {} density {:.4} in [{:.4}, {:.4}] max speed {:.4} div rms {:.3e}",
            stats.frame,
            stats.total_density,
            stats.density_range.0,
            stats.density_range.1,
            stats.max_speed,
            stats.divergence_rms
        );
        if !stats.total_density.is_finite() || !stats.max_speed.is_finite() {
            log::warn!("simulation diverged at frame {}", stats.frame);
        }
        if let Some(dir) = &cli.out {
            if frame % every == 0 {
                let path = dir.join(format!("frame_{:05}.png", stats.frame));
                write_frame(&sim, cli.velocity, &path)?;
            }
        }
    }

    let stats = sim.stats();
    log::info!(
        "done after {} frames: density {:.4}, max speed {:.4}, div rms {:.3e}",
        stats.frame,
        stats.total_density,
        stats.max_speed,
        stats.divergence_rms
    );
    Ok(())
}
