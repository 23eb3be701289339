use clap::Parser;
use std::error::Error;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use weather_tank_core::{
    Coefficients, GroundBoundary, PresetBook, Resolution, WeatherSimulation, DEFAULT_PRESET,
    PARAMETER_RANGES,
};

/// Weather tank demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "weather-tank-headless")]
#[command(about = "Boundary-layer weather tank, run without a display", long_about = None)]
struct Args {
    /// Grid side length (64, 128, 256, 512, 1024, 2048 or 4096)
    #[arg(short, long, default_value_t = 256)]
    resolution: u32,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 500)]
    ticks: u64,

    /// Preset document (JSON) to load coefficients from
    #[arg(long)]
    preset_file: Option<std::path::PathBuf>,

    /// Preset name inside the document (defaults to the document's selection)
    #[arg(short, long)]
    preset: Option<String>,

    /// Override a coefficient, e.g. `--set buoyancyFactor=0.02` (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Probe x position in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    probe_x: f32,

    /// Probe y position in [0, 1]
    #[arg(long, default_value_t = 0.1)]
    probe_y: f32,

    /// Report interval in ticks
    #[arg(long, default_value_t = 50)]
    report_interval: u64,

    /// Run with a flat, unforced ground instead of the reference terrain
    #[arg(long)]
    flat: bool,

    /// Print every coefficient with its tested range and exit
    #[arg(long)]
    list_params: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.list_params {
        list_params();
        return Ok(());
    }

    println!("=== Weather Tank ===\n");

    let (mut coefficients, preset_resolution) = load_coefficients(&args)?;
    for entry in &args.overrides {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| format!("Override '{entry}' is not KEY=VALUE"))?;
        coefficients.set_parameter(key.trim(), value.trim().parse()?)?;
    }
    if let Err(e) = coefficients.validate() {
        warn!("{e}; results may be unstable");
    }

    let resolution = match preset_resolution {
        Some(resolution) => resolution,
        None => Resolution::try_from(args.resolution)?,
    };
    let mut sim = WeatherSimulation::new(resolution, coefficients);
    let ground = if args.flat {
        GroundBoundary::default()
    } else {
        GroundBoundary::reference_terrain()
    };

    println!(
        "Grid {}, {} ticks, probe at ({:.2}, {:.2})\n",
        resolution, args.ticks, args.probe_x, args.probe_y
    );
    println!("  Tick |    vx |    vy |      t |     h |     m |     r | max|v| |    |div|");
    println!("-------|-------|-------|--------|-------|-------|-------|--------|---------");

    let start = Instant::now();
    let interval = args.report_interval.max(1);
    for _ in 0..args.ticks {
        // Ground forcing is rewritten every tick
        sim.set_ground(ground.clone());
        sim.advance_one_step();

        if sim.tick() % interval == 0 {
            let s = sim.sample(args.probe_x, args.probe_y);
            let totals = sim.totals();
            println!(
                "{:6} | {:5.2} | {:5.2} | {:6.3} | {:5.3} | {:5.3} | {:5.3} | {:6.3} | {:8.5}",
                sim.tick(),
                s.velocity.x,
                s.velocity.y,
                s.temperature,
                s.humidity,
                s.mist,
                s.rain,
                totals.max_speed,
                totals.mean_abs_divergence
            );
        }
    }
    let elapsed = start.elapsed();

    let totals = sim.totals();
    println!("\n=== Run Complete ===");
    println!("Ticks: {}", sim.tick());
    println!(
        "Wall time: {:.2}s ({:.2} ms/tick)",
        elapsed.as_secs_f64(),
        elapsed.as_secs_f64() * 1000.0 / args.ticks.max(1) as f64
    );
    println!("Totals: {}", totals);
    println!("Probe:\n{}", sim.sample(args.probe_x, args.probe_y));
    Ok(())
}

/// Coefficients and pinned resolution from the preset file, or the defaults
fn load_coefficients(args: &Args) -> Result<(Coefficients, Option<Resolution>), Box<dyn Error>> {
    let Some(path) = &args.preset_file else {
        if args.preset.is_some() {
            warn!("--preset given without --preset-file; using defaults");
        }
        return Ok((Coefficients::default(), None));
    };

    let book = PresetBook::from_json(&std::fs::read_to_string(path)?)?;
    let name = args
        .preset
        .as_deref()
        .or_else(|| book.selected_name())
        .unwrap_or(DEFAULT_PRESET);
    let preset = book.get(name)?;
    info!(
        "Using preset '{}' from {} ({} available: {})",
        name,
        path.display(),
        book.len(),
        book.names().join(", ")
    );
    Ok((preset.coefficients, preset.resolution))
}

fn list_params() {
    let defaults = Coefficients::default();
    println!("{:<28} {:>10} {:>10} {:>10}", "Parameter", "Default", "Min", "Max");
    for range in &PARAMETER_RANGES {
        let value = defaults.parameter(range.name).unwrap_or(f32::NAN);
        println!(
            "{:<28} {:>10.4} {:>10.4} {:>10.4}",
            range.name, value, range.min, range.max
        );
    }
}
