//! Thermal Equilibrium Simulator
//!
//! Interactive visualization of a hot and a cold reservoir exchanging heat
//! until they reach a common temperature. Runs in a window, or headless with
//! the final state printed as JSON.

mod animation;
mod app;
mod config;
mod headless;
mod render;
mod utils;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use animation::StdRandom;
use app::ThermalApp;
use config::SimulationConfig;

/// Thermal Equilibrium Simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial temperature of the hot container (°C)
    #[arg(long, default_value_t = 80.0)]
    hot: f64,

    /// Initial temperature of the cold container (°C)
    #[arg(long, default_value_t = 20.0)]
    cold: f64,

    /// Seed for the heat particle randomness
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a window and print the final state as JSON
    #[arg(long)]
    headless: bool,

    /// Frame delta in seconds for headless runs
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Thermal Equilibrium Simulator starting...");

    let config = if let Some(config_path) = &args.config {
        info!("Loading config from: {:?}", config_path);
        match SimulationConfig::load_from_file(config_path) {
            Ok(config) => {
                info!("Config loaded successfully:");
                info!("  - transfer_k: {}", config.transfer_k());
                info!("  - equilibrium_tolerance: {}", config.equilibrium_tolerance());
                info!("  - post_equilibrium_hold: {}s", config.post_equilibrium_hold());
                config
            }
            Err(e) => {
                tracing::error!("Failed to load config, using defaults: {:?}", e);
                SimulationConfig::get_default()
            }
        }
    } else {
        SimulationConfig::get_default()
    };

    let random = match args.seed {
        Some(seed) => {
            info!("Particle seed: {}", seed);
            StdRandom::from_seed(seed)
        }
        None => StdRandom::from_entropy(),
    };

    if args.headless {
        let report = headless::run_headless(config, random, args.hot, args.cold, args.frame_dt)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let scene_width = config.layout.canvas_width;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([scene_width + 40.0, 760.0])
            .with_min_inner_size([480.0, 560.0])
            .with_title("Thermal Equilibrium Simulator"),
        ..Default::default()
    };

    let (hot, cold) = (args.hot, args.cold);
    eframe::run_native(
        "Thermal Equilibrium Simulator",
        native_options,
        Box::new(move |cc| Ok(Box::new(ThermalApp::new(cc, config, hot, cold, random)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
