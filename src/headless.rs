//! Headless runner
//!
//! Drives the stepper with a fixed frame delta until the run settles, without
//! opening a window.

use anyhow::{ensure, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::animation::{RandomSource, Stepper};
use crate::app::state::{SimulationSnapshot, SimulationState};
use crate::config::SimulationConfig;

/// Simulated seconds after which an unsettled run is abandoned
pub const MAX_SIMULATED_SECONDS: f64 = 600.0;

/// Outcome of a headless run
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessReport {
    pub frames: u64,
    pub settled: bool,
    pub equilibrium_target: f64,
    pub snapshot: SimulationSnapshot,
}

/// Run a full simulation at `frame_dt` per frame
pub fn run_headless<R: RandomSource>(
    config: SimulationConfig,
    random: R,
    init_hot: f64,
    init_cold: f64,
    frame_dt: f64,
) -> Result<HeadlessReport> {
    ensure!(
        frame_dt.is_finite() && frame_dt > 0.0,
        "frame delta must be a positive number of seconds, got {}",
        frame_dt
    );
    if frame_dt > config.max_frame_dt() {
        warn!(
            "Frame delta {:.4}s exceeds the {:.4}s cap and will be clamped",
            frame_dt,
            config.max_frame_dt()
        );
    }

    let mut stepper = Stepper::new(config, random);
    let mut state = SimulationState::new(init_hot, init_cold);
    state.start();

    let mut frames = 0u64;
    while state.running && state.elapsed_time < MAX_SIMULATED_SECONDS {
        stepper.step(&mut state, frame_dt);
        frames += 1;
    }

    let settled = state.is_settled();
    if settled {
        info!(
            "Run settled after {} frames: t={:.2}s, equilibrium at {:.2}s, hot={:.3}, cold={:.3}",
            frames,
            state.elapsed_time,
            state.equilibrium_time.unwrap_or_default(),
            state.hot_temp,
            state.cold_temp
        );
    } else {
        warn!("Run did not settle within {}s", MAX_SIMULATED_SECONDS);
    }

    Ok(HeadlessReport {
        frames,
        settled,
        equilibrium_target: state.equilibrium_target(),
        snapshot: state.snapshot(),
    })
}
