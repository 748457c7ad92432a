//! Simulation state machine
//!
//! Implements the contact → exchange → equilibrium → settled flow of the
//! two-reservoir heat exchange.

use glam::Vec2;
use serde::Serialize;
use tracing::{info, warn};

/// Simulation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Reset and not started yet
    #[default]
    Idle,
    /// Containers moving towards each other
    Contact,
    /// Containers touching, heat flowing
    Exchanging,
    /// Temperatures within tolerance, hold period running
    Equilibrium,
    /// Hold period elapsed, run stopped for good
    Settled,
}

impl Phase {
    /// Get display name for the phase
    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Contact => "Contact",
            Phase::Exchanging => "Exchanging",
            Phase::Equilibrium => "Equilibrium",
            Phase::Settled => "Settled",
        }
    }
}

/// Status shown next to the controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLabel {
    #[default]
    Ready,
    Running,
    Paused,
    EquilibriumReached,
    Completed,
}

impl StatusLabel {
    /// Get display name for the status
    pub fn display_name(&self) -> &'static str {
        match self {
            StatusLabel::Ready => "Ready",
            StatusLabel::Running => "Running",
            StatusLabel::Paused => "Paused",
            StatusLabel::EquilibriumReached => "Thermal equilibrium",
            StatusLabel::Completed => "Completed",
        }
    }

    /// Get Greek display name
    pub fn display_name_el(&self) -> &'static str {
        match self {
            StatusLabel::Ready => "Έτοιμο",
            StatusLabel::Running => "Σε εξέλιξη",
            StatusLabel::Paused => "Σε παύση",
            StatusLabel::EquilibriumReached => "Θερμική ισορροπία",
            StatusLabel::Completed => "Ολοκληρώθηκε",
        }
    }
}

/// One recorded point of a temperature curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistorySample {
    pub time: f64,
    pub temperature: f64,
}

/// Cosmetic heat particle travelling from the hot to the cold side
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatParticle {
    pub position: Vec2,
    /// Horizontal speed in scene units per second
    pub speed: f32,
    /// Particle is removed once it reaches this x
    pub target_x: f32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub hot_temp: f64,
    pub cold_temp: f64,
    pub init_hot: f64,
    pub init_cold: f64,
    /// Seconds since start, excluding paused time
    pub elapsed_time: f64,
    /// Contact animation progress (0.0 to 1.0)
    pub contact_progress: f64,
    pub equilibrium_reached: bool,
    pub equilibrium_time: Option<f64>,
    pub running: bool,
    pub hot_history: Vec<HistorySample>,
    pub cold_history: Vec<HistorySample>,
    pub particles: Vec<HeatParticle>,

    /// Set by start, cleared by reset
    pub(crate) started: bool,
    /// Set once the post-equilibrium hold has elapsed
    pub(crate) settled: bool,
}

/// Read-only view handed to renderers and the headless runner
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSnapshot {
    pub hot_temp: f64,
    pub cold_temp: f64,
    pub elapsed_time: f64,
    pub contact_progress: f64,
    pub equilibrium_reached: bool,
    pub equilibrium_time: Option<f64>,
    pub hot_history: Vec<HistorySample>,
    pub cold_history: Vec<HistorySample>,
    pub particles: Vec<HeatParticle>,
    pub running: bool,
    pub status: StatusLabel,
}

impl SimulationState {
    /// Create new simulation state, reset to the given temperatures
    pub fn new(init_hot: f64, init_cold: f64) -> Self {
        let mut state = Self {
            hot_temp: 0.0,
            cold_temp: 0.0,
            init_hot: 1.0,
            init_cold: 0.0,
            elapsed_time: 0.0,
            contact_progress: 0.0,
            equilibrium_reached: false,
            equilibrium_time: None,
            running: false,
            hot_history: Vec::new(),
            cold_history: Vec::new(),
            particles: Vec::new(),
            started: false,
            settled: false,
        };
        state.reset(init_hot, init_cold);
        state
    }

    /// Reset to the initial state for the given temperatures
    ///
    /// The hot side is coerced to `init_cold + 1` when it is not strictly
    /// hotter. Returns the values actually applied.
    pub fn reset(&mut self, init_hot: f64, init_cold: f64) -> (f64, f64) {
        let (mut hot, mut cold) = if init_hot.is_finite() && init_cold.is_finite() {
            (init_hot, init_cold)
        } else {
            warn!(
                "Ignoring non-finite reset temperatures ({}, {}), keeping ({}, {})",
                init_hot, init_cold, self.init_hot, self.init_cold
            );
            (self.init_hot, self.init_cold)
        };

        if hot <= cold {
            hot = cold + 1.0;
            if hot <= cold {
                // Past 2^53 adding a degree rounds back to `cold`
                hot = next_above(cold);
            }
            if hot == f64::INFINITY {
                (hot, cold) = (f64::MAX, next_below(f64::MAX));
            }
            warn!("Hot temperature not above cold, coerced to ({}, {})", hot, cold);
        }

        self.init_hot = hot;
        self.init_cold = cold;
        self.hot_temp = hot;
        self.cold_temp = cold;
        self.elapsed_time = 0.0;
        self.contact_progress = 0.0;
        self.equilibrium_reached = false;
        self.equilibrium_time = None;
        self.running = false;
        self.started = false;
        self.settled = false;
        self.hot_history.clear();
        self.cold_history.clear();
        self.hot_history.push(HistorySample { time: 0.0, temperature: hot });
        self.cold_history.push(HistorySample { time: 0.0, temperature: cold });
        self.particles.clear();

        info!("Simulation reset: hot={:.1}, cold={:.1}", hot, cold);
        (hot, cold)
    }

    /// Start or resume the run
    ///
    /// A settled run is reset with the stored initial temperatures first.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        if self.settled {
            self.reset(self.init_hot, self.init_cold);
        }
        self.running = true;
        self.started = true;
        info!("Simulation started at t={:.2}", self.elapsed_time);
    }

    /// Pause without resetting
    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            info!("Simulation paused at t={:.2}", self.elapsed_time);
        }
    }

    /// Single start/pause entry point for a toggle button
    pub fn toggle(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Record equilibrium detection
    pub(crate) fn mark_equilibrium(&mut self) {
        self.equilibrium_reached = true;
        self.equilibrium_time = Some(self.elapsed_time);
        info!(
            "Thermal equilibrium reached at t={:.2}s: hot={:.2}, cold={:.2}",
            self.elapsed_time, self.hot_temp, self.cold_temp
        );
    }

    /// Stop the run after the hold period
    pub(crate) fn mark_settled(&mut self) {
        self.running = false;
        self.settled = true;
        info!("Simulation completed at t={:.2}s", self.elapsed_time);
    }

    /// Check if the containers are touching
    pub fn is_contact_complete(&self) -> bool {
        self.contact_progress >= 1.0
    }

    /// Check if the run has finished
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Temperature both sides converge to
    pub fn equilibrium_target(&self) -> f64 {
        (self.init_hot + self.init_cold) / 2.0
    }

    pub fn temperature_gap(&self) -> f64 {
        self.hot_temp - self.cold_temp
    }

    /// Get current phase
    pub fn phase(&self) -> Phase {
        if self.settled {
            Phase::Settled
        } else if self.equilibrium_reached {
            Phase::Equilibrium
        } else if !self.started {
            Phase::Idle
        } else if !self.is_contact_complete() {
            Phase::Contact
        } else {
            Phase::Exchanging
        }
    }

    /// Get status label for display
    pub fn status_label(&self) -> StatusLabel {
        match self.phase() {
            Phase::Idle => StatusLabel::Ready,
            Phase::Settled => StatusLabel::Completed,
            _ if !self.running => StatusLabel::Paused,
            Phase::Equilibrium => StatusLabel::EquilibriumReached,
            _ => StatusLabel::Running,
        }
    }

    /// Copy of everything a renderer needs
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            hot_temp: self.hot_temp,
            cold_temp: self.cold_temp,
            elapsed_time: self.elapsed_time,
            contact_progress: self.contact_progress,
            equilibrium_reached: self.equilibrium_reached,
            equilibrium_time: self.equilibrium_time,
            hot_history: self.hot_history.clone(),
            cold_history: self.cold_history.clone(),
            particles: self.particles.clone(),
            running: self.running,
            status: self.status_label(),
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(80.0, 20.0)
    }
}

/// Smallest `f64` greater than a finite `x`
fn next_above(x: f64) -> f64 {
    if x == 0.0 {
        f64::from_bits(1)
    } else if x > 0.0 {
        f64::from_bits(x.to_bits() + 1)
    } else {
        f64::from_bits(x.to_bits() - 1)
    }
}

/// Largest `f64` smaller than a finite, positive `x`
fn next_below(x: f64) -> f64 {
    f64::from_bits(x.to_bits() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        assert_eq!(StatusLabel::Ready.display_name(), "Ready");
        assert_eq!(StatusLabel::Completed.display_name_el(), "Ολοκληρώθηκε");
        assert_eq!(Phase::Exchanging.display_name(), "Exchanging");
    }

    #[test]
    fn test_reset_initial_samples() {
        let state = SimulationState::new(80.0, 20.0);
        assert_eq!(state.hot_temp, 80.0);
        assert_eq!(state.cold_temp, 20.0);
        assert_eq!(state.elapsed_time, 0.0);
        assert_eq!(state.contact_progress, 0.0);
        assert!(!state.running);
        assert!(state.equilibrium_time.is_none());
        assert_eq!(state.hot_history, vec![HistorySample { time: 0.0, temperature: 80.0 }]);
        assert_eq!(state.cold_history, vec![HistorySample { time: 0.0, temperature: 20.0 }]);
        assert!(state.particles.is_empty());
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.status_label(), StatusLabel::Ready);
    }

    #[test]
    fn test_reset_coerces_hot_above_cold() {
        let mut state = SimulationState::default();
        assert_eq!(state.reset(30.0, 30.0), (31.0, 30.0));
        assert!(state.init_hot > state.init_cold);

        assert_eq!(state.reset(10.0, 45.0), (46.0, 45.0));
        assert_eq!(state.hot_temp, 46.0);
        assert!(state.init_hot > state.init_cold);
    }

    #[test]
    fn test_reset_coerces_huge_temperatures() {
        let mut state = SimulationState::default();
        let (hot, cold) = state.reset(1e16, 1e16);
        assert_eq!(cold, 1e16);
        assert!(hot > cold);
        assert!(state.init_hot > state.init_cold);
        assert!(state.temperature_gap() > 0.0);

        let (hot, cold) = state.reset(-1e17, -1e17);
        assert!(hot > cold);

        let (hot, cold) = state.reset(f64::MAX, f64::MAX);
        assert_eq!(hot, f64::MAX);
        assert!(hot > cold && cold.is_finite());
    }

    #[test]
    fn test_reset_ignores_non_finite() {
        let mut state = SimulationState::new(70.0, 10.0);
        assert_eq!(state.reset(f64::NAN, 5.0), (70.0, 10.0));
        assert_eq!(state.reset(50.0, f64::INFINITY), (70.0, 10.0));
    }

    #[test]
    fn test_start_pause_toggle() {
        let mut state = SimulationState::default();
        state.start();
        assert!(state.running);
        assert_eq!(state.status_label(), StatusLabel::Running);

        state.toggle();
        assert!(!state.running);
        assert_eq!(state.status_label(), StatusLabel::Paused);

        state.toggle();
        assert!(state.running);

        state.start();
        assert!(state.running);
    }

    #[test]
    fn test_start_after_settle_resets() {
        let mut state = SimulationState::new(90.0, 10.0);
        state.start();
        state.elapsed_time = 12.0;
        state.hot_temp = 50.05;
        state.cold_temp = 49.95;
        state.mark_equilibrium();
        state.mark_settled();
        assert_eq!(state.phase(), Phase::Settled);
        assert_eq!(state.status_label(), StatusLabel::Completed);

        state.start();
        assert!(state.running);
        assert_eq!(state.elapsed_time, 0.0);
        assert_eq!(state.hot_temp, 90.0);
        assert!(!state.equilibrium_reached);
        assert_eq!(state.hot_history.len(), 1);
    }

    #[test]
    fn test_equilibrium_target() {
        let state = SimulationState::new(75.0, 25.0);
        assert_eq!(state.equilibrium_target(), 50.0);
        assert_eq!(state.temperature_gap(), 50.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = SimulationState::default();
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"status\":\"ready\""));
        assert!(json.contains("\"equilibrium_time\":null"));
    }
}
