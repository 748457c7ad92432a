//! Simulation stepper
//!
//! Advances the simulation state by one frame delta: contact ramp, heat
//! exchange, history decimation, equilibrium and settle detection, and the
//! cosmetic heat particles.

use glam::Vec2;
use tracing::{debug, trace};

use super::random::{RandomSource, StdRandom};
use crate::app::state::{HeatParticle, HistorySample, SimulationState};
use crate::config::SimulationConfig;
use crate::render::layout::ContainerLayout;

/// Upper bound on spawn attempts in one frame
const MAX_SPAWN_ATTEMPTS: usize = 16;

/// Frame stepper
pub struct Stepper<R: RandomSource = StdRandom> {
    config: SimulationConfig,
    random: R,
}

impl<R: RandomSource> Stepper<R> {
    /// Create new stepper
    pub fn new(config: SimulationConfig, random: R) -> Self {
        Self { config, random }
    }

    /// Advance the state by `dt` seconds
    ///
    /// Non-finite or non-positive deltas are ignored, large ones are capped
    /// at `max_frame_dt` to keep the explicit Euler update stable.
    pub fn step(&mut self, state: &mut SimulationState, dt: f64) {
        let Some(dt) = self.sanitize_dt(dt) else {
            return;
        };
        if !state.running {
            return;
        }

        // Particles move in the band of the previous contact position
        self.update_particles(state, dt);

        state.elapsed_time += dt;
        state.contact_progress =
            (state.contact_progress + dt / self.config.contact_duration()).clamp(0.0, 1.0);

        if state.is_contact_complete() {
            self.exchange_heat(state, dt);
        }

        self.record_sample(state);
        self.check_equilibrium(state);
        self.check_settled(state);
    }

    fn sanitize_dt(&self, dt: f64) -> Option<f64> {
        if !dt.is_finite() || dt <= 0.0 {
            trace!("Skipping frame with delta {}", dt);
            return None;
        }

        let max = self.config.max_frame_dt();
        if dt > max {
            debug!("Clamping frame delta {:.4}s to {:.4}s", dt, max);
            Some(max)
        } else {
            Some(dt)
        }
    }

    fn exchange_heat(&self, state: &mut SimulationState, dt: f64) {
        let delta = state.hot_temp - state.cold_temp;
        let flow = self.config.transfer_k() * delta * dt;
        state.hot_temp -= flow;
        state.cold_temp += flow;
    }

    fn record_sample(&self, state: &mut SimulationState) {
        let due = match state.hot_history.last() {
            Some(last) => state.elapsed_time - last.time >= self.config.sample_interval(),
            None => true,
        };
        if !due {
            return;
        }

        let time = state.elapsed_time;
        state.hot_history.push(HistorySample {
            time,
            temperature: state.hot_temp,
        });
        state.cold_history.push(HistorySample {
            time,
            temperature: state.cold_temp,
        });
    }

    fn check_equilibrium(&self, state: &mut SimulationState) {
        if !state.equilibrium_reached
            && state.is_contact_complete()
            && state.temperature_gap().abs() < self.config.equilibrium_tolerance()
        {
            state.mark_equilibrium();
        }
    }

    fn check_settled(&self, state: &mut SimulationState) {
        let Some(equilibrium_time) = state.equilibrium_time else {
            return;
        };
        if state.elapsed_time - equilibrium_time >= self.config.post_equilibrium_hold() {
            debug!("Recorded {} history samples", state.hot_history.len());
            state.mark_settled();
        }
    }

    fn update_particles(&mut self, state: &mut SimulationState, dt: f64) {
        let layout = self.config.layout;
        let particles = self.config.particles;
        let band = ContainerLayout::at(&layout, state.contact_progress).flow_band(&layout);
        let half = layout.particle_band_half;

        let gap = state.temperature_gap();
        if state.running && state.is_contact_complete() && gap > particles.min_gap {
            let spawn_count = ((gap / particles.gap_per_spawn).floor() as usize)
                .clamp(1, MAX_SPAWN_ATTEMPTS);

            for _ in 0..spawn_count {
                if self.random.next_unit() >= particles.spawn_probability {
                    continue;
                }
                let offset = (self.random.next_unit() - 0.5) * half * 2.0;
                let speed = particles.speed_min
                    + self.random.next_unit() * (particles.speed_max - particles.speed_min);

                state.particles.push(HeatParticle {
                    position: Vec2::new(band.start_x + particles.edge_inset, band.center_y + offset),
                    speed,
                    target_x: band.end_x - particles.edge_inset,
                });
            }
        }

        let dt = dt as f32;
        for particle in &mut state.particles {
            particle.position.x = (particle.position.x + particle.speed * dt)
                .max(band.start_x)
                .min(band.end_x);
            particle.position.y = particle
                .position
                .y
                .max(band.center_y - half)
                .min(band.center_y + half);
        }
        state.particles.retain(|p| p.position.x < p.target_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cycles through a fixed list of samples
    struct ScriptedRandom {
        values: Vec<f32>,
        index: usize,
    }

    impl ScriptedRandom {
        fn constant(value: f32) -> Self {
            Self {
                values: vec![value],
                index: 0,
            }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn next_unit(&mut self) -> f32 {
            let value = self.values[self.index % self.values.len()];
            self.index += 1;
            value
        }
    }

    fn quiet_stepper() -> Stepper<ScriptedRandom> {
        Stepper::new(SimulationConfig::default(), ScriptedRandom::constant(0.99))
    }

    fn run_until_contact<R: RandomSource>(stepper: &mut Stepper<R>, state: &mut SimulationState) {
        while !state.is_contact_complete() {
            stepper.step(state, 0.01);
        }
    }

    fn run_until_equilibrium<R: RandomSource>(stepper: &mut Stepper<R>, state: &mut SimulationState) {
        for _ in 0..10_000 {
            if state.equilibrium_reached {
                return;
            }
            stepper.step(state, 0.01);
        }
        panic!("equilibrium not reached");
    }

    #[test]
    fn test_idle_state_does_not_advance() {
        let mut stepper = quiet_stepper();
        let mut state = SimulationState::new(80.0, 20.0);
        stepper.step(&mut state, 0.02);
        assert_eq!(state.elapsed_time, 0.0);
        assert_eq!(state.contact_progress, 0.0);
    }

    #[test]
    fn test_start_then_pause_keeps_time() {
        let mut stepper = quiet_stepper();
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        state.pause();
        for _ in 0..10 {
            stepper.step(&mut state, 0.02);
        }
        assert_eq!(state.elapsed_time, 0.0);
        assert_eq!(state.hot_history.len(), 1);
    }

    #[test]
    fn test_no_exchange_during_contact_ramp() {
        let mut stepper = quiet_stepper();
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        for _ in 0..50 {
            stepper.step(&mut state, 0.01);
        }
        assert!((state.contact_progress - 0.5).abs() < 1e-9);
        assert_eq!(state.hot_temp, 80.0);
        assert_eq!(state.cold_temp, 20.0);
        assert!(!state.equilibrium_reached);
    }

    #[test]
    fn test_exchange_converges_and_conserves() {
        let mut stepper = quiet_stepper();
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        run_until_contact(&mut stepper, &mut state);
        assert_eq!(state.contact_progress, 1.0);

        let mut prev_hot = state.hot_temp;
        let mut prev_cold = state.cold_temp;
        for _ in 0..100 {
            stepper.step(&mut state, 0.01);
            assert!(state.hot_temp <= prev_hot);
            assert!(state.cold_temp >= prev_cold);
            assert!(state.hot_temp > 50.0 && state.cold_temp < 50.0);
            assert!((state.hot_temp + state.cold_temp - 100.0).abs() < 1e-9);
            prev_hot = state.hot_temp;
            prev_cold = state.cold_temp;
        }
        assert!(state.hot_temp < 80.0);
        assert!(state.cold_temp > 20.0);
    }

    #[test]
    fn test_monotonic_with_varied_deltas() {
        let mut config = SimulationConfig::default();
        config.exchange.max_frame_dt = 0.05;
        let mut stepper = Stepper::new(config, ScriptedRandom::constant(0.99));
        let mut state = SimulationState::new(95.0, 5.0);
        state.start();
        run_until_contact(&mut stepper, &mut state);

        let deltas = [0.05, 0.001, 0.033, 0.017, 0.05, 0.008];
        let mut prev = state.temperature_gap();
        for i in 0..600 {
            if state.equilibrium_reached {
                break;
            }
            let dt = deltas[i % deltas.len()];
            let before = state.elapsed_time;
            stepper.step(&mut state, dt);
            assert!((state.elapsed_time - before - dt).abs() < 1e-12);
            let gap = state.temperature_gap();
            assert!(gap <= prev && gap >= 0.0);
            prev = gap;
        }
    }

    #[test]
    fn test_equilibrium_fires_once_after_contact() {
        let mut stepper = quiet_stepper();
        let mut state = SimulationState::new(50.1, 50.0);
        state.start();

        // Gap is already below tolerance but contact is not complete yet
        stepper.step(&mut state, 0.01);
        assert!(!state.equilibrium_reached);

        run_until_contact(&mut stepper, &mut state);
        assert!(state.equilibrium_reached);
        let first = state.equilibrium_time;
        assert!(first.is_some());

        for _ in 0..50 {
            stepper.step(&mut state, 0.01);
        }
        assert_eq!(state.equilibrium_time, first);
    }

    #[test]
    fn test_settles_after_hold() {
        let mut stepper = quiet_stepper();
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        run_until_equilibrium(&mut stepper, &mut state);
        let eq_time = state.equilibrium_time.unwrap();
        assert!(state.running);

        loop {
            stepper.step(&mut state, 0.01);
            if state.elapsed_time - eq_time >= 2.5 {
                assert!(!state.running);
                break;
            }
            assert!(state.running);
        }
        assert!(state.is_settled());

        // Frozen once settled
        let elapsed = state.elapsed_time;
        stepper.step(&mut state, 0.01);
        assert_eq!(state.elapsed_time, elapsed);
    }

    #[test]
    fn test_resume_during_hold_keeps_equilibrium() {
        let mut stepper = quiet_stepper();
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        run_until_equilibrium(&mut stepper, &mut state);
        let eq_time = state.equilibrium_time;
        let elapsed = state.elapsed_time;

        state.toggle();
        assert!(!state.running);
        state.toggle();
        assert!(state.running);
        assert!(state.equilibrium_reached);
        assert_eq!(state.equilibrium_time, eq_time);
        assert_eq!(state.elapsed_time, elapsed);
    }

    #[test]
    fn test_start_after_completed_run_resets() {
        let mut stepper = quiet_stepper();
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        run_until_equilibrium(&mut stepper, &mut state);
        while state.running {
            stepper.step(&mut state, 0.01);
        }

        state.start();
        assert!(state.running);
        assert_eq!(state.elapsed_time, 0.0);
        assert_eq!(state.hot_temp, 80.0);
        assert_eq!(state.cold_temp, 20.0);
        assert!(!state.equilibrium_reached);
    }

    #[test]
    fn test_history_decimation() {
        let mut stepper = quiet_stepper();
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        for _ in 0..300 {
            stepper.step(&mut state, 0.007);
        }

        assert!(state.hot_history.len() > 1);
        assert_eq!(state.hot_history.len(), state.cold_history.len());
        for pair in state.hot_history.windows(2) {
            assert!(pair[1].time - pair[0].time >= 0.05);
        }
        for (hot, cold) in state.hot_history.iter().zip(&state.cold_history) {
            assert_eq!(hot.time, cold.time);
        }
    }

    #[test]
    fn test_bad_deltas_ignored() {
        let mut stepper = quiet_stepper();
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        for dt in [f64::NAN, -0.01, 0.0, f64::INFINITY, f64::NEG_INFINITY] {
            stepper.step(&mut state, dt);
        }
        assert_eq!(state.elapsed_time, 0.0);
        assert_eq!(state.contact_progress, 0.0);
    }

    #[test]
    fn test_large_delta_clamped() {
        let mut stepper = quiet_stepper();
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        stepper.step(&mut state, 1.0);
        assert_eq!(state.elapsed_time, 0.033);
    }

    #[test]
    fn test_no_particles_before_contact() {
        let mut stepper = Stepper::new(SimulationConfig::default(), ScriptedRandom::constant(0.0));
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        run_until_contact(&mut stepper, &mut state);
        assert!(state.particles.is_empty());

        // Gap 60 -> floor(60 / 22) = 2 attempts, all succeed
        stepper.step(&mut state, 0.01);
        assert_eq!(state.particles.len(), 2);
        for p in &state.particles {
            assert!(p.position.x < p.target_x);
            assert!((p.position.y - 102.0).abs() < 1e-4);
            assert_eq!(p.speed, 170.0);
        }
    }

    #[test]
    fn test_particles_need_temperature_gap() {
        let mut stepper = Stepper::new(SimulationConfig::default(), ScriptedRandom::constant(0.0));
        let mut state = SimulationState::new(50.1, 50.0);
        state.start();
        run_until_contact(&mut stepper, &mut state);
        stepper.step(&mut state, 0.01);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_spawn_probability() {
        let config = SimulationConfig::default();
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        run_until_contact(&mut quiet_stepper(), &mut state);

        // First attempt passes, second fails
        let mut stepper = Stepper::new(
            config,
            ScriptedRandom {
                values: vec![0.1, 0.5, 0.5, 0.9],
                index: 0,
            },
        );
        stepper.step(&mut state, 0.01);
        assert_eq!(state.particles.len(), 1);
        assert_eq!(state.particles[0].speed, 215.0);
    }

    #[test]
    fn test_particles_removed_at_target() {
        let config = SimulationConfig::default();
        let mut spawner = Stepper::new(config, ScriptedRandom::constant(0.0));
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        run_until_contact(&mut spawner, &mut state);
        spawner.step(&mut state, 0.01);
        assert!(!state.particles.is_empty());

        let mut stepper = quiet_stepper();
        for _ in 0..10 {
            stepper.step(&mut state, 0.033);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_reset_clears_particles() {
        let mut stepper = Stepper::new(SimulationConfig::default(), ScriptedRandom::constant(0.0));
        let mut state = SimulationState::new(80.0, 20.0);
        state.start();
        run_until_contact(&mut stepper, &mut state);
        stepper.step(&mut state, 0.01);
        assert!(!state.particles.is_empty());

        state.reset(80.0, 20.0);
        assert!(state.particles.is_empty());
    }
}
