//! Main simulator application
//!
//! Implements the egui App trait for the thermal equilibrium simulator.

use std::time::Instant;

use egui::{Color32, RichText, Sense, Vec2};
use tracing::{info, warn};

use crate::animation::{StdRandom, Stepper};
use crate::config::SimulationConfig;
use crate::render::{SceneLabels, SceneRenderer};
use crate::utils::color::TemperatureColors;

use super::state::SimulationState;

/// Height of the graph canvas in points
const GRAPH_HEIGHT: f32 = 260.0;

/// Main simulator application
pub struct ThermalApp {
    /// Simulation state
    state: SimulationState,
    /// Frame stepper
    stepper: Stepper<StdRandom>,
    /// Scene and graph renderer
    renderer: SceneRenderer,

    /// Slider values, in whole degrees
    hot_input: i32,
    cold_input: i32,

    /// Use Greek labels
    greek_labels: bool,

    /// Last frame time for delta computation
    last_frame_time: Instant,
}

impl ThermalApp {
    /// Create new simulator application
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: SimulationConfig,
        init_hot: f64,
        init_cold: f64,
        random: StdRandom,
    ) -> Self {
        let colors = config.colors.temperature_colors().unwrap_or_else(|e| {
            warn!("Falling back to default colors: {}", e);
            TemperatureColors::default()
        });
        let renderer = SceneRenderer::new(config.layout, colors);

        let state = SimulationState::new(init_hot, init_cold);
        info!(
            "Simulator initialized: hot={:.1}, cold={:.1}, k={}",
            state.init_hot,
            state.init_cold,
            config.transfer_k()
        );

        Self {
            hot_input: state.init_hot.round() as i32,
            cold_input: state.init_cold.round() as i32,
            state,
            stepper: Stepper::new(config, random),
            renderer,
            greek_labels: false,
            last_frame_time: Instant::now(),
        }
    }

    /// Reset from the slider values, writing a coerced hot value back
    fn reset_from_inputs(&mut self) {
        let (hot, _) = self
            .state
            .reset(self.hot_input as f64, self.cold_input as f64);
        self.hot_input = hot.round() as i32;
    }

    /// Start/Pause button
    fn toggle_run(&mut self) {
        if !self.state.running && self.state.is_settled() {
            self.reset_from_inputs();
        }
        self.state.toggle();
    }

    fn labels(&self) -> &'static SceneLabels {
        if self.greek_labels {
            &SceneLabels::GREEK
        } else {
            &SceneLabels::ENGLISH
        }
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let hot_changed = ui
                .add(egui::Slider::new(&mut self.hot_input, 1..=100).text("Hot °C"))
                .changed();
            let cold_changed = ui
                .add(egui::Slider::new(&mut self.cold_input, 0..=99).text("Cold °C"))
                .changed();

            // Slider edits only apply between runs
            if (hot_changed || cold_changed) && !self.state.running {
                self.reset_from_inputs();
            }
        });

        ui.horizontal(|ui| {
            let label = if self.state.running { "Pause" } else { "Start" };
            if ui.button(label).clicked() {
                self.toggle_run();
            }

            if ui.button("Reset").clicked() {
                self.reset_from_inputs();
            }

            ui.checkbox(&mut self.greek_labels, "Ελληνικά");
        });
    }

    fn status_ui(&self, ui: &mut egui::Ui) {
        let status = self.state.status_label();
        let status_text = if self.greek_labels {
            status.display_name_el()
        } else {
            status.display_name()
        };

        ui.horizontal(|ui| {
            ui.label(RichText::new(status_text).strong());
            ui.separator();
            ui.label(format!("t = {:.2} s", self.state.elapsed_time));
            ui.separator();
            ui.label(format!("T_eq = {:.2} °C", self.state.equilibrium_target()));
        });

        ui.label(
            RichText::new(format!(
                "Phase: {} | Contact: {:.0}% | Particles: {} | Samples: {}",
                self.state.phase().display_name(),
                self.state.contact_progress * 100.0,
                self.state.particles.len(),
                self.state.hot_history.len()
            ))
            .color(Color32::GRAY)
            .small(),
        );
    }
}

impl eframe::App for ThermalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame_time).as_secs_f64();
        self.last_frame_time = now;

        self.stepper.step(&mut self.state, dt);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Thermal Equilibrium");
            ui.separator();

            self.controls_ui(ui);
            ui.separator();
            self.status_ui(ui);
            ui.separator();

            let labels = self.labels();
            let width = ui.available_width();

            let scene = self.renderer.scene_size();
            let scene_size = Vec2::new(width, width * scene.y / scene.x);
            let (response, painter) = ui.allocate_painter(scene_size, Sense::hover());
            self.renderer.draw_scene(&painter, response.rect, &self.state, labels);

            ui.add_space(8.0);

            let (response, painter) = ui.allocate_painter(Vec2::new(width, GRAPH_HEIGHT), Sense::hover());
            self.renderer.draw_graph(&painter, response.rect, &self.state, labels);
        });

        // Keep frame deltas small while a run is in progress
        if self.state.running {
            ctx.request_repaint();
        }
    }
}
