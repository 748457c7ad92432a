//! Scene renderer
//!
//! Draws the two containers, the heat flow band with its particles, and the
//! temperature graph with egui's Painter.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use super::graph::GraphScale;
use super::layout::ContainerLayout;
use crate::app::state::{HistorySample, SimulationState};
use crate::config::LayoutConfig;
use crate::utils::color::TemperatureColors;

const SCENE_BACKGROUND: Color32 = Color32::from_rgb(238, 244, 255);
const GRAPH_BACKGROUND: Color32 = Color32::from_rgb(249, 251, 255);
const CONTAINER_BORDER: Color32 = Color32::from_rgb(154, 176, 201);
const LABEL_COLOR: Color32 = Color32::from_rgb(18, 33, 61);
const FLOW_COLOR: Color32 = Color32::from_rgb(245, 158, 11);
const AXIS_COLOR: Color32 = Color32::from_rgb(185, 203, 224);
const AXIS_LABEL_COLOR: Color32 = Color32::from_rgb(35, 58, 90);
const HOT_CURVE: Color32 = Color32::from_rgb(217, 4, 41);
const COLD_CURVE: Color32 = Color32::from_rgb(29, 78, 216);

const PARTICLE_RADIUS: f32 = 3.3;
const ARROW_LENGTH: f32 = 14.0;
const ARROW_HALF_WIDTH: f32 = 8.0;

/// Text shown in the scene
#[derive(Debug, Clone, Copy)]
pub struct SceneLabels {
    pub hot_title: &'static str,
    pub cold_title: &'static str,
    pub flow_caption: &'static str,
    pub temperature_axis: &'static str,
    pub time_axis: &'static str,
}

impl SceneLabels {
    pub const ENGLISH: SceneLabels = SceneLabels {
        hot_title: "Hot container",
        cold_title: "Cold container",
        flow_caption: "Heat flows from hot to cold",
        temperature_axis: "Temperature (°C)",
        time_axis: "Time (s)",
    };

    pub const GREEK: SceneLabels = SceneLabels {
        hot_title: "Θερμό δοχείο",
        cold_title: "Ψυχρό δοχείο",
        flow_caption: "Ροή θερμότητας: από το θερμό προς το ψυχρό",
        temperature_axis: "Θερμοκρασία (°C)",
        time_axis: "Χρόνος (s)",
    };
}

/// Scene renderer
pub struct SceneRenderer {
    layout: LayoutConfig,
    colors: TemperatureColors,
}

impl SceneRenderer {
    /// Create new scene renderer
    pub fn new(layout: LayoutConfig, colors: TemperatureColors) -> Self {
        Self { layout, colors }
    }

    /// Canvas size in scene units
    pub fn scene_size(&self) -> Vec2 {
        Vec2::new(self.layout.canvas_width, self.layout.canvas_height)
    }

    /// Draw containers, flow band and particles into `rect`
    pub fn draw_scene(&self, painter: &Painter, rect: Rect, state: &SimulationState, labels: &SceneLabels) {
        let scale = rect.width() / self.layout.canvas_width;
        let to_screen = |x: f32, y: f32| rect.min + Vec2::new(x, y) * scale;

        painter.rect_filled(rect, 0.0, SCENE_BACKGROUND);

        let containers = ContainerLayout::at(&self.layout, state.contact_progress);
        self.draw_container(painter, to_screen(containers.hot_x, containers.top), scale, state.hot_temp, labels.hot_title);
        self.draw_container(painter, to_screen(containers.cold_x, containers.top), scale, state.cold_temp, labels.cold_title);

        if state.contact_progress >= self.layout.flow_visible_from {
            let band = containers.flow_band(&self.layout);
            let half = self.layout.flow_band_half;

            let band_rect = Rect::from_min_max(
                to_screen(band.start_x, band.center_y - half),
                to_screen(band.end_x, band.center_y + half),
            );
            painter.rect_filled(band_rect, 10.0 * scale, Color32::from_rgba_unmultiplied(245, 158, 11, 33));

            let stroke = Stroke::new(3.0 * scale, FLOW_COLOR);
            painter.line_segment([to_screen(band.start_x, band.center_y), to_screen(band.end_x, band.center_y)], stroke);

            let tip = band.end_x - 8.0;
            painter.add(Shape::convex_polygon(
                vec![
                    to_screen(tip, band.center_y),
                    to_screen(tip - ARROW_LENGTH, band.center_y - ARROW_HALF_WIDTH),
                    to_screen(tip - ARROW_LENGTH, band.center_y + ARROW_HALF_WIDTH),
                ],
                FLOW_COLOR,
                Stroke::NONE,
            ));

            let particle_color = FLOW_COLOR.gamma_multiply(0.9);
            for particle in &state.particles {
                painter.circle_filled(
                    to_screen(particle.position.x, particle.position.y),
                    PARTICLE_RADIUS * scale,
                    particle_color,
                );
            }
        }

        painter.text(
            to_screen(34.0, 34.0),
            Align2::LEFT_BOTTOM,
            labels.flow_caption,
            FontId::proportional(15.0 * scale),
            LABEL_COLOR,
        );
    }

    fn draw_container(&self, painter: &Painter, top_left: Pos2, scale: f32, temp: f64, title: &str) {
        let w = self.layout.container_width * scale;
        let h = self.layout.container_height * scale;
        let outer = Rect::from_min_size(top_left, Vec2::new(w, h));

        painter.rect_filled(outer, 16.0 * scale, Color32::WHITE);
        painter.rect_stroke(outer, 16.0 * scale, Stroke::new(3.0 * scale, CONTAINER_BORDER));

        let fill_h = h * 0.7;
        let fill = Rect::from_min_size(
            top_left + Vec2::new(10.0 * scale, h - fill_h - 8.0 * scale),
            Vec2::new(w - 20.0 * scale, fill_h),
        );
        painter.rect_filled(fill, 10.0 * scale, self.colors.color32(temp).gamma_multiply(0.9));

        painter.text(
            top_left + Vec2::new(12.0, 24.0) * scale,
            Align2::LEFT_BOTTOM,
            title,
            FontId::proportional(16.0 * scale),
            LABEL_COLOR,
        );
        painter.text(
            top_left + Vec2::new(12.0 * scale, h - 14.0 * scale),
            Align2::LEFT_BOTTOM,
            format!("{:.1} °C", temp),
            FontId::proportional(18.0 * scale),
            LABEL_COLOR,
        );
    }

    /// Draw the temperature-vs-time graph into `rect`
    pub fn draw_graph(&self, painter: &Painter, rect: Rect, state: &SimulationState, labels: &SceneLabels) {
        painter.rect_filled(rect, 0.0, GRAPH_BACKGROUND);

        let scale = GraphScale::new(rect.width(), rect.height(), state.elapsed_time);
        let m = scale.margins;
        let origin = rect.min;

        let axis = Stroke::new(1.0, AXIS_COLOR);
        let top_left = origin + Vec2::new(m.left, m.top);
        let bottom_left = origin + Vec2::new(m.left, m.top + scale.plot_height());
        let bottom_right = bottom_left + Vec2::new(scale.plot_width(), 0.0);
        painter.line_segment([top_left, bottom_left], axis);
        painter.line_segment([bottom_left, bottom_right], axis);

        let font = FontId::proportional(12.0);
        painter.text(
            origin + Vec2::new(m.left - 40.0, m.top - 6.0),
            Align2::LEFT_BOTTOM,
            labels.temperature_axis,
            font.clone(),
            AXIS_LABEL_COLOR,
        );
        painter.text(
            bottom_right + Vec2::new(-52.0, 28.0),
            Align2::LEFT_BOTTOM,
            labels.time_axis,
            font,
            AXIS_LABEL_COLOR,
        );

        Self::draw_curve(painter, origin, &scale, &state.hot_history, HOT_CURVE);
        Self::draw_curve(painter, origin, &scale, &state.cold_history, COLD_CURVE);
    }

    fn draw_curve(painter: &Painter, origin: Pos2, scale: &GraphScale, samples: &[HistorySample], color: Color32) {
        let points: Vec<Pos2> = scale
            .project(samples)
            .into_iter()
            .map(|(x, y)| origin + Vec2::new(x, y))
            .collect();

        if points.len() >= 2 {
            painter.add(Shape::line(points, Stroke::new(2.6, color)));
        }
    }
}
