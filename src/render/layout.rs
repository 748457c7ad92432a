//! Scene layout
//!
//! Container positions and the flow band between them, in scene units.
//! Shared by the renderer and by particle spawning.

use crate::config::LayoutConfig;

/// Container rectangles for a given contact progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerLayout {
    pub hot_x: f32,
    pub cold_x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Horizontal strip between the containers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowBand {
    pub start_x: f32,
    pub end_x: f32,
    pub center_y: f32,
}

impl ContainerLayout {
    /// Compute positions; the cold container slides left as progress goes 0 -> 1
    pub fn at(layout: &LayoutConfig, contact_progress: f64) -> Self {
        let progress = contact_progress.clamp(0.0, 1.0) as f32;
        let hot_x = layout.side_margin;
        let gap = max_gap(layout) * (1.0 - progress);

        Self {
            hot_x,
            cold_x: hot_x + layout.container_width + gap,
            top: layout.container_top,
            width: layout.container_width,
            height: layout.container_height,
        }
    }

    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }

    /// Flow band spanning the contact region
    pub fn flow_band(&self, layout: &LayoutConfig) -> FlowBand {
        let start_x = self.hot_x + self.width - layout.flow_band_padding;
        let end_x = (self.cold_x + layout.flow_band_padding).max(start_x + layout.flow_band_min_width);

        FlowBand {
            start_x,
            end_x,
            center_y: self.center_y(),
        }
    }
}

/// Gap between the containers before contact starts
pub fn max_gap(layout: &LayoutConfig) -> f32 {
    let cold_rest_x = layout.canvas_width - layout.side_margin - layout.container_width;
    cold_rest_x - (layout.side_margin + layout.container_width)
}
