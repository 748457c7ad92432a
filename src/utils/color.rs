//! Color utilities
//!
//! Temperature to color mapping and hex parsing.

/// Default fill color at 0 °C
pub const COLD_RGB: (u8, u8, u8) = (35, 107, 255);
/// Default fill color at 100 °C
pub const HOT_RGB: (u8, u8, u8) = (226, 40, 46);

/// Parse hex color string to RGB tuple
///
/// Accepts formats: "#RRGGBB" or "RRGGBB"
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');

    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Linear interpolation between two colors, `t` clamped to [0, 1]
pub fn lerp_rgb(from: (u8, u8, u8), to: (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;

    (channel(from.0, to.0), channel(from.1, to.1), channel(from.2, to.2))
}

/// Container fill colors at the ends of the 0..100 °C scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureColors {
    pub cold: (u8, u8, u8),
    pub hot: (u8, u8, u8),
}

impl Default for TemperatureColors {
    fn default() -> Self {
        Self {
            cold: COLD_RGB,
            hot: HOT_RGB,
        }
    }
}

impl TemperatureColors {
    /// Fill color for a temperature in °C, clamped to 0..100
    pub fn rgb(&self, temp_c: f64) -> (u8, u8, u8) {
        let t = if temp_c.is_nan() { 0.0 } else { temp_c.clamp(0.0, 100.0) / 100.0 };
        lerp_rgb(self.cold, self.hot, t as f32)
    }

    /// Fill color as an egui color
    pub fn color32(&self, temp_c: f64) -> egui::Color32 {
        let (r, g, b) = self.rgb(temp_c);
        egui::Color32::from_rgb(r, g, b)
    }
}
