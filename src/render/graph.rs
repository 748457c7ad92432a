//! Temperature-vs-time graph scaling
//!
//! Maps history samples into a plot rectangle with fixed margins.

use crate::app::state::HistorySample;

/// Shortest time axis shown, in seconds
pub const MIN_TIME_SPAN: f64 = 8.0;
/// Headroom added past the current time
pub const TIME_HEADROOM: f64 = 0.8;
pub const MIN_TEMPERATURE: f64 = 0.0;
pub const MAX_TEMPERATURE: f64 = 100.0;

/// Plot margins in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphMargins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for GraphMargins {
    fn default() -> Self {
        Self {
            left: 56.0,
            right: 24.0,
            top: 20.0,
            bottom: 42.0,
        }
    }
}

/// Axis ranges and plot area for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphScale {
    pub margins: GraphMargins,
    pub width: f32,
    pub height: f32,
    pub max_time: f64,
}

impl GraphScale {
    /// Scale for a canvas of `width` x `height` showing up to `elapsed_time`
    pub fn new(width: f32, height: f32, elapsed_time: f64) -> Self {
        Self {
            margins: GraphMargins::default(),
            width,
            height,
            max_time: MIN_TIME_SPAN.max(elapsed_time + TIME_HEADROOM),
        }
    }

    pub fn plot_width(&self) -> f32 {
        (self.width - self.margins.left - self.margins.right).max(0.0)
    }

    pub fn plot_height(&self) -> f32 {
        (self.height - self.margins.top - self.margins.bottom).max(0.0)
    }

    /// Canvas x for a time value
    pub fn x(&self, time: f64) -> f32 {
        self.margins.left + (time / self.max_time) as f32 * self.plot_width()
    }

    /// Canvas y for a temperature value
    pub fn y(&self, temperature: f64) -> f32 {
        let t = (temperature - MIN_TEMPERATURE) / (MAX_TEMPERATURE - MIN_TEMPERATURE);
        self.margins.top + self.plot_height() - t as f32 * self.plot_height()
    }

    /// Canvas points for a sample series
    pub fn project(&self, samples: &[HistorySample]) -> Vec<(f32, f32)> {
        samples
            .iter()
            .map(|s| (self.x(s.time), self.y(s.temperature)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_axis_minimum() {
        assert_eq!(GraphScale::new(800.0, 260.0, 0.0).max_time, MIN_TIME_SPAN);
        assert_eq!(GraphScale::new(800.0, 260.0, 7.0).max_time, MIN_TIME_SPAN);
        assert!((GraphScale::new(800.0, 260.0, 12.0).max_time - 12.8).abs() < 1e-9);
    }

    #[test]
    fn test_axis_mapping() {
        let scale = GraphScale::new(800.0, 262.0, 0.0);
        // Plot area: 720 x 200 starting at (56, 20)
        assert_eq!(scale.x(0.0), 56.0);
        assert_eq!(scale.x(8.0), 776.0);
        assert_eq!(scale.y(100.0), 20.0);
        assert_eq!(scale.y(0.0), 220.0);
        assert_eq!(scale.y(50.0), 120.0);
    }

    #[test]
    fn test_project_series() {
        let scale = GraphScale::new(800.0, 262.0, 0.0);
        let points = scale.project(&[
            HistorySample { time: 0.0, temperature: 80.0 },
            HistorySample { time: 4.0, temperature: 50.0 },
        ]);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1], (416.0, 120.0));
    }
}
