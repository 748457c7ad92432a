//! SimulationConfig data structure
//!
//! Contains the heat exchange constants, particle tuning and canvas layout.
//! Every field is optional in the JSON form and falls back to the defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::color::{parse_hex_color, TemperatureColors};

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("transfer rate constant must be positive, got {0}")]
    NonPositiveTransferRate(f64),
    #[error("{name} must be positive, got {value}")]
    NonPositiveDuration { name: &'static str, value: f64 },
    #[error("transfer rate {transfer_k} with frame cap {max_frame_dt}s overshoots equilibrium, 2 * k * dt must stay below 1")]
    UnstableExchange { transfer_k: f64, max_frame_dt: f64 },
    #[error("equilibrium tolerance must be positive, got {0}")]
    NonPositiveTolerance(f64),
    #[error("spawn probability must be within [0, 1], got {0}")]
    ProbabilityOutOfRange(f32),
    #[error("particle speed range is inverted: {min} > {max}")]
    InvertedSpeedRange { min: f32, max: f32 },
    #[error("layout dimension {name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: f32 },
    #[error("containers do not fit the canvas: {required} > {width}")]
    ContainersOverflow { required: f32, width: f32 },
    #[error("invalid {name} color {value:?}, expected #RRGGBB")]
    InvalidColor { name: &'static str, value: String },
}

/// Heat exchange constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Rate constant `k` in `flow = k * (hot - cold) * dt`
    pub transfer_k: f64,
    /// Seconds for the containers to move into contact
    pub contact_duration: f64,
    /// Temperature gap below which equilibrium is declared
    pub equilibrium_tolerance: f64,
    /// Seconds to keep running after equilibrium before settling
    pub post_equilibrium_hold: f64,
    /// Minimum spacing between recorded history samples
    pub sample_interval: f64,
    /// Upper bound for a single frame delta
    pub max_frame_dt: f64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            transfer_k: 0.42,
            contact_duration: 1.0,
            equilibrium_tolerance: 0.2,
            post_equilibrium_hold: 2.5,
            sample_interval: 0.05,
            max_frame_dt: 0.033,
        }
    }
}

/// Heat particle tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// No particles are spawned while the gap is at or below this
    pub min_gap: f64,
    /// One spawn attempt per this many degrees of gap
    pub gap_per_spawn: f64,
    pub spawn_probability: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Distance from the band ends where particles start and stop
    pub edge_inset: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            min_gap: 0.15,
            gap_per_spawn: 22.0,
            spawn_probability: 0.35,
            speed_min: 170.0,
            speed_max: 260.0,
            edge_inset: 2.0,
        }
    }
}

/// Canvas layout in scene units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub container_width: f32,
    pub container_height: f32,
    pub container_top: f32,
    pub side_margin: f32,
    /// Half-height of the band particles travel in
    pub particle_band_half: f32,
    /// Half-height of the drawn flow band
    pub flow_band_half: f32,
    pub flow_band_padding: f32,
    pub flow_band_min_width: f32,
    /// Contact progress at which the flow band becomes visible
    pub flow_visible_from: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 900.0,
            canvas_height: 240.0,
            container_width: 180.0,
            container_height: 120.0,
            container_top: 52.0,
            side_margin: 150.0,
            particle_band_half: 10.0,
            flow_band_half: 11.0,
            flow_band_padding: 6.0,
            flow_band_min_width: 22.0,
            flow_visible_from: 0.02,
        }
    }
}

/// Container fill colors as hex strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Fill at 0 °C
    pub cold: String,
    /// Fill at 100 °C
    pub hot: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            cold: "#236BFF".to_string(),
            hot: "#E2282E".to_string(),
        }
    }
}

impl ColorConfig {
    /// Parse both endpoints
    pub fn temperature_colors(&self) -> std::result::Result<TemperatureColors, ConfigError> {
        let parse = |name: &'static str, value: &str| {
            parse_hex_color(value).ok_or_else(|| ConfigError::InvalidColor {
                name,
                value: value.to_string(),
            })
        };

        Ok(TemperatureColors {
            cold: parse("cold", &self.cold)?,
            hot: parse("hot", &self.hot)?,
        })
    }
}

/// Complete simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimulationConfig {
    pub exchange: ExchangeConfig,
    pub particles: ParticleConfig,
    pub layout: LayoutConfig,
    pub colors: ColorConfig,
}

impl SimulationConfig {
    /// Get default configuration
    pub fn get_default() -> Self {
        Self::default()
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let ex = &self.exchange;
        if !(ex.transfer_k > 0.0) {
            return Err(ConfigError::NonPositiveTransferRate(ex.transfer_k));
        }
        for (name, value) in [
            ("contact_duration", ex.contact_duration),
            ("post_equilibrium_hold", ex.post_equilibrium_hold),
            ("sample_interval", ex.sample_interval),
            ("max_frame_dt", ex.max_frame_dt),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveDuration { name, value });
            }
        }
        // Each exchange step scales the gap by 1 - 2 * k * dt
        if 2.0 * ex.transfer_k * ex.max_frame_dt >= 1.0 {
            return Err(ConfigError::UnstableExchange {
                transfer_k: ex.transfer_k,
                max_frame_dt: ex.max_frame_dt,
            });
        }
        if !(ex.equilibrium_tolerance > 0.0) {
            return Err(ConfigError::NonPositiveTolerance(ex.equilibrium_tolerance));
        }

        let p = &self.particles;
        if !(0.0..=1.0).contains(&p.spawn_probability) {
            return Err(ConfigError::ProbabilityOutOfRange(p.spawn_probability));
        }
        if p.speed_min > p.speed_max {
            return Err(ConfigError::InvertedSpeedRange {
                min: p.speed_min,
                max: p.speed_max,
            });
        }

        let l = &self.layout;
        for (name, value) in [
            ("canvas_width", l.canvas_width),
            ("canvas_height", l.canvas_height),
            ("container_width", l.container_width),
            ("container_height", l.container_height),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }
        let required = 2.0 * (l.side_margin + l.container_width);
        if required > l.canvas_width {
            return Err(ConfigError::ContainersOverflow {
                required,
                width: l.canvas_width,
            });
        }

        self.colors.temperature_colors()?;

        Ok(())
    }

    pub fn transfer_k(&self) -> f64 {
        self.exchange.transfer_k
    }

    pub fn contact_duration(&self) -> f64 {
        self.exchange.contact_duration
    }

    pub fn equilibrium_tolerance(&self) -> f64 {
        self.exchange.equilibrium_tolerance
    }

    pub fn post_equilibrium_hold(&self) -> f64 {
        self.exchange.post_equilibrium_hold
    }

    pub fn sample_interval(&self) -> f64 {
        self.exchange.sample_interval
    }

    pub fn max_frame_dt(&self) -> f64 {
        self.exchange.max_frame_dt
    }
}
