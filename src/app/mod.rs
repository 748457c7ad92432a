//! Application module
//!
//! Contains the main egui application and the simulation state machine.

mod thermal_app;
pub mod state;

pub use thermal_app::ThermalApp;
pub use state::*;
