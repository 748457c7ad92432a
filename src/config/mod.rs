//! Configuration module
//!
//! Contains the SimulationConfig data structures and their validation.

mod simulation_config;

pub use simulation_config::*;
