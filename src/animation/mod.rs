//! Animation module
//!
//! Frame stepping of the simulation and the random sources it draws from.

pub mod random;
mod stepper;

pub use random::{RandomSource, StdRandom};
pub use stepper::Stepper;
