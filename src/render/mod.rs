//! Render module
//!
//! Contains scene layout, graph scaling and the egui scene renderer.

pub mod graph;
pub mod layout;
mod scene;

pub use scene::{SceneLabels, SceneRenderer};
