//! Rendering pipeline components
//!
//! This module contains the off-screen simulation pipeline (the FBO) and the
//! on-screen points pipeline that reads it.

pub mod types;
pub mod simulation_pipeline;
pub mod points_pipeline;

// Re-export types
pub use types::{
    PlaneVertex, SimulationUniforms, PointUniforms, PLANE_VERTICES, POINT_QUAD_VERTICES,
};

// Re-export pipelines
pub use simulation_pipeline::{SimulationPipeline, ReadbackError};
pub use points_pipeline::{PointsPipeline, clear_color, hex_to_rgba};
