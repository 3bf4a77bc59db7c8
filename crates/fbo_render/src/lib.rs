//! FBO Particle Rendering Library
//!
//! This crate provides the wgpu-based pipelines for simulating particles in a
//! floating-point frame buffer object and drawing them as points.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::OrbitCamera`] - Perspective camera orbiting a target
//! - [`support`] - Float-texture and vertex-texture capability checks
//! - [`pipeline::SimulationPipeline`] - Off-screen simulation pass (the FBO)
//! - [`pipeline::PointsPipeline`] - Particle drawing that samples the FBO

pub mod context;
pub mod camera;
pub mod support;
pub mod pipeline;

pub use support::{check_support, SupportError, POSITION_FORMAT};

// Re-export core types for convenience
pub use fbo_core::{PositionData, FieldSource, FieldError};
pub use fbo_math::Vec3;
