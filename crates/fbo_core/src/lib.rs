//! Particle field data
//!
//! Everything the FBO renderer needs on the CPU before touching the GPU:
//!
//! - [`PositionData`] - initial particle positions, one RGBA32F texel per particle
//! - [`lookup_coordinates`] - per-particle texel coordinates for the point cloud
//! - [`Canvas`] / [`Context2d`] - a small RGBA raster used to sample images
//! - [`positions_from_image`] - greyscale-elevation terrain from an image
//! - [`FieldSource`] - where the initial positions come from

pub mod canvas;
pub mod field;
pub mod heightmap;
mod error;

pub use canvas::{Canvas, Context2d, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use error::FieldError;
pub use field::{lookup_coordinates, FieldSource, PositionData};
pub use heightmap::{load_heightmap, positions_from_image};

// Re-export math types for convenience
pub use fbo_math::Vec3;
