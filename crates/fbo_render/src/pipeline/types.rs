//! GPU-compatible data types for the FBO pipelines
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};

/// Vertex of the full-screen simulation plane
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PlaneVertex {
    /// Clip-space position (the plane spans [-1, 1] on x and y)
    pub position: [f32; 3],
    /// Texture coordinate, v pointing down
    pub uv: [f32; 2],
}

/// Bi-unit quad as two triangles, so every FBO texel gets one fragment
pub const PLANE_VERTICES: [PlaneVertex; 6] = [
    PlaneVertex { position: [-1.0, -1.0, 0.0], uv: [0.0, 1.0] },
    PlaneVertex { position: [1.0, -1.0, 0.0], uv: [1.0, 1.0] },
    PlaneVertex { position: [1.0, 1.0, 0.0], uv: [1.0, 0.0] },
    PlaneVertex { position: [-1.0, -1.0, 0.0], uv: [0.0, 1.0] },
    PlaneVertex { position: [1.0, 1.0, 0.0], uv: [1.0, 0.0] },
    PlaneVertex { position: [-1.0, 1.0, 0.0], uv: [0.0, 0.0] },
];

/// Uniforms for the simulation pass
/// Layout: 16 bytes (must match simulation.wgsl SimulationUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SimulationUniforms {
    /// Seconds since the simulation started (excluding pauses)
    pub time: f32,
    /// Seconds since the previous simulation step
    pub delta: f32,
    /// Rotation about Y applied to the source positions, in radians
    pub angle: f32,
    pub _padding: f32,
}

/// Uniforms for the points pass
/// Layout: 96 bytes (must match points.wgsl PointUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PointUniforms {
    /// Projection * view (64 bytes)
    pub view_projection: [[f32; 4]; 4],
    /// Surface size in pixels
    pub viewport: [f32; 2],
    /// Point sprite size in pixels
    pub point_size: f32,
    pub _padding: f32,
    /// RGBA point colour
    pub color: [f32; 4],
}

impl Default for PointUniforms {
    fn default() -> Self {
        Self {
            view_projection: fbo_math::mat4::IDENTITY,
            viewport: [1.0, 1.0],
            point_size: 2.0,
            _padding: 0.0,
            color: [1.0; 4],
        }
    }
}

/// Vertices drawn per particle (two triangles forming a screen-aligned quad)
pub const POINT_QUAD_VERTICES: u32 = 6;
