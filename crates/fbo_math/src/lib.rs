//! Math Library
//!
//! Small vector and matrix helpers used by the FBO particle renderer.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - 4x4 column-major matrix for view/projection transforms
//! - [`Spherical`] - Orbit coordinates (radius, polar, azimuth)

mod vec3;
mod spherical;
pub mod mat4;

pub use vec3::Vec3;
pub use spherical::Spherical;
pub use mat4::Mat4;
