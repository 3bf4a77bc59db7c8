//! 4x4 matrix utilities for camera transforms
//!
//! Matrices are column-major (`m[column][row]`) to match WGSL's `mat4x4<f32>`
//! layout, and projections target wgpu's `[0, 1]` clip-space depth range.

use crate::Vec3;

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Right-handed perspective projection looking down -Z.
///
/// # Arguments
/// * `fov_y` - Vertical field of view in radians
/// * `aspect` - Viewport width / height
/// * `near`, `far` - Clip plane distances (both positive)
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let nf = 1.0 / (near - far);

    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far * nf, -1.0],
        [0.0, 0.0, near * far * nf, 0.0],
    ]
}

/// Right-handed view matrix for an eye looking at a target
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalized();
    let s = f.cross(up).normalized();
    let u = s.cross(f);

    [
        [s.x, u.x, -f.x, 0.0],
        [s.y, u.y, -f.y, 0.0],
        [s.z, u.z, -f.z, 0.0],
        [-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0],
    ]
}

/// Multiply two column-major matrices (`a * b`, so `b` applies first)
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];
    for (col, out) in result.iter_mut().enumerate() {
        for (row, value) in out.iter_mut().enumerate() {
            *value = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    result
}

/// Transform a homogeneous point
pub fn transform(m: Mat4, p: [f32; 4]) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = (0..4).map(|col| m[col][row] * p[col]).sum();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn ndc(m: Mat4, p: Vec3) -> [f32; 3] {
        let c = transform(m, [p.x, p.y, p.z, 1.0]);
        [c[0] / c[3], c[1] / c[3], c[2] / c[3]]
    }

    #[test]
    fn test_identity_mul() {
        let proj = perspective(1.0, 1.5, 0.1, 100.0);
        assert_eq!(mul(IDENTITY, proj), proj);
        assert_eq!(mul(proj, IDENTITY), proj);
    }

    #[test]
    fn test_perspective_depth_range() {
        let proj = perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 1000.0);
        let near = ndc(proj, Vec3::new(0.0, 0.0, -0.1));
        let far = ndc(proj, Vec3::new(0.0, 0.0, -1000.0));
        assert!(near[2].abs() < EPSILON);
        assert!((far[2] - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_look_at_moves_target_to_negative_z() {
        let view = look_at(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO, Vec3::Y);
        let p = transform(view, [0.0, 0.0, 0.0, 1.0]);
        assert!(p[0].abs() < EPSILON);
        assert!(p[1].abs() < EPSILON);
        assert!((p[2] + 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_view_projection_centers_target() {
        let view = look_at(Vec3::new(10.0, 20.0, 30.0), Vec3::new(1.0, 2.0, 3.0), Vec3::Y);
        let proj = perspective(1.3, 16.0 / 9.0, 0.1, 1000.0);
        let p = ndc(mul(proj, view), Vec3::new(1.0, 2.0, 3.0));
        assert!(p[0].abs() < EPSILON);
        assert!(p[1].abs() < EPSILON);
        assert!(p[2] > 0.0 && p[2] < 1.0);
    }

    #[test]
    fn test_aspect_squeezes_x() {
        let wide = perspective(1.0, 2.0, 0.1, 10.0);
        let square = perspective(1.0, 1.0, 0.1, 10.0);
        assert!((wide[0][0] * 2.0 - square[0][0]).abs() < EPSILON);
    }
}
