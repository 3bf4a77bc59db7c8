//! Perspective camera orbiting a target
//!
//! The camera stores its position as spherical coordinates around `target`,
//! which makes orbit, dolly and pan from [`OrbitController`] simple updates.
//!
//! [`OrbitController`]: fbo_input::OrbitController

use fbo_input::OrbitControl;
use fbo_math::{mat4, Mat4, Spherical, Vec3};

/// Perspective camera
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Viewport width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Point the camera orbits and looks at
    pub target: Vec3,
    /// Distance clamps applied on dolly
    pub min_distance: f32,
    pub max_distance: f32,

    spherical: Spherical,
    home: (Vec3, Spherical),
}

impl OrbitCamera {
    /// Create a camera at `position` looking at `target`
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32, position: Vec3, target: Vec3) -> Self {
        let spherical = Spherical::from_offset(position - target).make_safe();
        Self {
            fov,
            aspect,
            near,
            far,
            target,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            spherical,
            home: (target, spherical),
        }
    }

    /// Builder: clamp the orbit distance
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self.spherical.radius = self.spherical.radius.clamp(min, max);
        self
    }

    /// World-space eye position
    pub fn position(&self) -> Vec3 {
        self.target + self.spherical.to_offset()
    }

    /// Distance from eye to target
    pub fn distance(&self) -> f32 {
        self.spherical.radius
    }

    /// Update the aspect ratio after a resize
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4::look_at(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        mat4::perspective(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Combined projection * view
    pub fn view_projection(&self) -> Mat4 {
        mat4::mul(self.projection_matrix(), self.view_matrix())
    }

    /// Return to the construction-time position and target
    pub fn reset(&mut self) {
        self.target = self.home.0;
        self.spherical = self.home.1;
    }
}

impl OrbitControl for OrbitCamera {
    fn rotate(&mut self, delta_theta: f32, delta_phi: f32) {
        self.spherical.theta += delta_theta;
        self.spherical.phi += delta_phi;
        self.spherical = self.spherical.make_safe();
    }

    fn dolly(&mut self, scale: f32) {
        self.spherical.radius = (self.spherical.radius * scale).clamp(self.min_distance, self.max_distance);
    }

    fn pan(&mut self, delta_x: f32, delta_y: f32, viewport_height: f32) {
        // World units covered by one pixel at the target's depth
        let half_fov = (self.fov.to_radians() / 2.0).tan();
        let units_per_pixel = 2.0 * self.spherical.radius * half_fov / viewport_height.max(1.0);

        let forward = (self.target - self.position()).normalized();
        let right = forward.cross(Vec3::Y).normalized();
        let up = right.cross(forward);

        // Dragging right moves the scene right, so the target moves left
        self.target += right * (-delta_x * units_per_pixel) + up * (delta_y * units_per_pixel);
    }
}
