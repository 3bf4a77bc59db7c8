//! Spherical coordinates for orbiting a target
//!
//! Polar angle `phi` is measured from the +Y axis, azimuth `theta` around Y
//! starting at +Z, so `(radius, PI/2, 0)` sits on the +Z axis.

use std::f32::consts::PI;

use crate::Vec3;

/// Smallest polar angle allowed by [`Spherical::make_safe`]
pub const POLE_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub const fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    /// Spherical coordinates of an offset vector (typically `eye - target`)
    pub fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    /// Convert back to a cartesian offset
    pub fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keep phi away from the poles so the view never flips over
    pub fn make_safe(mut self) -> Self {
        self.phi = self.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_on_z_axis() {
        let s = Spherical::from_offset(Vec3::new(0.0, 0.0, 100.0));
        assert!((s.radius - 100.0).abs() < 1e-5);
        assert!((s.phi - PI / 2.0).abs() < 1e-5);
        assert!(s.theta.abs() < 1e-5);
    }

    #[test]
    fn test_offset_roundtrip() {
        let v = Vec3::new(3.0, -4.0, 12.0);
        let back = Spherical::from_offset(v).to_offset();
        assert!(approx(v, back));
    }

    #[test]
    fn test_zero_offset() {
        let s = Spherical::from_offset(Vec3::ZERO);
        assert_eq!(s.radius, 0.0);
    }

    #[test]
    fn test_make_safe_clamps_poles() {
        let s = Spherical::new(1.0, 0.0, 0.0).make_safe();
        assert!(s.phi > 0.0);
        let s = Spherical::new(1.0, PI + 1.0, 0.0).make_safe();
        assert!(s.phi < PI);
    }
}
