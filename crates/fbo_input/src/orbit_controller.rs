//! Orbit controller for mouse-driven camera input
//!
//! Controls:
//! - Left drag: orbit around the target
//! - Right / middle drag: pan the target in the view plane
//! - Wheel: dolly toward / away from the target
//!
//! Motion is accumulated between frames and applied by [`OrbitController::update`].
//! With damping enabled only a fraction of the accumulated rotation and pan is
//! applied per frame; the rest decays over the following frames.

use std::f32::consts::PI;

use winit::event::{ElementState, MouseButton};

/// Orbit controller for handling input
pub struct OrbitController {
    // Button state
    rotating: bool,
    panning: bool,
    /// Last cursor position in window pixels
    cursor: Option<(f64, f64)>,

    // Accumulated, not yet applied motion
    theta_delta: f32,
    phi_delta: f32,
    pan_delta: (f32, f32),
    zoom_ticks: f32,

    // Configuration
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_enabled: bool,
    pub damping_factor: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            rotating: false,
            panning: false,
            cursor: None,

            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_delta: (0.0, 0.0),
            zoom_ticks: 0.0,

            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            damping_enabled: false,
            damping_factor: 0.05,
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;

        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right | MouseButton::Middle => self.panning = pressed,
            _ => {}
        }
    }

    /// Process a cursor position in window pixels
    ///
    /// The first position after entering the window only sets the origin.
    pub fn process_cursor_moved(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.cursor.replace((x, y)) {
            self.process_mouse_motion(x - last_x, y - last_y);
        }
    }

    /// Forget the cursor position once it leaves the window
    pub fn process_cursor_left(&mut self) {
        self.cursor = None;
    }

    /// Process mouse movement in window pixels
    ///
    /// Motion is ignored unless a drag is in progress.
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        if self.rotating {
            self.theta_delta -= delta_x as f32;
            self.phi_delta -= delta_y as f32;
        } else if self.panning {
            self.pan_delta.0 += delta_x as f32;
            self.pan_delta.1 += delta_y as f32;
        }
    }

    /// Process wheel input in lines; positive scrolls zoom in
    pub fn process_scroll(&mut self, lines: f32) {
        self.zoom_ticks += lines;
    }

    /// Apply accumulated input to the camera
    ///
    /// `viewport_height` is in pixels and converts drag distance into angles:
    /// dragging across the full viewport height turns a full circle.
    pub fn update<C: OrbitControl>(&mut self, camera: &mut C, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        let factor = if self.damping_enabled {
            self.damping_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };

        // Pending pixel deltas become angles once, then decay as angles
        let theta = 2.0 * PI * self.theta_delta / height * self.rotate_speed;
        let phi = 2.0 * PI * self.phi_delta / height * self.rotate_speed;
        if theta != 0.0 || phi != 0.0 {
            camera.rotate(theta * factor, phi * factor);
        }

        let (pan_x, pan_y) = self.pan_delta;
        if pan_x != 0.0 || pan_y != 0.0 {
            camera.pan(pan_x * self.pan_speed * factor, pan_y * self.pan_speed * factor, height);
        }

        if self.zoom_ticks != 0.0 {
            camera.dolly(0.95f32.powf(self.zoom_speed * self.zoom_ticks));
            self.zoom_ticks = 0.0;
        }

        let keep = 1.0 - factor;
        self.theta_delta *= keep;
        self.phi_delta *= keep;
        self.pan_delta = (pan_x * keep, pan_y * keep);

        // Snap tiny residuals so damping settles
        if self.theta_delta.abs() < 1e-3 {
            self.theta_delta = 0.0;
        }
        if self.phi_delta.abs() < 1e-3 {
            self.phi_delta = 0.0;
        }
        if self.pan_delta.0.abs() < 1e-3 && self.pan_delta.1.abs() < 1e-3 {
            self.pan_delta = (0.0, 0.0);
        }
    }

    /// Check if a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.rotating || self.panning
    }

    /// Check if input is still being applied (drag or damping tail)
    pub fn is_active(&self) -> bool {
        self.is_dragging()
            || self.theta_delta != 0.0
            || self.phi_delta != 0.0
            || self.pan_delta != (0.0, 0.0)
            || self.zoom_ticks != 0.0
    }

    /// Drop any pending motion
    pub fn reset(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.pan_delta = (0.0, 0.0);
        self.zoom_ticks = 0.0;
    }

    /// Toggle damping on/off
    pub fn toggle_damping(&mut self) -> bool {
        self.damping_enabled = !self.damping_enabled;
        self.damping_enabled
    }

    /// Builder: set rotation speed
    pub fn with_rotate_speed(mut self, speed: f32) -> Self {
        self.rotate_speed = speed;
        self
    }

    /// Builder: set zoom speed
    pub fn with_zoom_speed(mut self, speed: f32) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Builder: set pan speed
    pub fn with_pan_speed(mut self, speed: f32) -> Self {
        self.pan_speed = speed;
        self
    }

    /// Builder: enable or disable damping
    pub fn with_damping(mut self, enabled: bool) -> Self {
        self.damping_enabled = enabled;
        self
    }

    /// Builder: set damping factor (fraction of pending motion applied per frame)
    pub fn with_damping_factor(mut self, factor: f32) -> Self {
        self.damping_factor = factor;
        self
    }
}

/// Trait for orbit camera control
/// Allows the controller to work with different camera implementations
pub trait OrbitControl {
    /// Add to the azimuth and polar angles (radians)
    fn rotate(&mut self, delta_theta: f32, delta_phi: f32);
    /// Multiply the distance to the target
    fn dolly(&mut self, scale: f32);
    /// Move camera and target in the view plane by a pixel offset
    fn pan(&mut self, delta_x: f32, delta_y: f32, viewport_height: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        theta: f32,
        phi: f32,
        scale: f32,
        pan: (f32, f32),
    }

    impl OrbitControl for Recorder {
        fn rotate(&mut self, delta_theta: f32, delta_phi: f32) {
            self.theta += delta_theta;
            self.phi += delta_phi;
        }
        fn dolly(&mut self, scale: f32) {
            self.scale = scale;
        }
        fn pan(&mut self, delta_x: f32, delta_y: f32, _viewport_height: f32) {
            self.pan.0 += delta_x;
            self.pan.1 += delta_y;
        }
    }

    fn press(c: &mut OrbitController, button: MouseButton) {
        c.process_mouse_button(button, ElementState::Pressed);
    }

    #[test]
    fn test_motion_ignored_without_drag() {
        let mut c = OrbitController::new();
        c.process_mouse_motion(10.0, 10.0);
        assert!(!c.is_active());
    }

    #[test]
    fn test_full_height_drag_is_full_turn() {
        let mut c = OrbitController::new();
        let mut cam = Recorder::default();
        press(&mut c, MouseButton::Left);
        c.process_mouse_motion(500.0, 0.0);
        c.update(&mut cam, 500.0);
        assert!((cam.theta + 2.0 * PI).abs() < 1e-4);
        assert_eq!(cam.phi, 0.0);
    }

    #[test]
    fn test_cursor_drag_across_viewport_is_full_turn() {
        let mut c = OrbitController::new();
        let mut cam = Recorder::default();
        c.process_cursor_moved(100.0, 50.0);
        press(&mut c, MouseButton::Left);
        c.process_cursor_moved(350.0, 50.0);
        c.process_cursor_moved(600.0, 50.0);
        c.update(&mut cam, 500.0);
        assert!((cam.theta + 2.0 * PI).abs() < 1e-4);
        assert_eq!(cam.phi, 0.0);
    }

    #[test]
    fn test_cursor_reentry_does_not_jump() {
        let mut c = OrbitController::new();
        let mut cam = Recorder::default();
        press(&mut c, MouseButton::Left);
        c.process_cursor_moved(10.0, 10.0);
        c.process_cursor_left();
        c.process_cursor_moved(400.0, 300.0);
        c.update(&mut cam, 500.0);
        assert_eq!(cam.theta, 0.0);
        assert_eq!(cam.phi, 0.0);
    }

    #[test]
    fn test_undamped_applies_once() {
        let mut c = OrbitController::new();
        let mut cam = Recorder::default();
        press(&mut c, MouseButton::Left);
        c.process_mouse_motion(0.0, 100.0);
        c.update(&mut cam, 400.0);
        let after_first = cam.phi;
        c.update(&mut cam, 400.0);
        assert_eq!(cam.phi, after_first);
    }

    #[test]
    fn test_damping_spreads_rotation() {
        let mut c = OrbitController::new().with_damping(true).with_damping_factor(0.5);
        let mut cam = Recorder::default();
        press(&mut c, MouseButton::Left);
        c.process_mouse_motion(100.0, 0.0);
        c.update(&mut cam, 100.0);
        let first = cam.theta;
        assert!((first + PI).abs() < 1e-4);
        c.update(&mut cam, 100.0);
        assert!((cam.theta - first + PI / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_right_drag_pans() {
        let mut c = OrbitController::new().with_pan_speed(2.0);
        let mut cam = Recorder::default();
        press(&mut c, MouseButton::Right);
        c.process_mouse_motion(3.0, -4.0);
        c.update(&mut cam, 100.0);
        assert_eq!(cam.pan, (6.0, -8.0));
        assert_eq!(cam.theta, 0.0);
    }

    #[test]
    fn test_scroll_zooms_in() {
        let mut c = OrbitController::new();
        let mut cam = Recorder::default();
        c.process_scroll(1.0);
        c.update(&mut cam, 100.0);
        assert!((cam.scale - 0.95).abs() < 1e-6);
        assert!(!c.is_active());
    }

    #[test]
    fn test_reset_clears_pending() {
        let mut c = OrbitController::new();
        press(&mut c, MouseButton::Left);
        c.process_mouse_motion(5.0, 5.0);
        c.process_mouse_button(MouseButton::Left, ElementState::Released);
        c.reset();
        assert!(!c.is_active());
    }

    #[test]
    fn test_toggle_damping() {
        let mut c = OrbitController::new();
        assert!(c.toggle_damping());
        assert!(!c.toggle_damping());
    }
}
