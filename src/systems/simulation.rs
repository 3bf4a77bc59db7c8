//! Simulation clock
//!
//! Turns wall-clock frames into [`SimulationUniforms`] for the FBO pass:
//! - Delta time calculation
//! - Pause handling
//! - Rotation angle for the current step

use std::time::Instant;
use fbo_render::pipeline::SimulationUniforms;
use crate::config::SimulationConfig;

/// Longest step accepted; longer frames (first frame, window focus) are clamped
const MAX_DELTA: f32 = 0.25;

/// Advances simulation time once per frame
pub struct SimulationSystem {
    last_frame: Instant,
    frame_time: f32,
    elapsed: f32,
    paused: bool,
    spin_speed: f32,
    feedback: bool,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            last_frame: Instant::now(),
            frame_time: 0.0,
            elapsed: 0.0,
            paused: config.paused,
            spin_speed: config.spin_speed,
            feedback: config.feedback,
        }
    }

    /// Measure the frame time and produce this frame's uniforms
    pub fn update(&mut self) -> SimulationUniforms {
        let now = Instant::now();
        let raw_dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_time = raw_dt;
        self.step(raw_dt)
    }

    /// Wall-clock length of the last frame, unaffected by pause
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Advance by `dt` seconds
    ///
    /// With feedback the angle is the increment for this step, since the
    /// previous output already holds the accumulated rotation. Without it the
    /// initial data is rotated by the total elapsed angle.
    pub fn step(&mut self, dt: f32) -> SimulationUniforms {
        let dt = if self.paused { 0.0 } else { dt.clamp(0.0, MAX_DELTA) };
        self.elapsed += dt;

        let angle = if self.feedback {
            self.spin_speed * dt
        } else {
            self.spin_speed * self.elapsed
        };

        SimulationUniforms {
            time: self.elapsed,
            delta: dt,
            angle,
            _padding: 0.0,
        }
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Seconds simulated so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Restart simulated time at zero
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.last_frame = Instant::now();
    }
}

/// Frame rate averaged over a short window
pub struct FrameStats {
    frames: u32,
    accumulated: f32,
    window: f32,
    fps: Option<f32>,
}

impl FrameStats {
    pub fn new(window: f32) -> Self {
        Self {
            frames: 0,
            accumulated: 0.0,
            window,
            fps: None,
        }
    }

    /// Record a frame; returns true when a new average is available
    pub fn record(&mut self, dt: f32) -> bool {
        self.frames += 1;
        self.accumulated += dt;
        if self.accumulated >= self.window {
            self.fps = Some(self.frames as f32 / self.accumulated);
            self.frames = 0;
            self.accumulated = 0.0;
            true
        } else {
            false
        }
    }

    pub fn fps(&self) -> Option<f32> {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(feedback: bool, spin_speed: f32) -> SimulationConfig {
        SimulationConfig {
            feedback,
            spin_speed,
            paused: false,
        }
    }

    #[test]
    fn test_default_is_still() {
        let mut sim = SimulationSystem::new(&SimulationConfig::default());
        let u = sim.step(0.016);
        assert_eq!(u.angle, 0.0);
        assert!((u.time - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_angle_accumulates_without_feedback() {
        let mut sim = SimulationSystem::new(&config(false, 2.0));
        sim.step(0.1);
        let u = sim.step(0.1);
        assert!((u.angle - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_angle_is_incremental_with_feedback() {
        let mut sim = SimulationSystem::new(&config(true, 2.0));
        sim.step(0.1);
        let u = sim.step(0.1);
        assert!((u.angle - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_delta_is_capped() {
        let mut sim = SimulationSystem::new(&config(false, 1.0));
        let u = sim.step(5.0);
        assert_eq!(u.delta, MAX_DELTA);
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut sim = SimulationSystem::new(&config(true, 1.0));
        sim.step(0.1);
        assert!(sim.toggle_pause());
        let u = sim.step(0.1);
        assert_eq!(u.delta, 0.0);
        assert_eq!(u.angle, 0.0);
        assert!((sim.elapsed() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_reset() {
        let mut sim = SimulationSystem::new(&config(false, 1.0));
        sim.step(0.2);
        sim.reset();
        assert_eq!(sim.elapsed(), 0.0);
    }

    #[test]
    fn test_frame_stats() {
        let mut stats = FrameStats::new(0.5);
        assert!(!stats.record(0.25));
        assert!(stats.record(0.25));
        assert_eq!(stats.fps(), Some(4.0));
    }
}
