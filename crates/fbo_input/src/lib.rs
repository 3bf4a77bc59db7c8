//! Orbit Input Handling
//!
//! This crate turns mouse input into orbit-camera motion around a target:
//! left-drag rotates, right-drag pans, and the wheel zooms.

mod orbit_controller;

pub use orbit_controller::{OrbitController, OrbitControl};
