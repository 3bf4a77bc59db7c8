//! FBO particle viewer
//!
//! Library half of the viewer binary: configuration loading and the
//! window, render and simulation systems.

pub mod config;
pub mod systems;
