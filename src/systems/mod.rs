//! Application systems
//!
//! Window, rendering and simulation-clock systems driven by main.rs.

mod render;
mod simulation;
mod window;

pub use render::{RenderError, RenderSystem};
pub use simulation::{FrameStats, SimulationSystem};
pub use window::{WindowError, WindowSystem};
