//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - FBO simulation and points pipelines
//! - Frame rendering

use std::sync::Arc;
use winit::window::Window;
use fbo_core::PositionData;
use fbo_render::{
    camera::OrbitCamera,
    context::{ContextError, RenderContext},
    pipeline::{clear_color, PointUniforms, PointsPipeline, SimulationPipeline, SimulationUniforms},
    SupportError,
};
use crate::config::RenderingConfig;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// GPU context could not be created
    Context(ContextError),
    /// Adapter lacks float or vertex texture support
    Unsupported(SupportError),
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Context(e) => write!(f, "{}", e),
            RenderError::Unsupported(e) => write!(f, "{}", e),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Context(e) => Some(e),
            RenderError::Unsupported(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContextError> for RenderError {
    fn from(e: ContextError) -> Self {
        RenderError::Context(e)
    }
}

impl From<SupportError> for RenderError {
    fn from(e: SupportError) -> Self {
        RenderError::Unsupported(e)
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    simulation: SimulationPipeline,
    points: PointsPipeline,
    render_config: RenderingConfig,
}

impl RenderSystem {
    /// Create render system from window, config and initial positions
    ///
    /// Fails if the GPU cannot host the FBO; the caller should treat that as fatal.
    pub fn new(
        window: Arc<Window>,
        render_config: RenderingConfig,
        positions: &PositionData,
        feedback: bool,
        vsync: bool,
    ) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;

        let mut simulation =
            SimulationPipeline::new(&context.device, &context.queue, &context.adapter, positions)?;
        simulation.set_feedback(feedback);

        let mut points = PointsPipeline::new(&context.device, context.config.format);
        points.bind_positions(&context.device, simulation.target_views());

        // Ensure depth texture exists
        points.ensure_depth_texture(&context.device, context.config.width, context.config.height);

        log::info!(
            "FBO ready: {}x{} ({} particles)",
            simulation.width(),
            simulation.height(),
            simulation.particle_count()
        );

        Ok(Self {
            context,
            simulation,
            points,
            render_config,
        })
    }

    /// Handle window resize
    ///
    /// A zero-sized window (minimized) keeps the current surface and depth
    /// texture so both stay the same size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !is_presentable(width, height) {
            return;
        }
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.points.ensure_depth_texture(&self.context.device, width, height);
    }

    /// Restart the simulation from the initial positions
    pub fn reset_simulation(&mut self) {
        self.simulation.reset();
    }

    /// Render a single frame: one simulation step, then the points pass
    pub fn render_frame(
        &mut self,
        camera: &OrbitCamera,
        step: &SimulationUniforms,
    ) -> Result<(), RenderError> {
        self.simulation.update_uniforms(&self.context.queue, step);

        let (width, height) = self.size();
        let point_uniforms = PointUniforms {
            view_projection: camera.view_projection(),
            viewport: [width as f32, height as f32],
            point_size: self.render_config.point_size,
            _padding: 0.0,
            color: self.render_config.point_color,
        };
        self.points.update_uniforms(&self.context.queue, &point_uniforms);

        // Get surface texture
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(e) => return Err(surface_error(e)),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Simulation writes the next target before the points pass samples it
        self.simulation.update(&mut encoder);

        self.points.render(
            &mut encoder,
            &view,
            self.simulation.lookup_buffer(),
            self.simulation.particle_count(),
            self.simulation.current_target(),
            clear_color(self.render_config.clear_color),
        );

        // Submit
        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Number of particles drawn each frame
    pub fn particle_count(&self) -> u32 {
        self.simulation.particle_count()
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.config.width, self.context.config.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.context.aspect_ratio()
    }
}

/// Whether a window of this size can back a surface
fn is_presentable(width: u32, height: u32) -> bool {
    width > 0 && height > 0
}

/// Lost and outdated surfaces both need a reconfigure
fn surface_error(e: wgpu::SurfaceError) -> RenderError {
    match e {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
        wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
        e => RenderError::Other(format!("{:?}", e)),
    }
}
