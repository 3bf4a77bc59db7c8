//! GPU device, queue and surface management

use std::sync::Arc;
use winit::{dpi::PhysicalSize, window::Window};

use crate::support::required_limits;

/// Failure while acquiring GPU resources
#[derive(Debug)]
pub enum ContextError {
    /// Surface could not be created for the window
    Surface(String),
    /// No adapter matched the request
    NoAdapter,
    /// Adapter refused to create a device
    Device(String),
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextError::Surface(msg) => write!(f, "Surface creation failed: {}", msg),
            ContextError::NoAdapter => write!(f, "No suitable GPU adapter found"),
            ContextError::Device(msg) => write!(f, "Device creation failed: {}", msg),
        }
    }
}

impl std::error::Error for ContextError {}

/// Window-backed rendering context
pub struct RenderContext {
    pub surface: wgpu::Surface<'static>,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
}

impl RenderContext {
    /// Create a context, choosing a present mode from the vsync flag
    pub async fn with_vsync(window: Arc<Window>, vsync: bool) -> Result<Self, ContextError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();

        let surface = instance
            .create_surface(window)
            .map_err(|e| ContextError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ContextError::NoAdapter)?;

        let (device, queue) = request_device(&adapter).await?;

        let caps = surface.get_capabilities(&adapter);
        // Clear colours are given as plain hex values, so prefer a non-sRGB
        // surface that shows them unconverted
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(caps.formats[0]);

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            adapter,
            device,
            queue,
            config,
            size,
        })
    }

    /// Reconfigure the surface for a new window size
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Width / height of the surface
    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }
}

/// Device without a surface, for off-screen work
pub struct HeadlessContext {
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl HeadlessContext {
    pub async fn new() -> Result<Self, ContextError> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ContextError::NoAdapter)?;

        let (device, queue) = request_device(&adapter).await?;

        Ok(Self { adapter, device, queue })
    }
}

async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue), ContextError> {
    let info = adapter.get_info();
    log::info!("Using GPU: {} ({:?})", info.name, info.backend);

    adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("FBO Particles Device"),
                required_features: wgpu::Features::empty(),
                required_limits: required_limits(&adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        )
        .await
        .map_err(|e| ContextError::Device(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_error_display() {
        assert_eq!(format!("{}", ContextError::NoAdapter), "No suitable GPU adapter found");
        assert_eq!(
            format!("{}", ContextError::Device("lost".to_string())),
            "Device creation failed: lost"
        );
    }
}
