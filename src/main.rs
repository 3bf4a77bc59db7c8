//! FBO Particles
//!
//! Draws a field of particles whose positions live in a floating-point
//! texture, updated by an off-screen render pass every frame.

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowId,
};

use fbo_core::PositionData;
use fbo_input::OrbitController;
use fbo_math::Vec3;
use fbo_render::camera::OrbitCamera;

use fbo_particles::config::AppConfig;
use fbo_particles::systems::{
    FrameStats, RenderError, RenderSystem, SimulationSystem, WindowSystem,
};

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    /// Initial particle positions
    positions: PositionData,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    simulation: SimulationSystem,
    camera: OrbitCamera,
    controller: OrbitController,
    stats: FrameStats,
}

impl App {
    fn new(config: AppConfig, positions: PositionData) -> Self {
        let cam = &config.camera;
        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        let camera = OrbitCamera::new(
            cam.fov,
            aspect,
            cam.near,
            cam.far,
            Vec3::from_array(cam.position),
            Vec3::from_array(cam.target),
        )
        .with_distance_limits(config.controls.min_distance, config.controls.max_distance);

        let controls = &config.controls;
        let controller = OrbitController::new()
            .with_rotate_speed(controls.rotate_speed)
            .with_zoom_speed(controls.zoom_speed)
            .with_pan_speed(controls.pan_speed)
            .with_damping(controls.damping_enabled)
            .with_damping_factor(controls.damping_factor);

        let simulation = SimulationSystem::new(&config.simulation);

        Self {
            config,
            positions,
            window: None,
            render: None,
            simulation,
            camera,
            controller,
            stats: FrameStats::new(0.5),
        }
    }

    fn update_title(&self) {
        if let (Some(window), Some(render)) = (&self.window, &self.render) {
            let fps = if self.config.debug.show_fps { self.stats.fps() } else { None };
            window.update_title(render.particle_count(), fps, self.simulation.is_paused());
        }
    }

    fn reset(&mut self) {
        self.camera.reset();
        self.controller.reset();
        self.simulation.reset();
        if let Some(render) = &mut self.render {
            render.reset_simulation();
        }
        log::info!("Camera and simulation reset");
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render) = &mut self.render else {
            return;
        };

        let (_, height) = render.size();
        self.controller.update(&mut self.camera, height as f32);

        let step = self.simulation.update();

        match render.render_frame(&self.camera, &step) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => {
                let (width, height) = render.size();
                render.resize(width, height);
            }
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("{}", e),
        }

        if self.stats.record(self.simulation.frame_time()) {
            self.update_title();
        }

        // Request next frame
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let render = match RenderSystem::new(
            window.window().clone(),
            self.config.rendering.clone(),
            &self.positions,
            self.config.simulation.feedback,
            self.config.window.vsync,
        ) {
            Ok(render) => render,
            Err(e) => {
                // Without float or vertex textures there is nothing to show
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        self.camera.set_aspect(render.aspect_ratio());
        self.window = Some(window);
        self.render = Some(render);
        self.update_title();

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(render) = &mut self.render {
                    render.resize(physical_size.width, physical_size.height);
                    self.camera.set_aspect(render.aspect_ratio());
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    match key {
                        KeyCode::Escape => event_loop.exit(),
                        KeyCode::KeyF => {
                            if let Some(window) = &self.window {
                                window.toggle_fullscreen();
                            }
                        }
                        KeyCode::KeyR => self.reset(),
                        KeyCode::Space => {
                            let paused = self.simulation.toggle_pause();
                            log::info!("Simulation {}", if paused { "paused" } else { "resumed" });
                            self.update_title();
                        }
                        KeyCode::KeyG => {
                            let enabled = self.controller.toggle_damping();
                            log::info!("Orbit damping: {}", if enabled { "ON" } else { "OFF" });
                        }
                        _ => {}
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.controller.process_mouse_button(button, state);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.controller.process_cursor_moved(position.x, position.y);
            }

            WindowEvent::CursorLeft { .. } => {
                self.controller.process_cursor_left();
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.controller.process_scroll(lines);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&config.debug.log_level);
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    log::info!("Starting FBO Particles");

    let positions = match config.particles.build_positions() {
        Ok(positions) => positions,
        Err(e) => {
            log::error!("Failed to build particle field: {}", e);
            std::process::exit(1);
        }
    };
    let (min, max) = positions.bounds();
    log::info!(
        "Field bounds: ({:.1}, {:.1}, {:.1}) to ({:.1}, {:.1}, {:.1})",
        min.x, min.y, min.z, max.x, max.y, max.z
    );

    // Create event loop
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, positions);
    event_loop.run_app(&mut app).expect("Event loop error");
}
