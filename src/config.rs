//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`FBO_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use fbo_core::{FieldError, FieldSource, PositionData};
use fbo_render::pipeline::hex_to_rgba;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Orbit controls configuration
    #[serde(default)]
    pub controls: ControlsConfig,
    /// Particle field configuration
    #[serde(default)]
    pub particles: ParticlesConfig,
    /// Simulation configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`FBO_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Optional
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // FBO_PARTICLES__WIDTH=512 -> particles.width = 512
        figment = figment.merge(Env::prefixed("FBO_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "FBO Particles".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Starting position [x, y, z]
    pub position: [f32; 3],
    /// Orbit target [x, y, z]
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 100.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Orbit controls configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Spread input over several frames
    pub damping_enabled: bool,
    /// Fraction of pending motion applied per frame when damping
    pub damping_factor: f32,
    /// Closest orbit distance
    pub min_distance: f32,
    /// Farthest orbit distance
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            damping_enabled: false,
            damping_factor: 0.05,
            min_distance: 1.0,
            max_distance: 1000.0,
        }
    }
}

/// Where initial positions come from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Random,
    Heightmap,
}

/// Particle field configuration
///
/// The FBO is `width x height` texels, one particle each.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticlesConfig {
    pub width: u32,
    pub height: u32,
    pub source: SourceKind,
    /// Side of the random cube
    pub random_size: f32,
    /// Seed for reproducible random fields
    pub seed: Option<u64>,
    /// Image sampled when `source = "heightmap"`
    pub heightmap_path: PathBuf,
    /// Height of a white pixel divided by three
    pub elevation: f32,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            source: SourceKind::Random,
            random_size: 256.0,
            seed: None,
            heightmap_path: PathBuf::from("assets/heightmap.png"),
            elevation: 10.0,
        }
    }
}

impl ParticlesConfig {
    pub fn field_source(&self) -> FieldSource {
        match self.source {
            SourceKind::Random => FieldSource::Random {
                size: self.random_size,
                seed: self.seed,
            },
            SourceKind::Heightmap => FieldSource::Heightmap {
                path: self.heightmap_path.clone(),
                elevation: self.elevation,
            },
        }
    }

    /// Build initial positions, falling back to a random field if the
    /// heightmap cannot be loaded
    pub fn build_positions(&self) -> Result<PositionData, FieldError> {
        let source = self.field_source();
        match source.build(self.width, self.height) {
            Ok(data) => Ok(data),
            Err(FieldError::Image(e)) => {
                log::warn!(
                    "Failed to load heightmap '{}': {}. Using random positions.",
                    self.heightmap_path.display(), e
                );
                PositionData::random_seeded(self.width, self.height, self.random_size, self.seed)
            }
            Err(e) => Err(e),
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Feed each frame's output back in as the next frame's input
    pub feedback: bool,
    /// Rotation speed about Y in radians per second (0 keeps the field still)
    pub spin_speed: f32,
    /// Start paused
    pub paused: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            feedback: false,
            spin_speed: 0.0,
            paused: false,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Clear colour [r, g, b, a]
    pub clear_color: [f32; 4],
    /// Particle size in pixels
    pub point_size: f32,
    /// Particle colour [r, g, b, a]
    pub point_color: [f32; 4],
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            clear_color: hex_to_rgba(0x263339),
            point_size: 2.0,
            point_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace); `RUST_LOG` takes precedence
    pub log_level: String,
    /// Show frame rate in the window title
    pub show_fps: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_fps: true,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.particles.width, 256);
        assert_eq!(config.particles.height, 256);
        assert_eq!(config.camera.fov, 75.0);
        assert_eq!(config.camera.position, [0.0, 0.0, 100.0]);
        assert_eq!(config.rendering.point_size, 2.0);
    }

    #[test]
    fn test_default_clear_color() {
        let c = RenderingConfig::default().clear_color;
        assert!((c[0] - 0x26 as f32 / 255.0).abs() < 1e-6);
        assert!((c[2] - 0x39 as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("point_size"));
        assert!(toml.contains("source = \"random\""));
    }

    #[test]
    fn test_field_source_mapping() {
        let mut particles = ParticlesConfig::default();
        particles.seed = Some(3);
        assert_eq!(particles.field_source(), FieldSource::Random { size: 256.0, seed: Some(3) });

        particles.source = SourceKind::Heightmap;
        assert!(matches!(particles.field_source(), FieldSource::Heightmap { .. }));
    }

    #[test]
    fn test_missing_heightmap_falls_back_to_random() {
        let particles = ParticlesConfig {
            width: 4,
            height: 2,
            source: SourceKind::Heightmap,
            heightmap_path: PathBuf::from("no/such/heightmap.png"),
            seed: Some(9),
            ..ParticlesConfig::default()
        };
        let data = particles.build_positions().unwrap();
        assert_eq!(data.particle_count(), 8);
    }

    #[test]
    fn test_zero_size_is_error() {
        let particles = ParticlesConfig {
            width: 0,
            ..ParticlesConfig::default()
        };
        assert!(particles.build_positions().is_err());
    }
}
