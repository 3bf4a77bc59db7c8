//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;
use std::path::PathBuf;

use fbo_particles::config::{AppConfig, SourceKind};
use serial_test::serial;

/// Scratch config directory unique to one test
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fbo_particles_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("FBO_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("FBO_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_env_override_nested_number() {
    std::env::set_var("FBO_PARTICLES__WIDTH", "64");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.particles.width, 64);
    std::env::remove_var("FBO_PARTICLES__WIDTH");
}

#[test]
#[serial]
fn test_default_file_matches_defaults() {
    let config = AppConfig::load().unwrap();
    let defaults = AppConfig::default();
    assert_eq!(config.window.title, defaults.window.title);
    assert_eq!(config.particles.width, defaults.particles.width);
    assert_eq!(config.particles.source, SourceKind::Random);
    assert_eq!(config.rendering.point_size, defaults.rendering.point_size);
    for (a, b) in config.rendering.clear_color.iter().zip(defaults.rendering.clear_color) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = scratch_dir("user_override");
    fs::write(dir.join("default.toml"), "[particles]\nwidth = 32\nheight = 32\n").unwrap();
    fs::write(
        dir.join("user.toml"),
        "[particles]\nwidth = 8\nsource = \"heightmap\"\n",
    )
    .unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.particles.width, 8);
    assert_eq!(config.particles.height, 32);
    assert_eq!(config.particles.source, SourceKind::Heightmap);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let config = AppConfig::load_from("no/such/config/dir").unwrap();
    assert_eq!(config.particles.width, 256);
    assert_eq!(config.camera.fov, 75.0);
}

#[test]
#[serial]
fn test_invalid_value_is_error() {
    let dir = scratch_dir("invalid");
    fs::write(dir.join("default.toml"), "[particles]\nwidth = \"wide\"\n").unwrap();

    let err = AppConfig::load_from(&dir).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error:"));

    let _ = fs::remove_dir_all(&dir);
}
