//! GPU capability checks for the FBO technique
//!
//! Positions are stored in an RGBA32F texture that is both a render target
//! (written by the simulation pass) and sampled from the vertex stage of the
//! points pass. Both must be available or the particles cannot be drawn.

use wgpu::TextureUsages;

/// Texture format holding one particle position per texel
pub const POSITION_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Usages the position format must allow
pub const POSITION_USAGES: TextureUsages = TextureUsages::RENDER_ATTACHMENT
    .union(TextureUsages::TEXTURE_BINDING)
    .union(TextureUsages::COPY_SRC)
    .union(TextureUsages::COPY_DST);

/// Missing capability
#[derive(Debug, Clone, PartialEq)]
pub enum SupportError {
    /// RGBA32F cannot be rendered to or sampled
    FloatTextures,
    /// The vertex stage cannot sample textures
    VertexTextures,
    /// Field is larger than the maximum 2D texture size
    TooLarge { width: u32, height: u32, max: u32 },
}

impl std::fmt::Display for SupportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupportError::FloatTextures => write!(f, "float textures not supported"),
            SupportError::VertexTextures => write!(f, "vertex shader cannot read textures"),
            SupportError::TooLarge { width, height, max } => write!(
                f,
                "FBO size {}x{} exceeds maximum texture dimension {}",
                width, height, max
            ),
        }
    }
}

impl std::error::Error for SupportError {}

/// Check that an adapter can run a `width x height` FBO
///
/// Uses the adapter's own limits; a device created with
/// [`required_limits`] keeps everything checked here.
pub fn check_support(adapter: &wgpu::Adapter, width: u32, height: u32) -> Result<(), SupportError> {
    let features = adapter.get_texture_format_features(POSITION_FORMAT);
    check_capabilities(features.allowed_usages, &adapter.limits(), width, height)
}

/// Limits to request for the device
///
/// Starts from the WebGL2-class baseline every adapter meets and raises only
/// what the FBO depends on (texture size, vertex-stage sampling) to the
/// adapter's values.
pub fn required_limits(adapter_limits: &wgpu::Limits) -> wgpu::Limits {
    let mut limits = wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter_limits.clone());
    limits.max_sampled_textures_per_shader_stage = adapter_limits.max_sampled_textures_per_shader_stage;
    limits
}

/// Capability rules, independent of any live adapter
pub fn check_capabilities(
    allowed_usages: TextureUsages,
    limits: &wgpu::Limits,
    width: u32,
    height: u32,
) -> Result<(), SupportError> {
    // We need float textures to store positions
    if !allowed_usages.contains(POSITION_USAGES) {
        return Err(SupportError::FloatTextures);
    }

    // We need to read textures from within the vertex shader
    if limits.max_sampled_textures_per_shader_stage == 0 {
        return Err(SupportError::VertexTextures);
    }

    let max = limits.max_texture_dimension_2d;
    if width > max || height > max {
        return Err(SupportError::TooLarge { width, height, max });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported() {
        let limits = wgpu::Limits::default();
        assert_eq!(check_capabilities(POSITION_USAGES, &limits, 256, 256), Ok(()));
    }

    #[test]
    fn test_float_textures_missing() {
        let limits = wgpu::Limits::default();
        let usages = TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST;
        let err = check_capabilities(usages, &limits, 256, 256).unwrap_err();
        assert_eq!(err, SupportError::FloatTextures);
        assert_eq!(err.to_string(), "float textures not supported");
    }

    #[test]
    fn test_vertex_textures_missing() {
        let limits = wgpu::Limits {
            max_sampled_textures_per_shader_stage: 0,
            ..wgpu::Limits::default()
        };
        let err = check_capabilities(POSITION_USAGES, &limits, 256, 256).unwrap_err();
        assert_eq!(err.to_string(), "vertex shader cannot read textures");
    }

    #[test]
    fn test_too_large() {
        let limits = wgpu::Limits::default();
        let max = limits.max_texture_dimension_2d;
        let err = check_capabilities(POSITION_USAGES, &limits, max + 1, 1).unwrap_err();
        assert!(matches!(err, SupportError::TooLarge { .. }));
    }

    #[test]
    fn test_required_limits_keep_missing_vertex_sampling() {
        let adapter = wgpu::Limits {
            max_sampled_textures_per_shader_stage: 0,
            ..wgpu::Limits::downlevel_webgl2_defaults()
        };
        let requested = required_limits(&adapter);
        assert_eq!(requested.max_sampled_textures_per_shader_stage, 0);
        assert!(requested.check_limits(&adapter));

        let err = check_capabilities(POSITION_USAGES, &requested, 256, 256).unwrap_err();
        assert_eq!(err, SupportError::VertexTextures);
    }

    #[test]
    fn test_required_limits_within_adapter() {
        let adapter = wgpu::Limits {
            max_texture_dimension_2d: 16384,
            ..wgpu::Limits::default()
        };
        let requested = required_limits(&adapter);
        assert!(requested.check_limits(&adapter));
        assert_eq!(requested.max_texture_dimension_2d, 16384);
        assert_eq!(
            requested.max_sampled_textures_per_shader_stage,
            adapter.max_sampled_textures_per_shader_stage
        );
    }

    #[test]
    fn test_float_checked_before_limits() {
        let limits = wgpu::Limits {
            max_sampled_textures_per_shader_stage: 0,
            ..wgpu::Limits::default()
        };
        let err = check_capabilities(TextureUsages::empty(), &limits, 1, 1).unwrap_err();
        assert_eq!(err, SupportError::FloatTextures);
    }
}
