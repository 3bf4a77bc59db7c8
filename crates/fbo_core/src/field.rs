//! Initial particle positions and point-cloud lookup coordinates
//!
//! The field is a `width x height` grid: the texel at (col, row) holds the
//! position of particle `row * width + col`, so the particle count is always
//! `width * height`.

use std::path::PathBuf;

use fbo_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::FieldError;
use crate::heightmap::load_heightmap;

/// Particle positions laid out as RGBA32F texels (alpha is always 1.0)
#[derive(Clone, Debug, PartialEq)]
pub struct PositionData {
    width: u32,
    height: u32,
    texels: Vec<[f32; 4]>,
}

impl PositionData {
    /// Uniformly random positions, each component in `[-size / 2, size / 2)`
    pub fn random<R: Rng + ?Sized>(
        width: u32,
        height: u32,
        size: f32,
        rng: &mut R,
    ) -> Result<Self, FieldError> {
        check_dimensions(width, height)?;
        let texels = (0..width as usize * height as usize)
            .map(|_| {
                [
                    (rng.gen::<f32>() - 0.5) * size,
                    (rng.gen::<f32>() - 0.5) * size,
                    (rng.gen::<f32>() - 0.5) * size,
                    1.0,
                ]
            })
            .collect();
        Ok(Self { width, height, texels })
    }

    /// Random positions from a seeded generator, or from the thread RNG when
    /// no seed is given
    pub fn random_seeded(
        width: u32,
        height: u32,
        size: f32,
        seed: Option<u64>,
    ) -> Result<Self, FieldError> {
        match seed {
            Some(seed) => Self::random(width, height, size, &mut StdRng::seed_from_u64(seed)),
            None => Self::random(width, height, size, &mut rand::thread_rng()),
        }
    }

    /// Wrap explicit XYZ points; there must be exactly one per texel
    pub fn from_points(width: u32, height: u32, points: &[[f32; 3]]) -> Result<Self, FieldError> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if points.len() != expected {
            return Err(FieldError::SizeMismatch { expected, actual: points.len() });
        }
        let texels = points.iter().map(|p| [p[0], p[1], p[2], 1.0]).collect();
        Ok(Self { width, height, texels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of particles (`width * height`)
    pub fn particle_count(&self) -> usize {
        self.texels.len()
    }

    pub fn texels(&self) -> &[[f32; 4]] {
        &self.texels
    }

    /// Raw bytes for a texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Axis-aligned bounds of all positions
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let first = Vec3::new(self.texels[0][0], self.texels[0][1], self.texels[0][2]);
        self.texels.iter().fold((first, first), |(min, max), t| {
            let p = Vec3::new(t[0], t[1], t[2]);
            (min.min_components(p), max.max_components(p))
        })
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), FieldError> {
    if width == 0 || height == 0 {
        return Err(FieldError::ZeroDimensions { width, height });
    }
    Ok(())
}

/// Vertex data for the point cloud.
///
/// Vertex `i` does not hold a position; it holds the normalized coordinate of
/// the texel that stores particle `i`: `((i % w) / w, (i / w) / h, 0)`.
pub fn lookup_coordinates(width: u32, height: u32) -> Vec<[f32; 3]> {
    let (w, h) = (width as f32, height as f32);
    (0..width * height)
        .map(|i| [(i % width) as f32 / w, (i / width) as f32 / h, 0.0])
        .collect()
}

/// Where the initial positions come from
#[derive(Clone, Debug, PartialEq)]
pub enum FieldSource {
    /// Random cube of side `size`
    Random { size: f32, seed: Option<u64> },
    /// Greyscale image sampled into a terrain
    Heightmap { path: PathBuf, elevation: f32 },
}

impl Default for FieldSource {
    fn default() -> Self {
        FieldSource::Random { size: 256.0, seed: None }
    }
}

impl FieldSource {
    /// Build position data for a `width x height` field
    pub fn build(&self, width: u32, height: u32) -> Result<PositionData, FieldError> {
        match self {
            FieldSource::Random { size, seed } => {
                PositionData::random_seeded(width, height, *size, *seed)
            }
            FieldSource::Heightmap { path, elevation } => {
                check_dimensions(width, height)?;
                let points = load_heightmap(path, width, height, *elevation)?;
                PositionData::from_points(width, height, &points)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_count_is_width_times_height() {
        let data = PositionData::random_seeded(16, 8, 256.0, Some(1)).unwrap();
        assert_eq!(data.particle_count(), 128);
        assert_eq!(data.as_bytes().len(), 128 * 16);
    }

    #[test]
    fn test_random_range() {
        let data = PositionData::random_seeded(32, 32, 10.0, Some(7)).unwrap();
        for t in data.texels() {
            for c in &t[..3] {
                assert!(*c >= -5.0 && *c < 5.0);
            }
            assert_eq!(t[3], 1.0);
        }
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = PositionData::random_seeded(4, 4, 1.0, Some(42)).unwrap();
        let b = PositionData::random_seeded(4, 4, 1.0, Some(42)).unwrap();
        let c = PositionData::random_seeded(4, 4, 1.0, Some(43)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            PositionData::random_seeded(0, 4, 1.0, Some(1)),
            Err(FieldError::ZeroDimensions { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_from_points_size_mismatch() {
        let err = PositionData::from_points(2, 2, &[[0.0; 3]; 3]).unwrap_err();
        assert!(matches!(err, FieldError::SizeMismatch { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_from_points_sets_alpha() {
        let data = PositionData::from_points(1, 2, &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(data.texels(), &[[1.0, 2.0, 3.0, 1.0], [4.0, 5.0, 6.0, 1.0]]);
    }

    #[test]
    fn test_bounds() {
        let data = PositionData::from_points(2, 1, &[[-1.0, 2.0, 0.0], [3.0, -4.0, 5.0]]).unwrap();
        let (min, max) = data.bounds();
        assert_eq!(min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(max, Vec3::new(3.0, 2.0, 5.0));
    }

    #[test]
    fn test_lookup_coordinates() {
        let coords = lookup_coordinates(4, 2);
        assert_eq!(coords.len(), 8);
        assert_eq!(coords[0], [0.0, 0.0, 0.0]);
        assert_eq!(coords[3], [0.75, 0.0, 0.0]);
        assert_eq!(coords[4], [0.0, 0.5, 0.0]);
        assert_eq!(coords[7], [0.75, 0.5, 0.0]);
    }

    #[test]
    fn test_source_default_is_random_256() {
        assert_eq!(FieldSource::default(), FieldSource::Random { size: 256.0, seed: None });
    }

    #[test]
    fn test_heightmap_source_missing_file() {
        let source = FieldSource::Heightmap { path: "missing.png".into(), elevation: 1.0 };
        assert!(matches!(source.build(2, 2), Err(FieldError::Image(_))));
    }
}
