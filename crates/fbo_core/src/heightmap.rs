//! Image-to-terrain sampling
//!
//! The image is drawn onto a canvas the size of the particle field, then every
//! pixel becomes one particle on an XZ grid centred on the origin, lifted along
//! Y by its greyscale value.

use std::path::Path;

use image::RgbaImage;

use crate::canvas::Canvas;
use crate::error::FieldError;

/// Compute one XYZ position per pixel of a `width x height` sampling canvas.
///
/// For pixel index `i`:
/// - `x = (i % width) - width / 2`
/// - `y = (r + g + b) / 255 * elevation`
/// - `z = floor(i / width) - height / 2`
pub fn positions_from_image(
    img: &RgbaImage,
    width: u32,
    height: u32,
    elevation: f32,
) -> Vec<[f32; 3]> {
    let mut canvas = Canvas::new(Some(width), Some(height));
    let mut ctx = canvas.context_2d();
    ctx.draw_image(img, 0, 0);
    let img_data = ctx.get_image_data(0, 0, width, height);

    let half_w = width as f32 * 0.5;
    let half_h = height as f32 * 0.5;

    img_data
        .chunks_exact(4)
        .enumerate()
        .map(|(i, px)| {
            let i = i as u32;
            let greyscale = px[..3].iter().map(|&c| c as f32 / 255.0).sum::<f32>();
            [
                (i % width) as f32 - half_w,
                greyscale * elevation,
                (i / width) as f32 - half_h,
            ]
        })
        .collect()
}

/// Open an image file and sample it with [`positions_from_image`]
pub fn load_heightmap<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
    elevation: f32,
) -> Result<Vec<[f32; 3]>, FieldError> {
    let path = path.as_ref();
    let img = image::open(path)?.to_rgba8();
    if img.width() != width || img.height() != height {
        log::debug!(
            "Heightmap {} is {}x{}, sampling canvas is {}x{}",
            path.display(), img.width(), img.height(), width, height
        );
    }
    Ok(positions_from_image(&img, width, height, elevation))
}
