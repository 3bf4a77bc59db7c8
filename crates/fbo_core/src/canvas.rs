//! Off-screen RGBA raster
//!
//! A canvas is a cleared RGBA8 pixel buffer. Images are composited onto it
//! through a [`Context2d`] and read back as raw bytes, which is how the
//! heightmap sampler turns an arbitrary image into exactly `width * height`
//! pixels (cropping or padding with transparent black, never scaling).

use image::{imageops, RgbaImage};

/// Width used when none (or zero) is requested
pub const DEFAULT_WIDTH: u32 = 512;
/// Height used when none (or zero) is requested
pub const DEFAULT_HEIGHT: u32 = 512;

/// RGBA8 raster, initially transparent black
#[derive(Clone, Debug)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Create a canvas, substituting the defaults for missing dimensions
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            pixels: RgbaImage::new(
                non_zero_or(width, DEFAULT_WIDTH),
                non_zero_or(height, DEFAULT_HEIGHT),
            ),
        }
    }

    /// Reuse `canvas` (or create one) and apply any requested dimensions.
    ///
    /// Each dimension is only overridden when given; otherwise the canvas keeps
    /// its current size.
    pub fn prepare(canvas: Option<Canvas>, width: Option<u32>, height: Option<u32>) -> Self {
        let mut canvas = canvas.unwrap_or_else(|| Canvas::new(width, height));
        let w = non_zero_or(width, canvas.width());
        let h = non_zero_or(height, canvas.height());
        canvas.set_size(w, h);
        canvas
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Assigning a size clears the canvas, even if the size is unchanged
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.pixels = RgbaImage::new(width, height);
    }

    /// Borrow a 2D drawing context
    pub fn context_2d(&mut self) -> Context2d<'_> {
        Context2d { canvas: self }
    }

    /// Underlying pixel buffer
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Drawing context bound to a canvas
pub struct Context2d<'a> {
    canvas: &'a mut Canvas,
}

impl Context2d<'_> {
    /// Composite `img` with its top-left corner at (`dx`, `dy`).
    ///
    /// Pixels falling outside the canvas are clipped.
    pub fn draw_image(&mut self, img: &RgbaImage, dx: i64, dy: i64) {
        imageops::overlay(&mut self.canvas.pixels, img, dx, dy);
    }

    /// Read a `width x height` rectangle of RGBA bytes, row-major.
    ///
    /// Pixels outside the canvas read as transparent black.
    pub fn get_image_data(&self, x: i64, y: i64, width: u32, height: u32) -> Vec<u8> {
        let pixels = &self.canvas.pixels;
        let mut data = vec![0u8; width as usize * height as usize * 4];

        for row in 0..height as i64 {
            let sy = y + row;
            if sy < 0 || sy >= pixels.height() as i64 {
                continue;
            }
            for col in 0..width as i64 {
                let sx = x + col;
                if sx < 0 || sx >= pixels.width() as i64 {
                    continue;
                }
                let offset = ((row * width as i64 + col) * 4) as usize;
                let px = pixels.get_pixel(sx as u32, sy as u32);
                data[offset..offset + 4].copy_from_slice(&px.0);
            }
        }

        data
    }
}

fn non_zero_or(value: Option<u32>, fallback: u32) -> u32 {
    match value {
        Some(v) if v > 0 => v,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_default_size() {
        let canvas = Canvas::new(None, None);
        assert_eq!(canvas.width(), DEFAULT_WIDTH);
        assert_eq!(canvas.height(), DEFAULT_HEIGHT);
    }

    #[test]
    fn test_zero_means_default() {
        let canvas = Canvas::new(Some(0), Some(64));
        assert_eq!(canvas.width(), 512);
        assert_eq!(canvas.height(), 64);
    }

    #[test]
    fn test_prepare_keeps_existing_dimension() {
        let canvas = Canvas::new(Some(100), Some(50));
        let canvas = Canvas::prepare(Some(canvas), Some(20), None);
        assert_eq!(canvas.width(), 20);
        assert_eq!(canvas.height(), 50);
    }

    #[test]
    fn test_prepare_without_canvas_creates_one() {
        let canvas = Canvas::prepare(None, None, Some(8));
        assert_eq!(canvas.width(), DEFAULT_WIDTH);
        assert_eq!(canvas.height(), 8);
    }

    #[test]
    fn test_draw_and_read_back() {
        let mut canvas = Canvas::new(Some(4), Some(4));
        let img = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));

        let mut ctx = canvas.context_2d();
        ctx.draw_image(&img, 1, 1);

        let data = ctx.get_image_data(0, 0, 4, 4);
        assert_eq!(data.len(), 64);
        // (0,0) untouched
        assert_eq!(&data[0..4], &[0, 0, 0, 0]);
        // (1,1) drawn
        let i = (1 * 4 + 1) * 4;
        assert_eq!(&data[i..i + 4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_draw_clips_to_canvas() {
        let mut canvas = Canvas::new(Some(2), Some(2));
        let img = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        canvas.context_2d().draw_image(&img, 0, 0);
        assert_eq!(canvas.pixels().width(), 2);
        assert!(canvas.pixels().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_out_of_bounds_reads_transparent() {
        let mut canvas = Canvas::new(Some(2), Some(2));
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let mut ctx = canvas.context_2d();
        ctx.draw_image(&img, 0, 0);

        let data = ctx.get_image_data(-1, 0, 3, 1);
        assert_eq!(&data[0..4], &[0, 0, 0, 0]);
        assert_eq!(&data[4..8], &[1, 2, 3, 255]);
        assert_eq!(&data[8..12], &[1, 2, 3, 255]);
    }

    #[test]
    fn test_set_size_clears() {
        let mut canvas = Canvas::new(Some(2), Some(2));
        let img = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
        canvas.context_2d().draw_image(&img, 0, 0);
        canvas.set_size(2, 2);
        assert!(canvas.pixels().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }
}
