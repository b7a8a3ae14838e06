//! Image preprocessing: denoise, flatten, resample.
//!
//! Every fingerprint starts here. The order is fixed: a 3×3 median filter
//! runs over the full-resolution RGB channels *before* any resampling, so
//! adversarial single-pixel perturbations are absorbed while visible
//! content survives; the result is flattened to luminance and resampled to
//! the canonical 32×32 grid.

use image::{imageops, DynamicImage, GrayImage, ImageBuffer, Rgb, RgbImage};

use crate::error::{ArgusError, Result};

/// Side length of the normalized luminance grid.
pub const GRID_SIZE: usize = 32;

/// A 32×32 single-channel luminance grid, values in 0–255.
pub type NormalizedImage = [[f64; GRID_SIZE]; GRID_SIZE];

/// Decode raw bytes into an image.
///
/// Supports JPEG, PNG, GIF, and WebP. Empty or undecodable input fails with
/// [`ArgusError::InvalidImage`]; nothing is ever partially normalized.
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    if data.is_empty() {
        return Err(ArgusError::InvalidImage("empty input".into()));
    }
    image::load_from_memory(data)
        .map_err(|e| ArgusError::InvalidImage(format!("failed to decode image: {e}")))
}

/// Reduce a decoded image to the canonical 32×32 luminance grid.
pub fn normalize(image: &DynamicImage) -> NormalizedImage {
    let denoised = median_denoise(&image.to_rgb8());
    let gray = luminance(&denoised);
    let small = imageops::resize(
        &gray,
        GRID_SIZE as u32,
        GRID_SIZE as u32,
        imageops::FilterType::Triangle,
    );

    let mut grid = [[0.0f64; GRID_SIZE]; GRID_SIZE];
    for (row, grid_row) in grid.iter_mut().enumerate() {
        for (col, value) in grid_row.iter_mut().enumerate() {
            *value = f64::from(small.get_pixel(col as u32, row as u32).0[0]);
        }
    }
    grid
}

/// 3×3 median filter over each RGB channel, clamped at the borders.
pub fn median_denoise(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| {
        let mut channels = [[0u8; 9]; 3];
        let mut n = 0;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let nx = (i64::from(x) + dx).clamp(0, i64::from(width) - 1) as u32;
                let ny = (i64::from(y) + dy).clamp(0, i64::from(height) - 1) as u32;
                let pixel = image.get_pixel(nx, ny);
                for (c, samples) in channels.iter_mut().enumerate() {
                    samples[n] = pixel.0[c];
                }
                n += 1;
            }
        }
        let mut out = [0u8; 3];
        for (c, samples) in channels.iter_mut().enumerate() {
            samples.sort_unstable();
            out[c] = samples[4];
        }
        Rgb(out)
    })
}

/// Flatten RGB to a single luminance channel (BT.601 weighting).
fn luminance(image: &RgbImage) -> GrayImage {
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let Rgb([r, g, b]) = *image.get_pixel(x, y);
        let luma = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
        image::Luma([luma.round() as u8])
    })
}
