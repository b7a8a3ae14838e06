//! The visual-DNA pipeline: raw bytes → 64-bit structural fingerprint.
//!
//! Stages, in order: [`preprocess`] (median denoise, luminance flatten,
//! 32×32 resample), [`dct`] (2D orthonormal DCT-II), [`fingerprint`]
//! (8×8 low-frequency block → median bitmask). Every stage is a pure
//! function; the same bytes always produce the same fingerprint.

pub mod analysis;
pub mod dct;
pub mod fingerprint;
pub mod preprocess;

use image::DynamicImage;
use tracing::debug;

use crate::error::Result;

pub use analysis::{analyze_bytes, analyze_image, DnaAnalysis};
pub use dct::{dct2d, FrequencyMatrix};
pub use fingerprint::{encode, VisualFingerprint, BLOCK_SIZE, FINGERPRINT_BITS};
pub use preprocess::{decode, normalize, NormalizedImage, GRID_SIZE};

/// Fingerprint a decoded image.
pub fn fingerprint_image(image: &DynamicImage) -> VisualFingerprint {
    let grid = normalize(image);
    let frequency = dct2d(&grid);
    encode(&frequency)
}

/// Fingerprint raw image bytes.
///
/// This is the registration front door: the caller persists the returned
/// hex rendering together with the owner identity in the external registry.
/// No uniqueness check happens here.
pub fn fingerprint_bytes(data: &[u8]) -> Result<VisualFingerprint> {
    let fingerprint = fingerprint_image(&decode(data)?);
    debug!(fingerprint = %fingerprint, "computed visual fingerprint");
    Ok(fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_fn(100, 100, |x, y| {
            Rgb([(x + y) as u8, (x * 2) as u8, (y * 2) as u8])
        }));
        let bytes = png_bytes(&image);

        let first = fingerprint_bytes(&bytes).unwrap();
        let second = fingerprint_bytes(&bytes).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_hex().len(), 16);
    }

    #[test]
    fn test_fingerprint_rejects_undecodable_bytes() {
        assert!(fingerprint_bytes(b"not an image").is_err());
    }

    #[test]
    fn test_distinct_structures_produce_distinct_fingerprints() {
        // Horizontal versus vertical half-split: energy in transposed
        // coefficient positions, so the masks cannot coincide.
        let horizontal = DynamicImage::ImageRgb8(ImageBuffer::from_fn(64, 64, |x, _| {
            Rgb(if x < 32 { [255, 255, 255] } else { [0, 0, 0] })
        }));
        let vertical = DynamicImage::ImageRgb8(ImageBuffer::from_fn(64, 64, |_, y| {
            Rgb(if y < 32 { [255, 255, 255] } else { [0, 0, 0] })
        }));

        let a = fingerprint_image(&horizontal);
        let b = fingerprint_image(&vertical);
        assert_ne!(a, b);
        assert!(a.distance(&b) > 0);
    }
}
