//! Candidate image generation for the verification scan.
//!
//! Two evasion families are countered here: the eight rigid plane
//! symmetries of a square (rotation/mirror reposts) and crop/zoom reposts.
//! A zoomed repost is geometrically the original at a different framing, so
//! instead of detecting an unknown crop we pad the suspect onto a larger
//! neutral canvas at a few fixed zoom factors and fingerprint those too.

use image::{imageops, DynamicImage, ImageBuffer, Rgb};
use serde::{Deserialize, Serialize};

/// Canvas fill for scale variants: mid-gray, neutral in luminance.
pub const NEUTRAL_CANVAS: Rgb<u8> = Rgb([128, 128, 128]);

/// One of the eight D4 plane symmetries, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Identity,
    Rotate90,
    Rotate180,
    Rotate270,
    Mirror,
    MirrorRotate90,
    MirrorRotate180,
    MirrorRotate270,
}

impl Orientation {
    /// All eight symmetries. The scan iterates them in this order, identity
    /// first, so an untransformed repost is found without touching the rest.
    pub const ALL: [Orientation; 8] = [
        Orientation::Identity,
        Orientation::Rotate90,
        Orientation::Rotate180,
        Orientation::Rotate270,
        Orientation::Mirror,
        Orientation::MirrorRotate90,
        Orientation::MirrorRotate180,
        Orientation::MirrorRotate270,
    ];

    /// Apply this symmetry to an image. Rotations are exact pixel
    /// permutations; mirrored variants rotate first, then flip.
    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        match self {
            Orientation::Identity => image.clone(),
            Orientation::Rotate90 => image.rotate90(),
            Orientation::Rotate180 => image.rotate180(),
            Orientation::Rotate270 => image.rotate270(),
            Orientation::Mirror => image.fliph(),
            Orientation::MirrorRotate90 => image.rotate90().fliph(),
            Orientation::MirrorRotate180 => image.rotate180().fliph(),
            Orientation::MirrorRotate270 => image.rotate270().fliph(),
        }
    }

    /// Human-readable label, as surfaced in detection methods.
    pub fn label(&self) -> &'static str {
        match self {
            Orientation::Identity => "Original",
            Orientation::Rotate90 => "90deg Rotation",
            Orientation::Rotate180 => "180deg Rotation",
            Orientation::Rotate270 => "270deg Rotation",
            Orientation::Mirror => "Horizontal Mirror",
            Orientation::MirrorRotate90 => "Mirrored 90deg Rotation",
            Orientation::MirrorRotate180 => "Mirrored 180deg Rotation",
            Orientation::MirrorRotate270 => "Mirrored 270deg Rotation",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Produce the full orientation set of an image.
///
/// Used only during verification; registration commits to the single
/// orientation the registrant submitted.
pub fn orientations(image: &DynamicImage) -> [(Orientation, DynamicImage); 8] {
    Orientation::ALL.map(|orientation| (orientation, orientation.apply(image)))
}

/// Center an image on a neutral canvas enlarged by `factor` (> 1.0).
pub fn pad_to_zoom(image: &DynamicImage, factor: f32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    let canvas_width = (width as f32 * factor).round() as u32;
    let canvas_height = (height as f32 * factor).round() as u32;

    let mut canvas = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(
        canvas_width.max(width),
        canvas_height.max(height),
        NEUTRAL_CANVAS,
    ));
    let x = i64::from((canvas.width() - width) / 2);
    let y = i64::from((canvas.height() - height) / 2);
    imageops::overlay(&mut canvas, image, x, y);
    canvas
}

/// One padded variant per configured zoom factor.
pub fn scale_variants(image: &DynamicImage, factors: &[f32]) -> Vec<(f32, DynamicImage)> {
    factors
        .iter()
        .map(|&factor| (factor, pad_to_zoom(image, factor)))
        .collect()
}
