//! Bit-exact pipeline introspection for auditing and visualization.
//!
//! An external party must be able to check that the pipeline produced the
//! claimed fingerprint, so every intermediate value is exposed exactly as
//! used internally. The normalized heatmap is the only derived extra; it is
//! for display, not for verification.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dna::dct::dct2d;
use crate::dna::fingerprint::{ac_median, encode, low_frequency_block, FINGERPRINT_BITS};
use crate::dna::preprocess::{decode, normalize};
use crate::error::Result;

/// Full set of intermediate artifacts for one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnaAnalysis {
    /// The 32×32 normalized luminance grid, row-major.
    pub normalized: Vec<Vec<f64>>,
    /// The full 32×32 DCT coefficient matrix, row-major.
    pub frequency: Vec<Vec<f64>>,
    /// The 8×8 low-frequency block, flattened row-major (64 values).
    pub low_frequency: Vec<f64>,
    /// The median threshold applied to the block.
    pub ac_median: f64,
    /// Whether the DC term participated in the median. Always false here:
    /// the DC coefficient gets a bit in the mask but no vote in the median.
    pub dc_in_median: bool,
    /// One entry per block position: 1 if the bit is set, else 0.
    pub bitmask: Vec<u8>,
    /// Canonical hex rendering of the fingerprint.
    pub fingerprint_hex: String,
    /// Canonical binary rendering of the fingerprint.
    pub fingerprint_binary: String,
    /// Low-frequency block min-max normalized to 0–255, for heatmap display.
    pub heatmap: Vec<f64>,
}

/// Run the full pipeline over raw bytes and capture every intermediate.
pub fn analyze_bytes(data: &[u8]) -> Result<DnaAnalysis> {
    Ok(analyze_image(&decode(data)?))
}

/// Run the full pipeline over a decoded image and capture every intermediate.
pub fn analyze_image(image: &DynamicImage) -> DnaAnalysis {
    let grid = normalize(image);
    let frequency = dct2d(&grid);
    let block = low_frequency_block(&frequency);
    let threshold = ac_median(&block);
    let fingerprint = encode(&frequency);

    let bitmask: Vec<u8> = (0..FINGERPRINT_BITS)
        .map(|i| u8::from(fingerprint.bit(i)))
        .collect();

    debug!(
        fingerprint = %fingerprint,
        median = threshold,
        "analyzed image"
    );

    DnaAnalysis {
        normalized: grid.iter().map(|row| row.to_vec()).collect(),
        frequency: frequency.iter().map(|row| row.to_vec()).collect(),
        low_frequency: block.to_vec(),
        ac_median: threshold,
        dc_in_median: false,
        bitmask,
        fingerprint_hex: fingerprint.to_hex(),
        fingerprint_binary: fingerprint.to_binary(),
        heatmap: heatmap(&block),
    }
}

/// Min-max normalize the block to 0–255 for display.
fn heatmap(block: &[f64; FINGERPRINT_BITS]) -> Vec<f64> {
    let min = block.iter().copied().fold(f64::INFINITY, f64::min);
    let max = block.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return vec![0.0; FINGERPRINT_BITS];
    }
    block
        .iter()
        .map(|&v| (v - min) / (max - min) * 255.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna::fingerprint::VisualFingerprint;
    use crate::dna::preprocess::GRID_SIZE;
    use image::{ImageBuffer, Rgb};

    fn gradient_image() -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(128, 128, |x, y| {
            Rgb([(x * 2) as u8, (y * 2) as u8, 40])
        }))
    }

    #[test]
    fn test_analysis_shapes() {
        let report = analyze_image(&gradient_image());
        assert_eq!(report.normalized.len(), GRID_SIZE);
        assert!(report.normalized.iter().all(|row| row.len() == GRID_SIZE));
        assert_eq!(report.frequency.len(), GRID_SIZE);
        assert_eq!(report.low_frequency.len(), FINGERPRINT_BITS);
        assert_eq!(report.bitmask.len(), FINGERPRINT_BITS);
        assert_eq!(report.heatmap.len(), FINGERPRINT_BITS);
        assert!(!report.dc_in_median);
    }

    #[test]
    fn test_analysis_matches_fingerprint_pipeline() {
        let image = gradient_image();
        let report = analyze_image(&image);
        let fingerprint = crate::dna::fingerprint_image(&image);

        assert_eq!(report.fingerprint_hex, fingerprint.to_hex());
        assert_eq!(report.fingerprint_binary, fingerprint.to_binary());

        // The bitmask, binary, and hex renderings all encode the same bits.
        for (i, &bit) in report.bitmask.iter().enumerate() {
            assert_eq!(bit == 1, fingerprint.bit(i));
        }
        assert_eq!(
            VisualFingerprint::from_binary(&report.fingerprint_binary).unwrap().to_hex(),
            report.fingerprint_hex
        );
    }

    #[test]
    fn test_heatmap_bounds() {
        let report = analyze_image(&gradient_image());
        for &v in &report.heatmap {
            assert!((0.0..=255.0).contains(&v));
        }
    }

    #[test]
    fn test_analysis_serializes() {
        let report = analyze_image(&gradient_image());
        let json = serde_json::to_string(&report).unwrap();
        let restored: DnaAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.fingerprint_hex, report.fingerprint_hex);
        assert_eq!(restored.ac_median, report.ac_median);
    }
}
