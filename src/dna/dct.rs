//! 2D orthonormal DCT-II over the normalized 32×32 grid.
//!
//! The transform is energy-concentrating: coarse structure collapses into
//! the low-frequency (top-left) coefficients while compression artifacts
//! and fine-grained edits land in the high frequencies, which is exactly
//! what makes the low-frequency block a stable fingerprint source.

use std::f64::consts::PI;

use crate::dna::preprocess::{NormalizedImage, GRID_SIZE};

/// 32×32 real DCT coefficients. `[0][0]` is the DC term (average luminance).
pub type FrequencyMatrix = [[f64; GRID_SIZE]; GRID_SIZE];

/// Apply the separable 2D DCT-II (orthonormal), rows then columns.
///
/// Total over any 32×32 real matrix; no error paths.
pub fn dct2d(grid: &NormalizedImage) -> FrequencyMatrix {
    let mut rows = [[0.0f64; GRID_SIZE]; GRID_SIZE];
    for (r, row) in grid.iter().enumerate() {
        rows[r] = dct1d(row);
    }

    let mut out = [[0.0f64; GRID_SIZE]; GRID_SIZE];
    for c in 0..GRID_SIZE {
        let mut column = [0.0f64; GRID_SIZE];
        for r in 0..GRID_SIZE {
            column[r] = rows[r][c];
        }
        let transformed = dct1d(&column);
        for r in 0..GRID_SIZE {
            out[r][c] = transformed[r];
        }
    }
    out
}

/// 1D orthonormal DCT-II of a length-32 signal.
fn dct1d(signal: &[f64; GRID_SIZE]) -> [f64; GRID_SIZE] {
    let n = GRID_SIZE as f64;
    let mut out = [0.0f64; GRID_SIZE];
    for (k, coefficient) in out.iter_mut().enumerate() {
        let mut sum = 0.0;
        for (i, &sample) in signal.iter().enumerate() {
            sum += sample * (PI * (2.0 * i as f64 + 1.0) * k as f64 / (2.0 * n)).cos();
        }
        let scale = if k == 0 {
            (1.0 / n).sqrt()
        } else {
            (2.0 / n).sqrt()
        };
        *coefficient = scale * sum;
    }
    out
}
