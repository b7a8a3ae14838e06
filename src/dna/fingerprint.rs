//! The 64-bit visual fingerprint and its encoder.
//!
//! One bit per low-frequency coefficient, set when the coefficient exceeds
//! the block's AC median. Both call sites of the pipeline (registration and
//! verification) go through [`encode`], so the median policy and the tie
//! rule (ties resolve to 0) can never diverge between them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dna::dct::FrequencyMatrix;
use crate::error::{ArgusError, Result};

/// Side length of the low-frequency block.
pub const BLOCK_SIZE: usize = 8;

/// Number of bits in a fingerprint.
pub const FINGERPRINT_BITS: usize = BLOCK_SIZE * BLOCK_SIZE;

/// A 64-bit structural summary of an image's low-frequency content.
///
/// Bit *i* (row-major over the 8×8 block, coefficient 0 at the most
/// significant bit) is 1 iff coefficient *i* is strictly greater than the
/// block's AC median. The 16-char hex and 64-char binary renderings share
/// this bit ordering and are losslessly inter-derivable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualFingerprint(u64);

impl VisualFingerprint {
    pub fn from_u64(bits: u64) -> Self {
        Self(bits)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Whether the bit for coefficient `index` (0..64, row-major) is set.
    pub fn bit(&self, index: usize) -> bool {
        debug_assert!(index < FINGERPRINT_BITS);
        self.0 >> (FINGERPRINT_BITS - 1 - index) & 1 == 1
    }

    /// Canonical 16-character lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }

    /// Parse the canonical hex rendering.
    ///
    /// Anything that is not exactly 64 bits of hex is rejected; a registry
    /// entry carrying such a value is skipped by the match engine rather
    /// than aborting the scan.
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != FINGERPRINT_BITS / 4 {
            return Err(ArgusError::InconsistentFingerprint(format!(
                "expected 16 hex characters, got {}",
                hex.len()
            )));
        }
        let bits = u64::from_str_radix(hex, 16).map_err(|e| {
            ArgusError::InconsistentFingerprint(format!("invalid hex string: {e}"))
        })?;
        Ok(Self(bits))
    }

    /// 64-character binary rendering, coefficient 0 first.
    pub fn to_binary(&self) -> String {
        format!("{:064b}", self.0)
    }

    /// Parse the 64-character binary rendering.
    pub fn from_binary(binary: &str) -> Result<Self> {
        if binary.len() != FINGERPRINT_BITS {
            return Err(ArgusError::InconsistentFingerprint(format!(
                "expected 64 binary digits, got {}",
                binary.len()
            )));
        }
        let bits = u64::from_str_radix(binary, 2).map_err(|e| {
            ArgusError::InconsistentFingerprint(format!("invalid binary string: {e}"))
        })?;
        Ok(Self(bits))
    }

    /// Hamming distance to another fingerprint, in 0..=64.
    ///
    /// Symmetric, and zero against itself.
    pub fn distance(&self, other: &Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

impl fmt::Display for VisualFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for VisualFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VisualFingerprint({})", self.to_hex())
    }
}

/// Extract the top-left 8×8 low-frequency block, row-major.
pub fn low_frequency_block(frequency: &FrequencyMatrix) -> [f64; FINGERPRINT_BITS] {
    let mut block = [0.0f64; FINGERPRINT_BITS];
    for row in 0..BLOCK_SIZE {
        for col in 0..BLOCK_SIZE {
            block[row * BLOCK_SIZE + col] = frequency[row][col];
        }
    }
    block
}

/// Median of the 63 AC coefficients of a low-frequency block.
///
/// The DC term (index 0) is excluded from the median so its outsized
/// magnitude cannot skew the split point; it still receives a bit in the
/// mask like every other position.
pub fn ac_median(block: &[f64; FINGERPRINT_BITS]) -> f64 {
    median(&block[1..])
}

/// Encode a frequency matrix into its 64-bit fingerprint.
pub fn encode(frequency: &FrequencyMatrix) -> VisualFingerprint {
    let block = low_frequency_block(frequency);
    let threshold = ac_median(&block);

    let mut bits = 0u64;
    for &coefficient in &block {
        bits <<= 1;
        if coefficient > threshold {
            bits |= 1;
        }
    }
    VisualFingerprint(bits)
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}
