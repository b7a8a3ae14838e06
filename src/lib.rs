//! Argus Core - visual-DNA fingerprinting and forensic match engine
//!
//! This crate decides whether a submitted image is visually derived from a
//! previously registered one, under an adversarial threat model where the
//! submitter evades detection through geometric, photometric, or
//! compressive transformations.
//!
//! # Pipeline
//!
//! Raw bytes → 3×3 median denoise → luminance flatten → 32×32 resample →
//! 2D orthonormal DCT-II → 8×8 low-frequency block → median bitmask →
//! 64-bit [`VisualFingerprint`].
//!
//! # Verification
//!
//! The [`MatchEngine`] scans the suspect's eight D4 orientations, each
//! unscaled and padded at the configured zoom factors, against a read-only
//! registry snapshot, and reduces the scan to one [`Verdict`]: pixel-perfect
//! original, derivative work, modified copy, or clear. Everything is a pure
//! function over immutable inputs; the core holds no state and performs no
//! I/O.
//!
//! # Example
//!
//! ```no_run
//! use argus_core::{fingerprint_bytes, ContentDigest, MatchEngine, RegistryEntry};
//!
//! # fn example() -> argus_core::Result<()> {
//! // Registration: compute the fingerprint; the caller persists it.
//! let original = std::fs::read("artwork.png").unwrap();
//! let fingerprint = fingerprint_bytes(&original)?;
//!
//! // Verification: scan a suspect against a registry snapshot.
//! let registry = vec![RegistryEntry::new(
//!     fingerprint.to_hex(),
//!     "OWNER_ADDRESS",
//!     Some(ContentDigest::from_bytes(&original)),
//! )];
//! let suspect = std::fs::read("repost.jpg").unwrap();
//! let verdict = MatchEngine::default().verify(&suspect, &registry)?;
//! println!("score: {:?}", verdict.score());
//! # Ok(())
//! # }
//! ```

pub mod dna;
pub mod engine;
pub mod error;
pub mod registry;
pub mod variants;

// Re-export main types for convenience
pub use dna::{
    analyze_bytes, analyze_image, fingerprint_bytes, fingerprint_image, DnaAnalysis,
    VisualFingerprint, BLOCK_SIZE, FINGERPRINT_BITS, GRID_SIZE,
};
pub use engine::{DetectionMethod, MatchConfig, MatchEngine, PlagiarismKind, Verdict};
pub use error::{ArgusError, Result};
pub use registry::{ContentDigest, RegistryEntry};
pub use variants::{orientations, pad_to_zoom, scale_variants, Orientation};
