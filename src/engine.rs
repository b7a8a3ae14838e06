//! Multi-orientation, multi-scale match engine and decision policy.
//!
//! A verification call runs one scan and is terminal: candidates are the
//! suspect's eight orientations, each unscaled and padded at every
//! configured zoom factor (32 candidates with the defaults). Every
//! candidate fingerprint is compared against every registry entry; the
//! global minimum distance with its (entry, orientation, zoom) provenance
//! decides the verdict. The scan early-exits on a distance-0 hit, which a
//! global minimum cannot beat, so results are identical to the exhaustive
//! scan. Nothing is retained across calls.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dna::{decode, fingerprint_image, VisualFingerprint};
use crate::error::Result;
use crate::registry::{ContentDigest, RegistryEntry};
use crate::variants::{pad_to_zoom, Orientation};

/// Scan parameters. One source of truth; no ambient constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Maximum Hamming distance still reported as a modified copy.
    /// Distances above it are clear. Canonical value: 15 of 64 bits; mild
    /// JPEG recompression can move a fingerprint by 12-14 bits when the
    /// content carries little texture, while unrelated images sit near 32.
    pub modification_threshold: u32,
    /// Zoom factors for crop/zoom counter-padding, applied per orientation
    /// on top of the unscaled candidate.
    pub zoom_factors: Vec<f32>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            modification_threshold: 15,
            zoom_factors: vec![1.25, 1.5, 2.0],
        }
    }
}

/// Which candidate produced a result: orientation plus optional zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionMethod {
    pub orientation: Orientation,
    pub zoom: Option<f32>,
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.zoom {
            Some(zoom) => write!(f, "Detected via {} at {zoom}x zoom", self.orientation),
            None => write!(f, "Detected via {}", self.orientation),
        }
    }
}

/// How a distance-0 or near match is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlagiarismKind {
    /// Same structural composition, different bytes (re-encode, trace,
    /// stylistic filter).
    Derivative,
    /// Within the modification threshold: edited but recognizably derived.
    ModifiedCopy,
}

/// Outcome of one verification call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Verdict {
    /// Pixel-perfect reuse: fingerprint distance 0 and byte-identical
    /// original.
    Original {
        matched: VisualFingerprint,
        owner: String,
        method: DetectionMethod,
    },
    /// A registered work was recognized under some transformation.
    PlagiarismDetected {
        kind: PlagiarismKind,
        score: u32,
        matched: VisualFingerprint,
        owner: String,
        method: DetectionMethod,
    },
    /// Best distance above the threshold; `method` names the closest
    /// candidate for diagnostics.
    Clear { score: u32, method: DetectionMethod },
    /// The registry snapshot held no usable entries.
    NoRegistry,
}

impl Verdict {
    /// Minimum Hamming distance found, when a scan ran.
    pub fn score(&self) -> Option<u32> {
        match self {
            Verdict::Original { .. } => Some(0),
            Verdict::PlagiarismDetected { score, .. } | Verdict::Clear { score, .. } => {
                Some(*score)
            }
            Verdict::NoRegistry => None,
        }
    }

    /// Owner of the matched entry, for `Original` and `PlagiarismDetected`.
    pub fn matched_owner(&self) -> Option<&str> {
        match self {
            Verdict::Original { owner, .. } | Verdict::PlagiarismDetected { owner, .. } => {
                Some(owner)
            }
            _ => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(
            self,
            Verdict::Original { .. } | Verdict::PlagiarismDetected { .. }
        )
    }
}

/// The stateless verification orchestrator.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    config: MatchConfig,
}

impl MatchEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Scan a suspect image against a registry snapshot and decide.
    ///
    /// Fails only on undecodable suspect bytes. Registry entries whose
    /// fingerprint is not 64 bits are skipped with a warning; if none
    /// remain, the verdict is [`Verdict::NoRegistry`].
    pub fn verify(&self, suspect: &[u8], registry: &[RegistryEntry]) -> Result<Verdict> {
        if registry.is_empty() {
            info!("registry snapshot is empty");
            return Ok(Verdict::NoRegistry);
        }

        let image = decode(suspect)?;
        let suspect_digest = ContentDigest::from_bytes(suspect);

        let mut entries: Vec<(usize, VisualFingerprint)> = Vec::with_capacity(registry.len());
        for (index, entry) in registry.iter().enumerate() {
            match VisualFingerprint::from_hex(&entry.fingerprint) {
                Ok(fingerprint) => entries.push((index, fingerprint)),
                Err(error) => warn!(
                    owner = %entry.owner,
                    fingerprint = %entry.fingerprint,
                    %error,
                    "skipping registry entry with malformed fingerprint"
                ),
            }
        }
        if entries.is_empty() {
            warn!("no usable registry entries after validation");
            return Ok(Verdict::NoRegistry);
        }

        let mut best: Option<(u32, usize, VisualFingerprint, DetectionMethod)> = None;
        'scan: for orientation in Orientation::ALL {
            let oriented = orientation.apply(&image);

            let mut zooms: Vec<Option<f32>> = Vec::with_capacity(1 + self.config.zoom_factors.len());
            zooms.push(None);
            zooms.extend(self.config.zoom_factors.iter().copied().map(Some));

            for zoom in zooms {
                let candidate = match zoom {
                    None => fingerprint_image(&oriented),
                    Some(factor) => fingerprint_image(&pad_to_zoom(&oriented, factor)),
                };

                for &(index, entry_fingerprint) in &entries {
                    let distance = candidate.distance(&entry_fingerprint);
                    debug!(
                        orientation = %orientation,
                        zoom = ?zoom,
                        distance,
                        entry = %entry_fingerprint,
                        "scan candidate"
                    );

                    if best.as_ref().map_or(true, |(d, ..)| distance < *d) {
                        let method = DetectionMethod { orientation, zoom };
                        best = Some((distance, index, entry_fingerprint, method));
                    }
                    if distance == 0 {
                        break 'scan;
                    }
                }
            }
        }

        // The scan visited at least one candidate against at least one entry.
        let Some((score, index, matched, method)) = best else {
            return Ok(Verdict::NoRegistry);
        };
        let entry = &registry[index];

        let verdict = if score == 0 {
            match entry.content_digest {
                Some(digest) if digest == suspect_digest => Verdict::Original {
                    matched,
                    owner: entry.owner.clone(),
                    method,
                },
                Some(_) => Verdict::PlagiarismDetected {
                    kind: PlagiarismKind::Derivative,
                    score: 0,
                    matched,
                    owner: entry.owner.clone(),
                    method,
                },
                None => {
                    // Without the original bytes' digest the byte-identity
                    // tie-break cannot run; report the generic derivative.
                    debug!("content digest unavailable for matched entry");
                    Verdict::PlagiarismDetected {
                        kind: PlagiarismKind::Derivative,
                        score: 0,
                        matched,
                        owner: entry.owner.clone(),
                        method,
                    }
                }
            }
        } else if score <= self.config.modification_threshold {
            Verdict::PlagiarismDetected {
                kind: PlagiarismKind::ModifiedCopy,
                score,
                matched,
                owner: entry.owner.clone(),
                method,
            }
        } else {
            Verdict::Clear { score, method }
        };

        info!(
            score,
            method = %method,
            matched = verdict.is_match(),
            "verification decided"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna::fingerprint_bytes;
    use image::{DynamicImage, ImageBuffer, Rgb};
    use std::io::Cursor;

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    fn textured_image() -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(120, 120, |x, y| {
            let bright: u32 = if x < 40 && y < 40 { 90 } else { 0 };
            Rgb([(x + bright) as u8, (y * 2) as u8, 60])
        }))
    }

    #[test]
    fn test_default_config() {
        let config = MatchConfig::default();
        assert_eq!(config.modification_threshold, 15);
        assert_eq!(config.zoom_factors, vec![1.25, 1.5, 2.0]);
    }

    #[test]
    fn test_undecodable_suspect_is_an_error() {
        let engine = MatchEngine::default();
        let registry = vec![RegistryEntry::new("deadbeefcafebabe", "alice", None)];
        assert!(engine.verify(b"garbage", &registry).is_err());
    }

    #[test]
    fn test_malformed_entries_are_skipped_not_fatal() {
        let bytes = png_bytes(&textured_image());
        let fingerprint = fingerprint_bytes(&bytes).unwrap();

        let registry = vec![
            RegistryEntry::new("not-64-bits", "mallory", None),
            RegistryEntry::new(fingerprint.to_hex(), "alice", None),
        ];
        let verdict = MatchEngine::default().verify(&bytes, &registry).unwrap();
        assert_eq!(verdict.score(), Some(0));
        assert_eq!(verdict.matched_owner(), Some("alice"));
    }

    #[test]
    fn test_registry_with_only_malformed_entries() {
        let bytes = png_bytes(&textured_image());
        let registry = vec![RegistryEntry::new("xyz", "mallory", None)];
        let verdict = MatchEngine::default().verify(&bytes, &registry).unwrap();
        assert!(matches!(verdict, Verdict::NoRegistry));
    }

    #[test]
    fn test_missing_digest_downgrades_to_derivative() {
        let bytes = png_bytes(&textured_image());
        let fingerprint = fingerprint_bytes(&bytes).unwrap();

        // Identical bytes, but the store kept no digest: the tie-break is
        // unavailable, so the match cannot be asserted as Original.
        let registry = vec![RegistryEntry::new(fingerprint.to_hex(), "alice", None)];
        let verdict = MatchEngine::default().verify(&bytes, &registry).unwrap();
        match verdict {
            Verdict::PlagiarismDetected { kind, score, .. } => {
                assert_eq!(kind, PlagiarismKind::Derivative);
                assert_eq!(score, 0);
            }
            other => panic!("expected derivative fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_detection_method_labels() {
        let plain = DetectionMethod {
            orientation: Orientation::Rotate90,
            zoom: None,
        };
        assert_eq!(plain.to_string(), "Detected via 90deg Rotation");

        let zoomed = DetectionMethod {
            orientation: Orientation::Identity,
            zoom: Some(1.5),
        };
        assert_eq!(zoomed.to_string(), "Detected via Original at 1.5x zoom");
    }

    #[test]
    fn test_verdict_serializes() {
        let verdict = Verdict::Clear {
            score: 23,
            method: DetectionMethod {
                orientation: Orientation::Mirror,
                zoom: Some(2.0),
            },
        };
        let json = serde_json::to_string(&verdict).unwrap();
        let restored: Verdict = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.score(), Some(23));
    }
}
