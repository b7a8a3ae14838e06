//! Read-only registry snapshot types.
//!
//! The registry itself lives outside the core (in the original system, an
//! on-chain box map keyed by the fingerprint hex string). A verification
//! call receives a snapshot of entries and never mutates it; consistency of
//! concurrent appends is the external store's contract.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

/// SHA3-256 digest of an original file's full bytes.
///
/// Compared only when the fingerprint distance is exactly 0, to tell
/// pixel-perfect reuse apart from same-structure re-encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDigest(pub [u8; 32]);

impl ContentDigest {
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(data);
        let result = hasher.finalize();

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&result);
        Self(digest)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// One registered artwork, as supplied by the external store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Fingerprint in its canonical 16-char hex form (the on-chain key).
    /// Entries that do not decode to exactly 64 bits are skipped during a
    /// scan, not fatal.
    pub fingerprint: String,
    /// Owner identity, opaque to the core.
    pub owner: String,
    /// Digest of the original bytes, if the store kept them. Without it the
    /// byte-identity tie-break is unavailable and a distance-0 match is
    /// reported as a derivative work.
    pub content_digest: Option<ContentDigest>,
}

impl RegistryEntry {
    pub fn new(
        fingerprint: impl Into<String>,
        owner: impl Into<String>,
        content_digest: Option<ContentDigest>,
    ) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            owner: owner.into(),
            content_digest,
        }
    }
}
