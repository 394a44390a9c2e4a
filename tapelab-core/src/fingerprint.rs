//! Deterministic run fingerprinting.
//!
//! Two runs over identical configuration and inputs must produce
//! bit-identical snapshot sequences; hashing the serialized sequence turns
//! that invariant into a one-line comparison. Snapshots serialize with
//! ordered position maps, so the digest is stable across platforms.

use crate::domain::PortfolioSnapshot;

/// BLAKE3 digest of the serialized snapshot sequence, as a hex string.
pub fn snapshot_fingerprint(snapshots: &[PortfolioSnapshot]) -> String {
    let mut hasher = blake3::Hasher::new();
    for snapshot in snapshots {
        let bytes = serde_json::to_vec(snapshot).expect("snapshots always serialize");
        hasher.update(&bytes);
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}
