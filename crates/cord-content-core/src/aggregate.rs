//! Root hash aggregation.
//!
//! `root = H(sorted(salted_hashes) || evidence_root_hashes)`: one flat hash
//! over the concatenated leaves. Salted hashes are sorted so the commitment
//! does not depend on property order; evidence keeps its given order.

use crate::crypto::ContentHasher;
use crate::types::Digest;

/// Compute the root hash from salted hashes and evidence root hashes.
pub fn aggregate<H: ContentHasher + ?Sized>(
    hasher: &H,
    salted_hashes: &[Digest],
    evidence_root_hashes: &[Digest],
) -> Digest {
    let mut sorted = salted_hashes.to_vec();
    sorted.sort_unstable();

    let leaves: Vec<&[u8]> = sorted
        .iter()
        .chain(evidence_root_hashes.iter())
        .map(|d| d.as_bytes().as_slice())
        .collect();

    hasher.hash_parts(&leaves)
}
