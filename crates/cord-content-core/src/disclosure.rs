//! Disclosure verification.
//!
//! Checks that every statement of a (possibly reduced) content is part of
//! the hash list committed at issuance. The hash list never shrinks on
//! disclosure; only the content and its nonce map do.

use std::collections::BTreeSet;

use crate::canonical::canonicalize;
use crate::content::Content;
use crate::crypto::ContentHasher;
use crate::error::{CoreError, VerificationError, VerificationResult};
use crate::statement::{salted_hash, statement_digest};
use crate::types::{Digest, NonceMap};

/// Verify disclosed content against a nonce map and the committed hashes.
///
/// Every offending statement is reported.
pub fn verify_disclosure<H: ContentHasher + ?Sized>(
    hasher: &H,
    content: &Content,
    nonce_map: &NonceMap,
    hashes: &[Digest],
) -> VerificationResult {
    let statements = match canonicalize(content) {
        Ok(statements) => statements,
        Err(e) => return VerificationResult::from_errors(vec![e.into()]),
    };

    let committed: BTreeSet<&Digest> = hashes.iter().collect();
    let mut errors = Vec::new();

    for statement in &statements {
        let digest = statement_digest(hasher, statement);
        let Some(nonce) = nonce_map.get(&digest) else {
            errors.push(VerificationError::NoProofForStatement {
                statement: statement.text.clone(),
            });
            continue;
        };

        let salted = salted_hash(hasher, statement, nonce);
        if !committed.contains(&salted) {
            errors.push(VerificationError::InvalidProofForStatement {
                statement: statement.text.clone(),
            });
        }
    }

    VerificationResult::from_errors(errors)
}

/// Keep only nonce-map entries whose statements are still present.
///
/// Nonces are never regenerated; a statement without an entry stays without
/// one.
pub fn prune_nonce_map<H: ContentHasher + ?Sized>(
    hasher: &H,
    content: &Content,
    nonce_map: &NonceMap,
) -> Result<NonceMap, CoreError> {
    let present: BTreeSet<Digest> = canonicalize(content)?
        .iter()
        .map(|s| statement_digest(hasher, s))
        .collect();

    Ok(nonce_map
        .iter()
        .filter(|(digest, _)| present.contains(digest))
        .map(|(digest, nonce)| (*digest, nonce.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Blake2b256;
    use crate::statement::{hash_content, UuidNonceGenerator};

    fn alice() -> Content {
        Content::new("schema:cord:abc", "did:cord:issuer")
            .property("name", "Alice")
            .property("age", 29)
    }

    #[test]
    fn test_full_content_verifies() {
        let content = alice();
        let issued = hash_content(&Blake2b256, &content, &UuidNonceGenerator).unwrap();
        let result = verify_disclosure(&Blake2b256, &content, &issued.nonce_map, &issued.hashes);
        assert!(result.verified, "{:?}", result.errors);
    }

    #[test]
    fn test_reduced_content_verifies_against_full_hashes() {
        let content = alice();
        let issued = hash_content(&Blake2b256, &content, &UuidNonceGenerator).unwrap();

        let reduced = content.without(["age"]);
        let nonces = prune_nonce_map(&Blake2b256, &reduced, &issued.nonce_map).unwrap();
        assert_eq!(nonces.len(), 1);

        let result = verify_disclosure(&Blake2b256, &reduced, &nonces, &issued.hashes);
        assert!(result.verified);
    }

    #[test]
    fn test_fabricated_value_without_nonce() {
        let content = alice();
        let issued = hash_content(&Blake2b256, &content, &UuidNonceGenerator).unwrap();

        let forged = content.clone().property("name", "Mallory");
        let result = verify_disclosure(&Blake2b256, &forged, &issued.nonce_map, &issued.hashes);

        assert!(!result.verified);
        assert!(matches!(
            result.errors.as_slice(),
            [VerificationError::NoProofForStatement { .. }]
        ));
    }

    #[test]
    fn test_fabricated_value_with_reused_nonce() {
        let content = alice();
        let issued = hash_content(&Blake2b256, &content, &UuidNonceGenerator).unwrap();

        // Attach the original name nonce to the forged statement's digest.
        let forged = content.clone().property("name", "Mallory");
        let original_name = &canonicalize(&content.without(["age"])).unwrap()[0];
        let original_nonce =
            issued.nonce_map[&statement_digest(&Blake2b256, original_name)].clone();
        let forged_stmt = &canonicalize(&forged.without(["age"])).unwrap()[0];

        let mut nonces = issued.nonce_map.clone();
        nonces.insert(statement_digest(&Blake2b256, forged_stmt), original_nonce);

        let result = verify_disclosure(&Blake2b256, &forged, &nonces, &issued.hashes);
        assert!(matches!(
            result.errors.as_slice(),
            [VerificationError::InvalidProofForStatement { .. }]
        ));
    }

    #[test]
    fn test_collects_every_error() {
        let content = alice();
        let result = verify_disclosure(&Blake2b256, &content, &NonceMap::new(), &[]);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_missing_vocabulary_is_reported() {
        let content = Content::new("", "i").property("a", 1);
        let result = verify_disclosure(&Blake2b256, &content, &NonceMap::new(), &[]);
        assert!(matches!(
            result.errors.as_slice(),
            [VerificationError::MalformedContent(_)]
        ));
    }
}
