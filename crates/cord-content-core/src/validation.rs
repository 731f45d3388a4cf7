//! Credential and presentation verification.
//!
//! A structural problem stops verification of that credential early.
//! Everything else is collected so a caller sees every failing proof at once.

use crate::credential::{Credential, Presentation};
use crate::crypto::ContentHasher;
use crate::disclosure::verify_disclosure;
use crate::error::{VerificationError, VerificationResult};
use crate::signing::{key_uri_did, SignatureVerifier};

/// Default bound on evidence nesting.
pub const DEFAULT_MAX_EVIDENCE_DEPTH: usize = 16;

/// Knobs for credential verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Maximum evidence nesting below the verified credential.
    pub max_evidence_depth: usize,
    /// Whether the stored identifier must encode the root hash.
    pub check_identifier: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            max_evidence_depth: DEFAULT_MAX_EVIDENCE_DEPTH,
            check_identifier: true,
        }
    }
}

/// Check a credential's shape without recomputing any hash chain.
///
/// This checks:
/// - Non-empty schema URI
/// - Content hashes strictly ascending
/// - Nonce map no larger than the hash list, with non-empty nonces
/// - Identifier encodes the root hash (when `check_identifier`)
pub fn validate_credential_structure(
    credential: &Credential,
    check_identifier: bool,
) -> Result<(), VerificationError> {
    // 1. Vocabulary
    if credential.content.schema_uri.trim().is_empty() {
        return Err(VerificationError::MalformedContent(
            "content has no schema uri".into(),
        ));
    }

    // 2. Hash list sorted, no duplicates
    if credential.content_hashes.windows(2).any(|w| w[0] >= w[1]) {
        return Err(VerificationError::StructuralError(
            "content hashes must be strictly ascending".into(),
        ));
    }

    // 3. Nonce map
    if credential.content_nonce_map.len() > credential.content_hashes.len() {
        return Err(VerificationError::StructuralError(format!(
            "nonce map has {} entries for {} content hashes",
            credential.content_nonce_map.len(),
            credential.content_hashes.len()
        )));
    }
    if credential.content_nonce_map.values().any(String::is_empty) {
        return Err(VerificationError::StructuralError(
            "nonce map contains an empty nonce".into(),
        ));
    }

    // 4. Identifier
    if check_identifier {
        let expected = credential.expected_identifier();
        if expected.as_str() != credential.identifier {
            return Err(VerificationError::IdentifierMismatch {
                expected: expected.to_string(),
                found: credential.identifier.clone(),
            });
        }
    }

    Ok(())
}

/// Verify a credential: structure, root hash, evidence and disclosure.
pub fn verify_credential<H: ContentHasher + ?Sized>(
    hasher: &H,
    credential: &Credential,
    options: &VerifyOptions,
) -> VerificationResult {
    VerificationResult::from_errors(credential_errors(hasher, credential, options, 0))
}

fn credential_errors<H: ContentHasher + ?Sized>(
    hasher: &H,
    credential: &Credential,
    options: &VerifyOptions,
    depth: usize,
) -> Vec<VerificationError> {
    if let Err(e) = validate_credential_structure(credential, options.check_identifier) {
        return vec![e];
    }

    let mut errors = Vec::new();

    let computed = credential.compute_root_hash(hasher);
    if computed != credential.root_hash {
        errors.push(VerificationError::RootHashUnverifiable {
            stored: credential.root_hash,
            computed,
        });
    }

    if !credential.evidence_ids.is_empty() {
        if depth >= options.max_evidence_depth {
            errors.push(VerificationError::EvidenceTooDeep(options.max_evidence_depth));
        } else {
            for (index, evidence) in credential.evidence_ids.iter().enumerate() {
                errors.extend(
                    credential_errors(hasher, evidence, options, depth + 1)
                        .into_iter()
                        .map(|source| VerificationError::InvalidEvidence {
                            index,
                            source: Box::new(source),
                        }),
                );
            }
        }
    }

    let disclosure = verify_disclosure(
        hasher,
        &credential.content,
        &credential.content_nonce_map,
        &credential.content_hashes,
    );
    errors.extend(disclosure.errors);

    errors
}

/// Verify a presentation: every credential, shared holder, challenge and
/// holder signature.
///
/// An unsigned presentation passes only when no challenge is expected.
pub fn verify_presentation<H, V>(
    hasher: &H,
    presentation: &Presentation,
    verifier: &V,
    expected_challenge: Option<&str>,
    options: &VerifyOptions,
) -> VerificationResult
where
    H: ContentHasher + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    let mut result = VerificationResult::ok();

    let Some(first) = presentation.credentials.first() else {
        result.push(VerificationError::StructuralError(
            "presentation has no credentials".into(),
        ));
        return result;
    };

    if presentation
        .credentials
        .iter()
        .any(|c| c.holder() != first.holder())
    {
        result.push(VerificationError::HolderMismatch);
    }

    for credential in &presentation.credentials {
        result.merge(verify_credential(hasher, credential, options));
    }

    if let Some(expected) = expected_challenge {
        if presentation.challenge.as_deref() != Some(expected) {
            result.push(VerificationError::ChallengeMismatch {
                expected: expected.to_string(),
                got: presentation.challenge.clone(),
            });
        }
    }

    match &presentation.signature {
        None if expected_challenge.is_some() => {
            result.push(VerificationError::MissingSignature);
        }
        None => {}
        Some(sig) => {
            if let Some(holder) = first.holder() {
                if key_uri_did(&sig.key_uri) != holder {
                    result.push(VerificationError::SignerNotHolder {
                        key_uri: sig.key_uri.clone(),
                        holder: holder.to_string(),
                    });
                }
            }

            let message = presentation.signing_message();
            if verifier
                .verify(&message, &sig.signature, &sig.key_uri)
                .is_err()
            {
                result.push(VerificationError::SignatureFailed);
            }
        }
    }

    result
}
