//! The content kernel: issue, disclose, present and verify credentials.
//!
//! The kernel owns the hashing and nonce strategies plus configuration, and
//! routes every operation through them so issuer and verifier never disagree
//! on how a commitment is computed.

use cord_content_core::{
    hash_content_with_nonces, verify_disclosure, Blake2b256, Content, ContentHasher, ContentHashes,
    Credential, CredentialBuilder, Digest, Disclosure, Identifier, IdentifierKind, NonceGenerator,
    NonceMap, Presentation, PresentationSigner, SignatureVerifier, UuidNonceGenerator,
    VerificationResult, VerifyOptions,
};
use cord_content_core::validation::DEFAULT_MAX_EVIDENCE_DEPTH;

use crate::error::{KernelError, Result};

/// Configuration for the kernel.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// Maximum evidence nesting accepted during verification.
    pub max_evidence_depth: usize,
    /// Whether stored identifiers must encode the root hash.
    pub check_identifier: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            max_evidence_depth: DEFAULT_MAX_EVIDENCE_DEPTH,
            check_identifier: true,
        }
    }
}

impl KernelConfig {
    fn verify_options(&self) -> VerifyOptions {
        VerifyOptions {
            max_evidence_depth: self.max_evidence_depth,
            check_identifier: self.check_identifier,
        }
    }
}

/// How a credential is presented.
#[derive(Default)]
pub struct PresentOptions<'a> {
    /// Which properties to reveal.
    pub disclosure: Disclosure,
    /// Verifier-supplied challenge bound into the signature.
    pub challenge: Option<String>,
    /// Holder signer; the presentation is unsigned without one.
    pub signer: Option<&'a dyn PresentationSigner>,
}

impl<'a> PresentOptions<'a> {
    /// Reveal everything, unsigned.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the disclosure selection.
    pub fn disclosure(mut self, disclosure: Disclosure) -> Self {
        self.disclosure = disclosure;
        self
    }

    /// Bind a challenge.
    pub fn challenge(mut self, challenge: impl Into<String>) -> Self {
        self.challenge = Some(challenge.into());
        self
    }

    /// Sign with the given holder key.
    pub fn signer(mut self, signer: &'a dyn PresentationSigner) -> Self {
        self.signer = Some(signer);
        self
    }
}

/// The main kernel struct.
///
/// Provides a unified API for:
/// - Issuing credentials (optionally chained to evidence)
/// - Deriving reduced credentials and presentations
/// - Verifying credentials, presentations and disclosures
pub struct ContentKernel<H = Blake2b256, N = UuidNonceGenerator> {
    /// Hash primitive for statements and roots.
    hasher: H,
    /// Nonce source used at issuance.
    nonces: N,
    /// Configuration.
    config: KernelConfig,
}

impl ContentKernel {
    /// Create a kernel with the default BLAKE2b-256 hasher and UUID nonces.
    pub fn new(config: KernelConfig) -> Self {
        Self::with_strategies(Blake2b256, UuidNonceGenerator, config)
    }
}

impl Default for ContentKernel {
    fn default() -> Self {
        Self::new(KernelConfig::default())
    }
}

impl<H: ContentHasher, N: NonceGenerator> ContentKernel<H, N> {
    /// Create a kernel with explicit strategies.
    pub fn with_strategies(hasher: H, nonces: N, config: KernelConfig) -> Self {
        Self {
            hasher,
            nonces,
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Get the hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Issuance
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a credential over `content`, chained to `evidence`.
    ///
    /// Every evidence credential must verify first.
    pub fn issue(&self, content: Content, evidence: Vec<Credential>) -> Result<Credential> {
        for (index, credential) in evidence.iter().enumerate() {
            let result = self.verify_credential(credential);
            if !result.verified {
                return Err(KernelError::InvalidEvidence {
                    index,
                    errors: result.errors,
                });
            }
        }

        let credential = CredentialBuilder::new(content)
            .evidence_all(evidence)
            .build(&self.hasher, &self.nonces)?;

        tracing::debug!(
            identifier = %credential.identifier,
            statements = credential.content_hashes.len(),
            evidence = credential.evidence_ids.len(),
            "issued credential"
        );

        Ok(credential)
    }

    /// Recompute the hash list for `content` from supplied nonces.
    pub fn hash_with_nonces(
        &self,
        content: &Content,
        nonce_map: &NonceMap,
    ) -> Result<ContentHashes> {
        Ok(hash_content_with_nonces(&self.hasher, content, nonce_map)?)
    }

    /// The typed identifier of a credential's root hash.
    pub fn identifier(&self, root_hash: &Digest) -> Identifier {
        Identifier::from_digest(IdentifierKind::Credential, root_hash)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Disclosure
    // ─────────────────────────────────────────────────────────────────────────

    /// Derive a copy of `credential` without the named properties.
    pub fn remove_properties<'k>(
        &self,
        credential: &Credential,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> Result<Credential> {
        Ok(credential.remove_properties(&self.hasher, keys)?)
    }

    /// Present a single credential.
    pub fn present(
        &self,
        credential: &Credential,
        options: PresentOptions<'_>,
    ) -> Result<Presentation> {
        self.present_many(std::slice::from_ref(credential), options)
    }

    /// Present several credentials of one holder together.
    ///
    /// The same disclosure selection applies to each credential.
    pub fn present_many(
        &self,
        credentials: &[Credential],
        options: PresentOptions<'_>,
    ) -> Result<Presentation> {
        let disclosed = credentials
            .iter()
            .map(|c| c.disclose(&self.hasher, &options.disclosure))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let presentation = Presentation::assemble(disclosed, options.challenge, options.signer)?;

        tracing::debug!(
            credentials = presentation.credentials.len(),
            signed = presentation.is_signed(),
            "assembled presentation"
        );

        Ok(presentation)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify a credential, including its evidence chain.
    pub fn verify_credential(&self, credential: &Credential) -> VerificationResult {
        let result = cord_content_core::verify_credential(
            &self.hasher,
            credential,
            &self.config.verify_options(),
        );

        if !result.verified {
            tracing::warn!(
                identifier = %credential.identifier,
                errors = result.errors.len(),
                "credential failed verification"
            );
        }

        result
    }

    /// Verify a presentation against resolved holder keys.
    pub fn verify_presentation<V: SignatureVerifier + ?Sized>(
        &self,
        presentation: &Presentation,
        verifier: &V,
        expected_challenge: Option<&str>,
    ) -> VerificationResult {
        let result = cord_content_core::verify_presentation(
            &self.hasher,
            presentation,
            verifier,
            expected_challenge,
            &self.config.verify_options(),
        );

        if !result.verified {
            tracing::warn!(
                holder = presentation.holder().unwrap_or("<none>"),
                errors = result.errors.len(),
                "presentation failed verification"
            );
        }

        result
    }

    /// Verify disclosed content against a nonce map and committed hashes.
    pub fn verify_disclosure(
        &self,
        content: &Content,
        nonce_map: &NonceMap,
        hashes: &[Digest],
    ) -> VerificationResult {
        verify_disclosure(&self.hasher, content, nonce_map, hashes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cord_content_core::{Blake3, KeyRegistry, Keypair, KeypairSigner, VerificationError};

    fn alice() -> Content {
        Content::new("schema:cord:abc", "did:cord:issuer")
            .holder("did:cord:alice")
            .property("name", "Alice")
            .property("age", 29)
    }

    #[test]
    fn test_issue_and_verify() {
        let kernel = ContentKernel::default();
        let credential = kernel.issue(alice(), vec![]).unwrap();

        assert!(kernel.verify_credential(&credential).verified);
        assert_eq!(
            kernel.identifier(&credential.root_hash).to_string(),
            credential.identifier
        );
    }

    #[test]
    fn test_issue_rejects_bad_evidence() {
        let kernel = ContentKernel::default();
        let mut evidence = kernel.issue(alice(), vec![]).unwrap();
        evidence.content_hashes[0] = Digest::from_bytes([0xFF; 32]);

        let err = kernel.issue(alice(), vec![evidence]).unwrap_err();
        assert!(matches!(err, KernelError::InvalidEvidence { index: 0, .. }));
    }

    #[test]
    fn test_present_signed_and_verify() {
        let kernel = ContentKernel::default();
        let signer = KeypairSigner::new(Keypair::from_seed(&[0x21; 32]), "did:cord:alice#key-1");
        let registry = KeyRegistry::new().with_key("did:cord:alice#key-1", signer.public_key());

        let credential = kernel.issue(alice(), vec![]).unwrap();
        let presentation = kernel
            .present(
                &credential,
                PresentOptions::new()
                    .disclosure(Disclosure::show(["name"]))
                    .challenge("c-1")
                    .signer(&signer),
            )
            .unwrap();

        assert_eq!(presentation.credentials[0].content.contents.len(), 1);
        let result = kernel.verify_presentation(&presentation, &registry, Some("c-1"));
        assert!(result.verified, "{:?}", result.errors);
    }

    #[test]
    fn test_blake3_kernel_is_self_consistent() {
        let kernel =
            ContentKernel::with_strategies(Blake3, UuidNonceGenerator, KernelConfig::default());
        let credential = kernel.issue(alice(), vec![]).unwrap();
        assert!(kernel.verify_credential(&credential).verified);

        // A verifier using a different hash primitive rejects it.
        let result = ContentKernel::default().verify_credential(&credential);
        assert!(result
            .errors
            .iter()
            .any(|e| matches!(e, VerificationError::RootHashUnverifiable { .. })));
    }

    #[test]
    fn test_present_many_rejects_mixed_holders() {
        let kernel = ContentKernel::default();
        let a = kernel.issue(alice(), vec![]).unwrap();
        let b = kernel
            .issue(Content::new("s", "i").holder("did:cord:bob").property("x", 1), vec![])
            .unwrap();

        let err = kernel.present_many(&[a, b], PresentOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            KernelError::Core(cord_content_core::CoreError::HolderMismatch)
        ));
    }
}
