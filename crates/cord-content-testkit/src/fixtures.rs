//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use cord_content::{ContentKernel, KernelConfig, PresentOptions};
use cord_content_core::{
    Content, Credential, Ed25519PublicKey, KeyRegistry, Keypair, KeypairSigner, Presentation,
};

/// A holder with a deterministic key and a default kernel.
pub struct TestFixture {
    pub kernel: ContentKernel,
    pub holder_uri: String,
    pub signer: KeypairSigner,
}

impl TestFixture {
    /// Create a fixture for `did:cord:alice` with a random key.
    pub fn new() -> Self {
        Self::build("did:cord:alice", Keypair::generate())
    }

    /// Create with a deterministic key from seed.
    pub fn with_seed(holder_uri: &str, seed: [u8; 32]) -> Self {
        Self::build(holder_uri, Keypair::from_seed(&seed))
    }

    fn build(holder_uri: &str, keypair: Keypair) -> Self {
        Self {
            kernel: ContentKernel::new(KernelConfig::default()),
            holder_uri: holder_uri.to_string(),
            signer: KeypairSigner::new(keypair, format!("{holder_uri}#key-1")),
        }
    }

    /// The holder's public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.signer.public_key()
    }

    /// A registry resolving this holder's key.
    pub fn registry(&self) -> KeyRegistry {
        KeyRegistry::new().with_key(format!("{}#key-1", self.holder_uri), self.public_key())
    }

    /// Content about this holder.
    pub fn content(&self, schema_uri: &str) -> Content {
        Content::new(schema_uri, "did:cord:issuer").holder(self.holder_uri.as_str())
    }

    /// The standard `{name, age, country}` credential for this holder.
    pub fn make_credential(&self) -> Credential {
        let content = self
            .content("schema:cord:person")
            .property("name", "Alice")
            .property("age", 29)
            .property("country", "DE");
        self.kernel
            .issue(content, vec![])
            .expect("fixture content is valid")
    }

    /// Issue `content` for this holder, chained to `evidence`.
    pub fn issue(&self, content: Content, evidence: Vec<Credential>) -> Credential {
        self.kernel
            .issue(content, evidence)
            .expect("fixture issuance failed")
    }

    /// Present `credential` signed, bound to `challenge`.
    pub fn present_signed(&self, credential: &Credential, challenge: &str) -> Presentation {
        self.kernel
            .present(
                credential,
                PresentOptions::new().challenge(challenge).signer(&self.signer),
            )
            .expect("fixture presentation failed")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create fixtures for several distinct holders.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_seed(&format!("did:cord:holder-{i}"), seed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_credential_verifies() {
        let fixture = TestFixture::with_seed("did:cord:alice", [0x42; 32]);
        let credential = fixture.make_credential();
        assert!(fixture.kernel.verify_credential(&credential).verified);
    }

    #[test]
    fn test_fixture_presentation_verifies() {
        let fixture = TestFixture::new();
        let presentation = fixture.present_signed(&fixture.make_credential(), "c-1");

        let result = fixture
            .kernel
            .verify_presentation(&presentation, &fixture.registry(), Some("c-1"));
        assert!(result.verified, "{:?}", result.errors);
    }

    #[test]
    fn test_multi_party_distinct_keys() {
        let fixtures = multi_party_fixtures(3);
        assert_ne!(fixtures[0].public_key(), fixtures[1].public_key());
        assert_ne!(fixtures[1].holder_uri, fixtures[2].holder_uri);
    }
}
