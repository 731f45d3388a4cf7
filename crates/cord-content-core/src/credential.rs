//! Credentials and presentations.
//!
//! A credential is immutable once built. Disclosure derives a new credential
//! with fewer properties and a pruned nonce map; the hash list, evidence and
//! root hash carry over unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::aggregate::aggregate;
use crate::content::Content;
use crate::crypto::{ContentHasher, Ed25519Signature};
use crate::disclosure::prune_nonce_map;
use crate::error::CoreError;
use crate::identifier::{Identifier, IdentifierKind};
use crate::signing::PresentationSigner;
use crate::statement::{hash_content, NonceGenerator};
use crate::types::{Digest, NonceMap};

/// Domain separation prefix for presentation signatures.
pub const PRESENTATION_SIGN_DOMAIN: &[u8] = b"cord/presentation-sig/v1";

/// A selectively-disclosable credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// The (possibly reduced) claim.
    pub content: Content,

    /// Salted hashes of every statement at issuance, ascending.
    pub content_hashes: Vec<Digest>,

    /// Nonces for the statements currently in `content`.
    pub content_nonce_map: NonceMap,

    /// Nested credentials folded into the root hash, in order.
    #[serde(default)]
    pub evidence_ids: Vec<Credential>,

    /// Aggregate commitment over `content_hashes` and evidence root hashes.
    pub root_hash: Digest,

    /// Credential identifier derived from `root_hash`.
    pub identifier: String,
}

impl Credential {
    /// The holder, if any.
    pub fn holder(&self) -> Option<&str> {
        self.content.holder_uri.as_deref()
    }

    /// Root hashes of the evidence credentials, in order.
    pub fn evidence_root_hashes(&self) -> Vec<Digest> {
        self.evidence_ids.iter().map(|e| e.root_hash).collect()
    }

    /// Recompute the root hash from the stored hashes and evidence.
    pub fn compute_root_hash<H: ContentHasher + ?Sized>(&self, hasher: &H) -> Digest {
        aggregate(hasher, &self.content_hashes, &self.evidence_root_hashes())
    }

    /// The identifier a credential with this root hash must carry.
    pub fn expected_identifier(&self) -> Identifier {
        Identifier::from_digest(IdentifierKind::Credential, &self.root_hash)
    }

    /// Derive a copy without the named properties.
    ///
    /// The nonce map is pruned to the remaining statements; hashes, evidence
    /// and root hash are unchanged.
    pub fn remove_properties<'a, H, I>(&self, hasher: &H, excluded: I) -> Result<Self, CoreError>
    where
        H: ContentHasher + ?Sized,
        I: IntoIterator<Item = &'a str>,
    {
        let content = self.content.without(excluded);
        let content_nonce_map = prune_nonce_map(hasher, &content, &self.content_nonce_map)?;
        Ok(Self {
            content,
            content_nonce_map,
            ..self.clone()
        })
    }

    /// Derive a copy disclosing only what `selection` allows.
    pub fn disclose<H: ContentHasher + ?Sized>(
        &self,
        hasher: &H,
        selection: &Disclosure,
    ) -> Result<Self, CoreError> {
        let excluded = selection.excluded(&self.content);
        self.remove_properties(hasher, excluded.iter().map(String::as_str))
    }
}

/// Builds a credential from content and optional evidence.
pub struct CredentialBuilder {
    content: Content,
    evidence: Vec<Credential>,
}

impl CredentialBuilder {
    /// Start building from content.
    pub fn new(content: Content) -> Self {
        Self {
            content,
            evidence: Vec::new(),
        }
    }

    /// Append an evidence credential.
    pub fn evidence(mut self, credential: Credential) -> Self {
        self.evidence.push(credential);
        self
    }

    /// Append several evidence credentials, keeping their order.
    pub fn evidence_all(mut self, credentials: impl IntoIterator<Item = Credential>) -> Self {
        self.evidence.extend(credentials);
        self
    }

    /// Hash the content with fresh nonces and assemble the credential.
    pub fn build<H, N>(self, hasher: &H, nonces: &N) -> Result<Credential, CoreError>
    where
        H: ContentHasher + ?Sized,
        N: NonceGenerator + ?Sized,
    {
        let hashed = hash_content(hasher, &self.content, nonces)?;
        let evidence_roots: Vec<Digest> = self.evidence.iter().map(|e| e.root_hash).collect();
        let root_hash = aggregate(hasher, &hashed.hashes, &evidence_roots);
        let identifier = Identifier::from_digest(IdentifierKind::Credential, &root_hash);

        Ok(Credential {
            content: self.content,
            content_hashes: hashed.hashes,
            content_nonce_map: hashed.nonce_map,
            evidence_ids: self.evidence,
            root_hash,
            identifier: identifier.to_string(),
        })
    }
}

/// Which properties a presentation reveals.
///
/// `excluded = (show ? all - show : {}) ∪ hide`. Unknown names are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disclosure {
    pub show: Option<Vec<String>>,
    pub hide: Vec<String>,
}

impl Disclosure {
    /// Reveal everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Reveal only the named properties.
    pub fn show<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            show: Some(keys.into_iter().map(Into::into).collect()),
            hide: Vec::new(),
        }
    }

    /// Hide the named properties.
    pub fn hide<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            show: None,
            hide: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Additionally hide the named properties.
    pub fn and_hide<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hide.extend(keys.into_iter().map(Into::into));
        self
    }

    /// The property names to remove from `content`.
    pub fn excluded(&self, content: &Content) -> BTreeSet<String> {
        let mut excluded: BTreeSet<String> = match &self.show {
            Some(show) => content
                .keys()
                .filter(|k| !show.iter().any(|s| s.as_str() == *k))
                .map(String::from)
                .collect(),
            None => BTreeSet::new(),
        };
        excluded.extend(self.hide.iter().cloned());
        excluded
    }
}

/// A detached holder signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationSignature {
    /// The signing key, e.g. `did:cord:alice#key-1`.
    pub key_uri: String,
    /// Signature over the presentation message.
    pub signature: Ed25519Signature,
}

/// Credentials disclosed together by one holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub credentials: Vec<Credential>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<PresentationSignature>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
}

impl Presentation {
    /// Assemble a presentation from already-disclosed credentials.
    ///
    /// All credentials must share one holder. With a signer, the presentation
    /// is signed over the root hashes and challenge.
    pub fn assemble(
        credentials: Vec<Credential>,
        challenge: Option<String>,
        signer: Option<&dyn PresentationSigner>,
    ) -> Result<Self, CoreError> {
        let first = credentials.first().ok_or(CoreError::EmptyPresentation)?;
        if credentials.iter().any(|c| c.holder() != first.holder()) {
            return Err(CoreError::HolderMismatch);
        }

        let mut presentation = Self {
            credentials,
            signature: None,
            challenge,
        };

        if let Some(signer) = signer {
            let message = presentation.signing_message();
            presentation.signature = Some(PresentationSignature {
                key_uri: signer.key_uri().to_string(),
                signature: signer.sign(&message)?,
            });
        }

        Ok(presentation)
    }

    /// Whether a holder signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// The shared holder, if the credentials agree on one.
    pub fn holder(&self) -> Option<&str> {
        self.credentials.first().and_then(Credential::holder)
    }

    /// The bytes a holder signs.
    pub fn signing_message(&self) -> Vec<u8> {
        presentation_message(
            self.credentials.iter().map(|c| &c.root_hash),
            self.challenge.as_deref(),
        )
    }
}

/// The signed bytes:
/// `PRESENTATION_SIGN_DOMAIN || u32_be(n) || root_hash_1 .. root_hash_n || tag || challenge`.
///
/// `tag` is `0x00` without a challenge and `0x01` followed by the UTF-8
/// challenge otherwise, so an absent and an empty challenge sign differently.
pub fn presentation_message<'a, I>(root_hashes: I, challenge: Option<&str>) -> Vec<u8>
where
    I: IntoIterator<Item = &'a Digest>,
{
    let roots: Vec<&Digest> = root_hashes.into_iter().collect();

    let mut msg = PRESENTATION_SIGN_DOMAIN.to_vec();
    msg.extend_from_slice(&(roots.len() as u32).to_be_bytes());
    for root in roots {
        msg.extend_from_slice(root.as_bytes());
    }
    match challenge {
        None => msg.push(0x00),
        Some(challenge) => {
            msg.push(0x01);
            msg.extend_from_slice(challenge.as_bytes());
        }
    }
    msg
}
