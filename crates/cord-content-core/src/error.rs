//! Error types for the content core.

use thiserror::Error;

use crate::types::Digest;

/// Terminal errors: malformed input, invalid identifiers and key failures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("content has no schema uri to use as hashing vocabulary")]
    MissingVocabulary,

    #[error("property {key:?} has an unsupported statement value: {reason}")]
    MalformedStatementValue { key: String, reason: String },

    #[error("malformed digest: {0}")]
    MalformedDigest(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("no nonce supplied for statement {statement}")]
    MissingNonce { statement: String },

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("unknown verification key: {0}")]
    UnknownKey(String),

    #[error("credentials in a presentation have different holders")]
    HolderMismatch,

    #[error("a presentation needs at least one credential")]
    EmptyPresentation,

    #[error("encoding error: {0}")]
    EncodingError(String),
}

/// A single finding reported while verifying a credential or presentation.
///
/// Verification collects every finding instead of stopping at the first, so
/// a caller can report each offending property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("no proof for statement {statement}")]
    NoProofForStatement { statement: String },

    #[error("invalid proof for statement {statement}")]
    InvalidProofForStatement { statement: String },

    #[error("root hash unverifiable: stored {stored}, computed {computed}")]
    RootHashUnverifiable { stored: Digest, computed: Digest },

    #[error("identifier {found} does not encode the root hash (expected {expected})")]
    IdentifierMismatch { expected: String, found: String },

    #[error("malformed content: {0}")]
    MalformedContent(String),

    #[error("structural error: {0}")]
    StructuralError(String),

    #[error("evidence {index} is invalid: {source}")]
    InvalidEvidence {
        index: usize,
        #[source]
        source: Box<VerificationError>,
    },

    #[error("evidence chain exceeds the maximum depth of {0}")]
    EvidenceTooDeep(usize),

    #[error("presentation is not signed")]
    MissingSignature,

    #[error("presentation signature does not verify")]
    SignatureFailed,

    #[error("signing key {key_uri} does not belong to holder {holder}")]
    SignerNotHolder { key_uri: String, holder: String },

    #[error("challenge mismatch: expected {expected:?}, got {got:?}")]
    ChallengeMismatch {
        expected: String,
        got: Option<String>,
    },

    #[error("credentials in a presentation have different holders")]
    HolderMismatch,
}

impl From<CoreError> for VerificationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::MissingVocabulary | CoreError::MalformedStatementValue { .. } => {
                VerificationError::MalformedContent(e.to_string())
            }
            CoreError::MissingNonce { statement } => {
                VerificationError::NoProofForStatement { statement }
            }
            CoreError::InvalidSignature
            | CoreError::InvalidPublicKey
            | CoreError::UnknownKey(_) => VerificationError::SignatureFailed,
            CoreError::HolderMismatch => VerificationError::HolderMismatch,
            CoreError::EmptyPresentation => {
                VerificationError::StructuralError(e.to_string())
            }
            CoreError::MalformedDigest(msg)
            | CoreError::InvalidIdentifier(msg)
            | CoreError::EncodingError(msg) => VerificationError::StructuralError(msg),
        }
    }
}

/// Outcome of a verification: a flag plus every finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// True when no errors were found.
    pub verified: bool,
    /// All findings, in discovery order.
    pub errors: Vec<VerificationError>,
}

impl VerificationResult {
    /// Build a result from collected findings.
    pub fn from_errors(errors: Vec<VerificationError>) -> Self {
        Self {
            verified: errors.is_empty(),
            errors,
        }
    }

    /// A passing result.
    pub fn ok() -> Self {
        Self::from_errors(Vec::new())
    }

    /// Merge another result's findings into this one.
    pub fn merge(&mut self, other: VerificationResult) {
        self.errors.extend(other.errors);
        self.verified = self.errors.is_empty();
    }

    /// Record a single finding.
    pub fn push(&mut self, error: VerificationError) {
        self.errors.push(error);
        self.verified = false;
    }
}
