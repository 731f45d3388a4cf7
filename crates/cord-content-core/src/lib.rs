//! # Cord Content Core
//!
//! Pure primitives for selectively-disclosable content commitments:
//! statements, salted hashes, root hashes, identifiers and credentials.
//!
//! This crate performs no I/O and keeps no global state. Hashing, nonce
//! generation and signing are injected through traits.
//!
//! ## Key Types
//!
//! - [`Content`] - A structured claim under a schema
//! - [`Credential`] - Content plus its salted-hash commitment and evidence
//! - [`Presentation`] - Disclosed credentials with an optional holder signature
//! - [`Digest`] - 32-byte hash value
//! - [`Identifier`] - Kind-tagged, checksummed Base58 identifier
//!
//! ## Hashing
//!
//! Each top-level property becomes one statement
//! `{"<schemaUri>#<key>": value}` (see [`canonical`]). Statements are salted
//! with per-statement nonces and folded into a root hash (see [`aggregate`]).

pub mod aggregate;
pub mod canonical;
pub mod content;
pub mod credential;
pub mod crypto;
pub mod disclosure;
pub mod error;
pub mod identifier;
pub mod signing;
pub mod statement;
pub mod types;
pub mod validation;

pub use aggregate::aggregate;
pub use canonical::{canonicalize, Statement};
pub use content::Content;
pub use credential::{
    presentation_message, Credential, CredentialBuilder, Disclosure, Presentation,
    PresentationSignature,
};
pub use crypto::{Blake2b256, Blake3, ContentHasher, Ed25519PublicKey, Ed25519Signature, Keypair};
pub use disclosure::{prune_nonce_map, verify_disclosure};
pub use error::{CoreError, VerificationError, VerificationResult};
pub use identifier::{DecodeOptions, DecodedIdentifier, Identifier, IdentifierKind};
pub use signing::{KeyRegistry, KeypairSigner, PresentationSigner, SignatureVerifier};
pub use statement::{
    hash_content, hash_content_with_nonces, ContentHashes, NonceGenerator, UuidNonceGenerator,
};
pub use types::{Digest, NonceMap};
pub use validation::{
    validate_credential_structure, verify_credential, verify_presentation, VerifyOptions,
};
