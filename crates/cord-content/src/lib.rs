//! # Cord Content
//!
//! The unified API for selectively-disclosable content credentials.
//!
//! ## Overview
//!
//! An issuer turns a structured claim into a [`Credential`]: every top-level
//! property becomes a salted statement hash, and all hashes (plus the root
//! hashes of any evidence credentials) fold into one root hash. A holder can
//! later present a reduced copy that reveals only some properties; a
//! verifier checks that what is revealed is consistent with the root hash.
//!
//! ## Key Concepts
//!
//! - **Statement**: One property rendered as `{"<schemaUri>#<key>": value}`.
//! - **Holder statement**: `{"@id": holderUri}`, committed whenever a holder
//!   is set and never hidden.
//! - **Nonce map**: Per-statement salts, keyed by unsalted digest.
//! - **Root hash**: `H(sorted salted hashes || evidence root hashes)`.
//! - **Identifier**: The root hash encoded with a checksummed Base58 codec.
//!
//! ## Usage
//!
//! ```rust
//! use cord_content::{ContentKernel, Disclosure, KernelConfig, PresentOptions};
//! use cord_content::core::Content;
//!
//! let kernel = ContentKernel::new(KernelConfig::default());
//!
//! let content = Content::new("schema:cord:abc", "did:cord:issuer")
//!     .holder("did:cord:alice")
//!     .property("name", "Alice")
//!     .property("age", 29);
//!
//! let credential = kernel.issue(content, vec![]).unwrap();
//! let presentation = kernel
//!     .present(&credential, PresentOptions::new().disclosure(Disclosure::hide(["age"])))
//!     .unwrap();
//!
//! assert!(kernel.verify_credential(&presentation.credentials[0]).verified);
//! ```
//!
//! ## Re-exports
//!
//! - `cord_content::core` - Core primitives (Content, Credential, identifiers, etc.)

pub mod error;
pub mod kernel;

// Re-export component crates
pub use cord_content_core as core;

// Re-export main types for convenience
pub use error::{KernelError, Result};
pub use kernel::{ContentKernel, KernelConfig, PresentOptions};

// Re-export commonly used core types
pub use cord_content_core::{
    Blake2b256, Blake3, Content, ContentHasher, Credential, Digest, Disclosure, Identifier,
    IdentifierKind, KeyRegistry, Keypair, KeypairSigner, NonceGenerator, NonceMap, Presentation,
    PresentationSigner, SignatureVerifier, UuidNonceGenerator, VerificationError,
    VerificationResult,
};
