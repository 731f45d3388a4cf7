//! # Cord Content Testkit
//!
//! Testing utilities for cord content credentials.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed inputs with expected root hashes and identifiers
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up holder scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use cord_content_testkit::vectors::{all_vectors, credential_from_vector};
//!
//! for vector in all_vectors() {
//!     let credential = credential_from_vector(&vector).unwrap();
//!     assert_eq!(credential.root_hash.to_hex(), vector.expected_root_hash);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use cord_content_testkit::generators::{content_from_params, ContentParams};
//!
//! proptest! {
//!     #[test]
//!     fn issued_credentials_verify(params: ContentParams) {
//!         let kernel = cord_content::ContentKernel::default();
//!         let credential = kernel.issue(content_from_params(&params), vec![]).unwrap();
//!         prop_assert!(kernel.verify_credential(&credential).verified);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use cord_content_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let credential = fixture.make_credential();
//! let presentation = fixture.present_signed(&credential, "challenge");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture};
pub use generators::{content_from_params, ContentParams};
pub use vectors::{
    all_vectors, credential_from_vector, identifier_vectors, verify_all_vectors, GoldenVector,
    IdentifierVector,
};
