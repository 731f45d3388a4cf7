//! Statement hashing: unsalted digests and salted commitments.
//!
//! For a statement `s` and nonce `n`:
//! - unsalted digest = `H(s)`, used only as a nonce-map key
//! - salted hash = `H(n || s)`, the published commitment

use uuid::Uuid;

use crate::canonical::{canonicalize, Statement};
use crate::content::Content;
use crate::crypto::ContentHasher;
use crate::error::CoreError;
use crate::types::{Digest, NonceMap};

/// Source of fresh nonces at issuance time.
///
/// Verification never generates nonces; it always receives them.
pub trait NonceGenerator: Send + Sync {
    /// Produce a nonce for the statement with the given unsalted digest.
    fn generate(&self, digest: &Digest) -> String;
}

/// Random v4 UUIDs in hyphenated text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNonceGenerator;

impl NonceGenerator for UuidNonceGenerator {
    fn generate(&self, _digest: &Digest) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> NonceGenerator for F
where
    F: Fn(&Digest) -> String + Send + Sync,
{
    fn generate(&self, digest: &Digest) -> String {
        self(digest)
    }
}

/// A statement with its digest, nonce and salted hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedStatement {
    pub statement: Statement,
    pub digest: Digest,
    pub nonce: String,
    pub salted_hash: Digest,
}

/// The unsalted digest of a statement.
pub fn statement_digest<H: ContentHasher + ?Sized>(hasher: &H, statement: &Statement) -> Digest {
    hasher.hash(statement.as_bytes())
}

/// The salted hash `H(nonce || statement)`.
pub fn salted_hash<H: ContentHasher + ?Sized>(
    hasher: &H,
    statement: &Statement,
    nonce: &str,
) -> Digest {
    hasher.hash_parts(&[nonce.as_bytes(), statement.as_bytes()])
}

/// Hash a statement with the given nonce.
pub fn hash_statement<H: ContentHasher + ?Sized>(
    hasher: &H,
    statement: Statement,
    nonce: String,
) -> HashedStatement {
    let digest = statement_digest(hasher, &statement);
    let salted_hash = salted_hash(hasher, &statement, &nonce);
    HashedStatement {
        statement,
        digest,
        nonce,
        salted_hash,
    }
}

/// Hash statements with fresh nonces.
pub fn hash_statements<H, N>(
    hasher: &H,
    statements: Vec<Statement>,
    nonces: &N,
) -> Vec<HashedStatement>
where
    H: ContentHasher + ?Sized,
    N: NonceGenerator + ?Sized,
{
    statements
        .into_iter()
        .map(|statement| {
            let digest = statement_digest(hasher, &statement);
            let nonce = nonces.generate(&digest);
            let salted_hash = salted_hash(hasher, &statement, &nonce);
            HashedStatement {
                statement,
                digest,
                nonce,
                salted_hash,
            }
        })
        .collect()
}

/// Hash statements with nonces looked up by unsalted digest.
pub fn hash_statements_with_nonces<H: ContentHasher + ?Sized>(
    hasher: &H,
    statements: Vec<Statement>,
    nonce_map: &NonceMap,
) -> Result<Vec<HashedStatement>, CoreError> {
    statements
        .into_iter()
        .map(|statement| {
            let digest = statement_digest(hasher, &statement);
            let nonce = nonce_map
                .get(&digest)
                .cloned()
                .ok_or_else(|| CoreError::MissingNonce {
                    statement: statement.text.clone(),
                })?;
            let salted_hash = salted_hash(hasher, &statement, &nonce);
            Ok(HashedStatement {
                statement,
                digest,
                nonce,
                salted_hash,
            })
        })
        .collect()
}

/// The committed hash list and nonce map for a whole content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentHashes {
    /// Salted hashes, ascending.
    pub hashes: Vec<Digest>,
    /// Unsalted digest to nonce.
    pub nonce_map: NonceMap,
}

impl FromIterator<HashedStatement> for ContentHashes {
    fn from_iter<I: IntoIterator<Item = HashedStatement>>(iter: I) -> Self {
        let mut out = ContentHashes::default();
        for hashed in iter {
            out.hashes.push(hashed.salted_hash);
            out.nonce_map.insert(hashed.digest, hashed.nonce);
        }
        out.hashes.sort_unstable();
        out
    }
}

/// Canonicalize and hash content with fresh nonces.
pub fn hash_content<H, N>(
    hasher: &H,
    content: &Content,
    nonces: &N,
) -> Result<ContentHashes, CoreError>
where
    H: ContentHasher + ?Sized,
    N: NonceGenerator + ?Sized,
{
    let statements = canonicalize(content)?;
    Ok(hash_statements(hasher, statements, nonces).into_iter().collect())
}

/// Canonicalize and hash content with supplied nonces.
pub fn hash_content_with_nonces<H: ContentHasher + ?Sized>(
    hasher: &H,
    content: &Content,
    nonce_map: &NonceMap,
) -> Result<ContentHashes, CoreError> {
    let statements = canonicalize(content)?;
    Ok(hash_statements_with_nonces(hasher, statements, nonce_map)?
        .into_iter()
        .collect())
}
