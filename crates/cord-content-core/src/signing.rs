//! Signing capabilities for presentations.
//!
//! Key management and DID resolution are external; this module only defines
//! the seams ([`PresentationSigner`], [`SignatureVerifier`]) and Ed25519
//! implementations backed by [`Keypair`].

use std::collections::HashMap;

use crate::crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};
use crate::error::CoreError;

/// Separator between a DID and a key fragment in a key URI.
pub const KEY_FRAGMENT_SEPARATOR: char = '#';

/// Produces detached signatures on behalf of a holder key.
pub trait PresentationSigner: Send + Sync {
    /// URI of the signing key, e.g. `did:cord:alice#key-1`.
    fn key_uri(&self) -> &str;

    /// Sign a message.
    fn sign(&self, message: &[u8]) -> Result<Ed25519Signature, CoreError>;
}

/// Checks detached signatures against a declared key.
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` over `message` by the key named `key_uri`.
    fn verify(
        &self,
        message: &[u8],
        signature: &Ed25519Signature,
        key_uri: &str,
    ) -> Result<(), CoreError>;
}

/// The DID part of a key URI (everything before `#`).
pub fn key_uri_did(key_uri: &str) -> &str {
    key_uri
        .split_once(KEY_FRAGMENT_SEPARATOR)
        .map_or(key_uri, |(did, _)| did)
}

/// An Ed25519 keypair bound to a key URI.
#[derive(Debug, Clone)]
pub struct KeypairSigner {
    keypair: Keypair,
    key_uri: String,
}

impl KeypairSigner {
    /// Bind a keypair to a key URI.
    pub fn new(keypair: Keypair, key_uri: impl Into<String>) -> Self {
        Self {
            keypair,
            key_uri: key_uri.into(),
        }
    }

    /// The public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }
}

impl PresentationSigner for KeypairSigner {
    fn key_uri(&self) -> &str {
        &self.key_uri
    }

    fn sign(&self, message: &[u8]) -> Result<Ed25519Signature, CoreError> {
        Ok(self.keypair.sign(message))
    }
}

/// Resolved verification keys, by key URI.
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    keys: HashMap<String, Ed25519PublicKey>,
}

impl KeyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key.
    pub fn insert(&mut self, key_uri: impl Into<String>, key: Ed25519PublicKey) {
        self.keys.insert(key_uri.into(), key);
    }

    /// Builder-style registration.
    pub fn with_key(mut self, key_uri: impl Into<String>, key: Ed25519PublicKey) -> Self {
        self.insert(key_uri, key);
        self
    }

    /// Look up a key.
    pub fn get(&self, key_uri: &str) -> Option<&Ed25519PublicKey> {
        self.keys.get(key_uri)
    }
}

impl SignatureVerifier for KeyRegistry {
    fn verify(
        &self,
        message: &[u8],
        signature: &Ed25519Signature,
        key_uri: &str,
    ) -> Result<(), CoreError> {
        let key = self
            .get(key_uri)
            .ok_or_else(|| CoreError::UnknownKey(key_uri.to_string()))?;
        key.verify(message, signature)
    }
}
