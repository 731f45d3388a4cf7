//! Checksummed Base58 identifiers.
//!
//! An identifier packs a kind tag (0..=16383) and a short payload, appends a
//! BLAKE2b-512 checksum and Base58-encodes the result:
//!
//! ```text
//! base58( kind_bytes || payload || blake2b_512("SS58PRE" || kind_bytes || payload)[..n] )
//! ```
//!
//! Kinds below 64 take one byte. Larger kinds take two bytes with bit 6 of
//! the first byte set. The checksum is two bytes for 32/33-byte payloads and
//! one byte otherwise.
//!
//! **CRITICAL**: This format is FROZEN. Identifiers are compared across
//! issuers, verifiers and storage; any change breaks all of them.

use blake2::{Blake2b512, Digest as _};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Digest;

/// Domain separation prefix for the checksum hash.
pub const CHECKSUM_DOMAIN: &[u8] = b"SS58PRE";

/// Payload lengths accepted by [`encode`].
pub const ALLOWED_PAYLOAD_LENGTHS: [usize; 6] = [1, 2, 4, 8, 32, 33];

/// Decoded (pre-Base58) lengths accepted by [`decode`].
pub const ALLOWED_ENCODED_LENGTHS: [usize; 8] = [3, 4, 6, 10, 35, 36, 37, 38];

/// Largest kind tag that fits the two-byte scheme.
pub const MAX_KIND: u16 = 16383;

/// Kind tags that may never be used.
pub const RESERVED_KINDS: [u16; 2] = [46, 47];

/// Known identifier kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum IdentifierKind {
    /// Issued credential, computed from its root hash.
    Credential = 10346,
    /// Schema registry entry.
    Schema = 8902,
    /// Space (chain space / registry namespace).
    Space = 3390,
    /// Statement anchored on chain.
    Statement = 4126,
    /// Score / rating entry.
    Score = 6077,
    /// Authorization entry.
    Authorization = 2092,
}

impl IdentifierKind {
    /// All registered kinds.
    pub const ALL: [IdentifierKind; 6] = [
        Self::Credential,
        Self::Schema,
        Self::Space,
        Self::Statement,
        Self::Score,
        Self::Authorization,
    ];

    /// The numeric kind tag.
    pub fn tag(self) -> u16 {
        self as u16
    }

    /// Look up a registered kind by tag.
    pub fn from_tag(tag: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// URI prefix used when the identifier is written as a URI.
    pub fn uri_prefix(self) -> &'static str {
        match self {
            Self::Credential => "credential:cord:",
            Self::Schema => "schema:cord:",
            Self::Space => "space:cord:",
            Self::Statement => "stmt:cord:",
            Self::Score => "score:cord:",
            Self::Authorization => "auth:cord:",
        }
    }
}

/// Decoder switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Require this kind tag.
    pub expect_kind: Option<u16>,
    /// Skip checksum verification.
    pub skip_checksum: bool,
}

impl DecodeOptions {
    /// Options requiring a specific kind.
    pub fn expecting(kind: u16) -> Self {
        Self {
            expect_kind: Some(kind),
            skip_checksum: false,
        }
    }
}

/// A decoded identifier: kind tag plus payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedIdentifier {
    pub kind: u16,
    pub payload: Vec<u8>,
}

fn invalid(reason: impl Into<String>) -> CoreError {
    CoreError::InvalidIdentifier(reason.into())
}

/// BLAKE2b-512 over the domain prefix and `body`.
fn checksum(body: &[u8]) -> [u8; 64] {
    let mut hasher = Blake2b512::new();
    hasher.update(CHECKSUM_DOMAIN);
    hasher.update(body);
    let mut out = [0u8; 64];
    out.copy_from_slice(&hasher.finalize());
    out
}

fn checksum_len(payload_len: usize) -> usize {
    if payload_len == 32 || payload_len == 33 {
        2
    } else {
        1
    }
}

/// Pack a kind tag into its one- or two-byte form.
fn kind_bytes(kind: u16) -> Vec<u8> {
    if kind < 64 {
        vec![kind as u8]
    } else {
        vec![
            (((kind & 0b0000_0000_1111_1100) >> 2) as u8) | 0b0100_0000,
            ((kind >> 8) as u8) | (((kind & 0b0000_0000_0000_0011) as u8) << 6),
        ]
    }
}

/// Encode `payload` under `kind`.
///
/// Fails on out-of-range or reserved kinds, payload lengths outside
/// [`ALLOWED_PAYLOAD_LENGTHS`], and combinations whose encoded length
/// [`decode`] would reject.
pub fn encode(payload: &[u8], kind: u16) -> Result<String, CoreError> {
    if kind > MAX_KIND || RESERVED_KINDS.contains(&kind) {
        return Err(invalid(format!("kind {kind} is reserved or out of range")));
    }
    if !ALLOWED_PAYLOAD_LENGTHS.contains(&payload.len()) {
        return Err(invalid(format!(
            "payload length {} is not one of {ALLOWED_PAYLOAD_LENGTHS:?}",
            payload.len()
        )));
    }

    let mut input = kind_bytes(kind);
    let encoded_len = input.len() + payload.len() + checksum_len(payload.len());
    if !ALLOWED_ENCODED_LENGTHS.contains(&encoded_len) {
        return Err(invalid(format!(
            "kind {kind} cannot carry a {}-byte payload",
            payload.len()
        )));
    }

    input.extend_from_slice(payload);
    let hash = checksum(&input);
    input.extend_from_slice(&hash[..checksum_len(payload.len())]);

    Ok(bs58::encode(input).into_string())
}

/// Decode an identifier string.
///
/// Never partially succeeds: any alphabet, length, prefix, checksum or kind
/// problem is an [`CoreError::InvalidIdentifier`].
pub fn decode(s: &str, options: DecodeOptions) -> Result<DecodedIdentifier, CoreError> {
    let decoded = bs58::decode(s)
        .into_vec()
        .map_err(|e| invalid(format!("{s}: {e}")))?;

    if !ALLOWED_ENCODED_LENGTHS.contains(&decoded.len()) {
        return Err(invalid(format!(
            "{s}: decoded length {} is not allowed",
            decoded.len()
        )));
    }

    let b0 = decoded[0];
    if b0 & 0b1000_0000 != 0 || RESERVED_KINDS.contains(&u16::from(b0)) {
        return Err(invalid(format!("{s}: invalid kind prefix byte {b0}")));
    }

    let kind_len = if b0 & 0b0100_0000 != 0 { 2 } else { 1 };
    let kind = if kind_len == 1 {
        u16::from(b0)
    } else {
        let b1 = u16::from(decoded[1]);
        ((u16::from(b0) & 0b0011_1111) << 2) | (b1 >> 6) | ((b1 & 0b0011_1111) << 8)
    };

    let long_checksum = decoded.len() == 34 + kind_len || decoded.len() == 35 + kind_len;
    let sum_len = if long_checksum { 2 } else { 1 };
    let body_len = decoded.len() - sum_len;

    if body_len <= kind_len || !ALLOWED_PAYLOAD_LENGTHS.contains(&(body_len - kind_len)) {
        return Err(invalid(format!("{s}: payload length is not allowed")));
    }

    if !options.skip_checksum {
        let hash = checksum(&decoded[..body_len]);
        if decoded[body_len..] != hash[..sum_len] {
            return Err(invalid(format!("{s}: checksum mismatch")));
        }
    }

    if let Some(expected) = options.expect_kind {
        if kind != expected {
            return Err(invalid(format!("{s}: expected kind {expected}, found {kind}")));
        }
    }

    Ok(DecodedIdentifier {
        kind,
        payload: decoded[kind_len..body_len].to_vec(),
    })
}

/// A validated identifier of a registered kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    kind: IdentifierKind,
    encoded: String,
}

impl Identifier {
    /// Encode a digest as an identifier of `kind`.
    pub fn from_digest(kind: IdentifierKind, digest: &Digest) -> Self {
        // A 32-byte payload fits every registered kind.
        let encoded = encode(digest.as_bytes(), kind.tag())
            .unwrap_or_else(|e| unreachable!("registered kind rejected 32-byte payload: {e}"));
        Self { kind, encoded }
    }

    /// Parse and validate an identifier string, requiring a registered kind.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let decoded = decode(s, DecodeOptions::default())?;
        let kind = IdentifierKind::from_tag(decoded.kind)
            .ok_or_else(|| invalid(format!("{s}: unknown kind {}", decoded.kind)))?;
        Ok(Self {
            kind,
            encoded: s.to_string(),
        })
    }

    /// Parse and require a specific kind.
    pub fn parse_as(s: &str, kind: IdentifierKind) -> Result<Self, CoreError> {
        decode(s, DecodeOptions::expecting(kind.tag()))?;
        Ok(Self {
            kind,
            encoded: s.to_string(),
        })
    }

    /// Parse a URI such as `schema:cord:<identifier>`.
    pub fn from_uri(uri: &str, kind: IdentifierKind) -> Result<Self, CoreError> {
        let rest = uri
            .strip_prefix(kind.uri_prefix())
            .ok_or_else(|| invalid(format!("{uri}: missing {} prefix", kind.uri_prefix())))?;
        Self::parse_as(rest, kind)
    }

    /// The identifier kind.
    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// The encoded string.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// The payload as a digest (fails for short payloads).
    pub fn digest(&self) -> Result<Digest, CoreError> {
        let decoded = decode(&self.encoded, DecodeOptions::default())?;
        Digest::try_from(decoded.payload.as_slice())
            .map_err(|_| invalid(format!("{}: payload is not a digest", self.encoded)))
    }

    /// Write as a URI with the kind's prefix.
    pub fn to_uri(&self) -> String {
        format!("{}{}", self.kind.uri_prefix(), self.encoded)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl FromStr for Identifier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Identifier::parse(&s).map_err(de::Error::custom)
    }
}

/// Encode a digest straight to a prefixed URI.
pub fn digest_to_uri(digest: &Digest, kind: IdentifierKind) -> String {
    Identifier::from_digest(kind, digest).to_uri()
}
