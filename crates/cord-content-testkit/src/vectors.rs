//! Golden test vectors for deterministic verification.
//!
//! These vectors pin statement text, salted hashes, root hashes and
//! identifier strings so every implementation produces identical bytes.

use anyhow::{anyhow, Context};
use serde_json::Value;

use cord_content_core::canonical::statement;
use cord_content_core::identifier::{encode, DecodeOptions};
use cord_content_core::statement::statement_digest;
use cord_content_core::{
    aggregate, hash_content_with_nonces, Blake2b256, Content, Credential, Identifier,
    IdentifierKind, NonceMap,
};

/// A golden credential vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Schema URI (hashing vocabulary).
    pub schema_uri: &'static str,
    /// Properties as `(key, json value, nonce)`.
    pub properties: &'static [(&'static str, &'static str, &'static str)],
    /// Expected root hash (hex, no prefix).
    pub expected_root_hash: &'static str,
    /// Expected credential identifier.
    pub expected_identifier: &'static str,
}

/// A golden identifier codec vector.
#[derive(Debug, Clone)]
pub struct IdentifierVector {
    pub name: &'static str,
    /// Payload bytes (hex).
    pub payload: &'static str,
    pub kind: u16,
    pub expected: &'static str,
}

/// Get all golden credential vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "single name statement",
            schema_uri: "schema:cord:abc",
            properties: &[("name", r#""Alice""#, "n1")],
            expected_root_hash: "48d156db7656b07224f8eca0f568a264313708ff507291085cbc008ffd4b5b0e",
            expected_identifier: "gvio9YJuy6rtZVLLFotdZAywwbuy1VAU6MGjH7f6vmutRB6W8",
        },
        GoldenVector {
            name: "name and age statements",
            schema_uri: "schema:cord:abc",
            properties: &[("name", r#""Alice""#, "n1"), ("age", "29", "n2")],
            expected_root_hash: "b3acb0ac17a19352b3dd763796ba9ad67bd14a2b0ff96e1787f1ad95c14ab768",
            expected_identifier: "gvmDFn2oGKWZ8ywvrAReu3ZHPwRhYsBbaMAGvSA5UVUAkECCe",
        },
    ]
}

/// Get all golden identifier vectors.
pub fn identifier_vectors() -> Vec<IdentifierVector> {
    vec![
        IdentifierVector {
            name: "sr25519 public key, kind 42",
            payload: "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d",
            kind: 42,
            expected: "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY",
        },
        IdentifierVector {
            name: "zero digest, credential kind",
            payload: "0000000000000000000000000000000000000000000000000000000000000000",
            kind: 10346,
            expected: "gvh9fuWbxTAjHjHo1D9YEUb6vG5mJkLEck7x9KiacjgoUVdXY",
        },
        IdentifierVector {
            name: "zero digest, schema kind",
            payload: "0000000000000000000000000000000000000000000000000000000000000000",
            kind: 8902,
            expected: "s3bfcK1KT4V8WQZMcin3wZ5QPnAtuaKvAGeWS85RcDGKbt6CN",
        },
        IdentifierVector {
            name: "zero digest, space kind",
            payload: "0000000000000000000000000000000000000000000000000000000000000000",
            kind: 3390,
            expected: "c323M2zJip2EuhQfADWVhwf1pqbDKiJ6rU2xsDXBdNhKCP8Go",
        },
        IdentifierVector {
            name: "one byte, kind 0",
            payload: "01",
            kind: 0,
            expected: "17z",
        },
        IdentifierVector {
            name: "eight bytes, kind 42",
            payload: "0001020304050607",
            kind: 42,
            expected: "3MrpX7cscKfRue",
        },
    ]
}

/// Content described by a vector.
pub fn content_from_vector(vector: &GoldenVector) -> anyhow::Result<Content> {
    let mut content = Content::new(vector.schema_uri, "did:cord:issuer");
    for (key, json, _) in vector.properties {
        let value: Value = serde_json::from_str(json)
            .with_context(|| format!("vector {:?}: property {key}", vector.name))?;
        content = content.property(*key, value);
    }
    Ok(content)
}

/// The vector's nonces keyed by unsalted statement digest.
pub fn nonce_map_from_vector(vector: &GoldenVector) -> anyhow::Result<NonceMap> {
    let mut nonces = NonceMap::new();
    for (key, json, nonce) in vector.properties {
        let value: Value = serde_json::from_str(json)?;
        let stmt = statement(vector.schema_uri, key, &value)?;
        nonces.insert(statement_digest(&Blake2b256, &stmt), nonce.to_string());
    }
    Ok(nonces)
}

/// Issue the vector's credential with its fixed nonces.
pub fn credential_from_vector(vector: &GoldenVector) -> anyhow::Result<Credential> {
    let content = content_from_vector(vector)?;
    let nonces = nonce_map_from_vector(vector)?;
    credential_with_nonces(content, &nonces)
        .with_context(|| format!("vector {:?}", vector.name))
}

/// Assemble a credential over `content` using only the supplied nonces.
///
/// Every statement must have a nonce; a missing one is an error.
pub fn credential_with_nonces(content: Content, nonces: &NonceMap) -> anyhow::Result<Credential> {
    let hashed = hash_content_with_nonces(&Blake2b256, &content, nonces)?;
    let root_hash = aggregate(&Blake2b256, &hashed.hashes, &[]);
    let identifier = Identifier::from_digest(IdentifierKind::Credential, &root_hash);

    Ok(Credential {
        content,
        content_hashes: hashed.hashes,
        content_nonce_map: hashed.nonce_map,
        evidence_ids: Vec::new(),
        root_hash,
        identifier: identifier.to_string(),
    })
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, root hash hex)` per credential vector.
pub fn verify_all_vectors() -> anyhow::Result<Vec<(String, bool, String)>> {
    all_vectors()
        .iter()
        .map(|v| -> anyhow::Result<(String, bool, String)> {
            let credential = credential_from_vector(v)?;
            let hex = credential.root_hash.to_hex();
            let matches =
                hex == v.expected_root_hash && credential.identifier == v.expected_identifier;
            Ok((v.name.to_string(), matches, hex))
        })
        .collect()
}

/// Check one identifier vector in both directions.
pub fn check_identifier_vector(vector: &IdentifierVector) -> anyhow::Result<()> {
    let payload = hex::decode(vector.payload)?;
    let encoded = encode(&payload, vector.kind)?;
    if encoded != vector.expected {
        return Err(anyhow!(
            "vector {:?}: encoded {encoded}, expected {}",
            vector.name,
            vector.expected
        ));
    }

    let decoded = cord_content_core::identifier::decode(
        vector.expected,
        DecodeOptions::expecting(vector.kind),
    )?;
    if decoded.payload != payload {
        return Err(anyhow!("vector {:?}: payload did not round-trip", vector.name));
    }
    Ok(())
}
